//! Discovery and lifecycle errors.

use nodegraph_core::EventId;
use thiserror::Error;

/// Errors raised while installing manifests or using the global registry.
///
/// Per-member problems are not errors: they are logged and skipped so one
/// bad member cannot take down discovery. Only registry-wide invariant
/// violations surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two events resolved to the same id. Either a module-hash collision or
    /// the same module installed under two names; both are unrecoverable
    /// without a source change.
    #[error(
        "event id {id} collides: '{event}' in module '{module}' already taken by '{existing_event}' in module '{existing_module}'"
    )]
    EventIdCollision {
        id: EventId,
        module: &'static str,
        event: &'static str,
        existing_module: &'static str,
        existing_event: &'static str,
    },

    /// A module manifest was installed twice without a rebuild.
    #[error("module '{0}' is already installed")]
    DuplicateModule(&'static str),

    /// The global registry was used before `init`.
    #[error("binding registry is not initialized")]
    NotInitialized,

    /// `init` was called while a registry is live; use `rebuild` instead.
    #[error("binding registry is already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_display_names_both_owners() {
        let err = RegistryError::EventIdCollision {
            id: EventId::from_raw(0x1400),
            module: "game_b",
            event: "on_hit",
            existing_module: "game_a",
            existing_event: "on_spawn",
        };
        let text = err.to_string();
        assert!(text.contains("game_a"));
        assert!(text.contains("game_b"));
        assert!(text.contains("on_hit"));
    }
}
