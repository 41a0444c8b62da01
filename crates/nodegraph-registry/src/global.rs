//! Explicit process-wide registry lifecycle.
//!
//! Hosts decide when bindings exist: `init` once at startup, `rebuild` on
//! hot-reload, `shutdown` on teardown. Nothing is registered as a side
//! effect of code being linked in.

use std::sync::{PoisonError, RwLock};

use lazy_static::lazy_static;
use tracing::info;

use crate::error::RegistryError;
use crate::manifest::ModuleBindings;
use crate::registry::BindingRegistry;

lazy_static! {
    static ref GLOBAL: RwLock<Option<BindingRegistry>> = RwLock::new(None);
}

fn build(modules: Vec<ModuleBindings>) -> Result<BindingRegistry, RegistryError> {
    let mut registry = BindingRegistry::new();
    for manifest in modules {
        registry.install(manifest)?;
    }
    Ok(registry)
}

/// Install the global registry from a set of module manifests.
///
/// Fails with [`RegistryError::AlreadyInitialized`] if a registry is live;
/// use [`rebuild`] to replace one.
pub fn init(modules: Vec<ModuleBindings>) -> Result<(), RegistryError> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(RegistryError::AlreadyInitialized);
    }
    let registry = build(modules)?;
    info!(
        modules = registry.modules().len(),
        bindings = registry.binding_count(),
        "binding registry initialized"
    );
    *slot = Some(registry);
    Ok(())
}

/// Replace the global registry wholesale (hot-reload).
///
/// The new registry is built before the old one is dropped; on error the
/// previous registry stays live.
pub fn rebuild(modules: Vec<ModuleBindings>) -> Result<(), RegistryError> {
    let registry = build(modules)?;
    info!(
        modules = registry.modules().len(),
        bindings = registry.binding_count(),
        "binding registry rebuilt"
    );
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Some(registry);
    Ok(())
}

/// Drop the global registry.
pub fn shutdown() {
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = None;
}

pub fn is_initialized() -> bool {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Run `f` against the global registry.
pub fn with<R>(f: impl FnOnce(&BindingRegistry) -> R) -> Result<R, RegistryError> {
    let slot = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(registry) => Ok(f(registry)),
        None => Err(RegistryError::NotInitialized),
    }
}
