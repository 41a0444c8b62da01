//! Event id assignment.
//!
//! An event id is `(module_identity_hash & !0x3FF) | counter`: the high 54
//! bits identify the declaring module, the low 10 bits count its events in
//! declaration order. The module half is SHA-256 of the module identity
//! string folded to 64 bits, so ids are stable across builds and machines;
//! the counter half is assigned during expansion, which visits declarations
//! in source order.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use sha2::{Digest, Sha256};

/// Low bits reserved for the per-module counter.
pub const COUNTER_MASK: u64 = 0x3FF;

/// Most events one module may declare.
pub const MAX_EVENTS_PER_MODULE: u64 = 1023;

/// The module-identity half of an event id.
pub fn module_prefix(module: &str) -> u64 {
    let digest = Sha256::digest(module.as_bytes());
    let lo = u64::from_le_bytes(digest[0..8].try_into().expect("digest is 32 bytes"));
    let hi = u64::from_le_bytes(digest[8..16].try_into().expect("digest is 32 bytes"));
    (lo ^ hi) & !COUNTER_MASK
}

fn counters() -> &'static Mutex<HashMap<String, u64>> {
    static COUNTERS: OnceLock<Mutex<HashMap<String, u64>>> = OnceLock::new();
    COUNTERS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Allocate the next event id for a module.
///
/// `None` once the module has exhausted its counter space; the caller turns
/// that into a compile error.
pub fn allocate(module: &str) -> Option<u64> {
    let mut map = counters()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let counter = map.entry(module.to_string()).or_insert(0);
    if *counter >= MAX_EVENTS_PER_MODULE {
        return None;
    }
    let id = module_prefix(module) | *counter;
    *counter += 1;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_deterministic() {
        assert_eq!(module_prefix("game_core"), module_prefix("game_core"));
        assert_ne!(module_prefix("game_core"), module_prefix("game_ui"));
    }

    #[test]
    fn prefix_counter_bits_are_clear() {
        assert_eq!(module_prefix("game_core") & COUNTER_MASK, 0);
    }

    #[test]
    fn allocation_counts_up_within_a_module() {
        let a = allocate("event_id_test_module_a").unwrap();
        let b = allocate("event_id_test_module_a").unwrap();
        assert_eq!(a & !COUNTER_MASK, b & !COUNTER_MASK);
        assert_eq!((b & COUNTER_MASK) - (a & COUNTER_MASK), 1);
    }

    #[test]
    fn allocation_exhausts_at_limit() {
        for _ in 0..MAX_EVENTS_PER_MODULE {
            assert!(allocate("event_id_test_module_full").is_some());
        }
        assert!(allocate("event_id_test_module_full").is_none());
    }
}
