//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash that uniquely identifies
//! host types exposed to the graph runtime. Hashes are computed from type
//! names at compile time, so identity survives process restarts and
//! recompiles without any registration-order dependency:
//!
//! - Forward references (hash computed before registration)
//! - Same name = same hash across binaries
//! - Single map lookups (no secondary name→id maps)
//!
//! # Examples
//!
//! ```
//! use nodegraph_core::TypeHash;
//!
//! const PLAYER: nodegraph_core::TypeHash = TypeHash::from_name("Player");
//! assert_eq!(PLAYER, TypeHash::from_name("Player"));
//! assert_ne!(PLAYER, TypeHash::from_name("Enemy"));
//! ```

use std::fmt;
use xxhash_rust::const_xxh64::xxh64;

/// Domain marker mixed into every type hash, so a type name can never
/// collide with other hash spaces sharing the map key width.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;
}

/// A deterministic 64-bit hash identifying a host type.
///
/// Computed from the type name. The same name always produces the same hash,
/// which lets descriptors, manifests, and serialized graphs refer to types
/// without a shared numbering authority.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    ///
    /// Const so that type identity can live in `static`/`const` metadata.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Whether this is the empty/invalid hash.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_hash() {
        assert_eq!(TypeHash::from_name("Player"), TypeHash::from_name("Player"));
    }

    #[test]
    fn different_names_different_hashes() {
        assert_ne!(TypeHash::from_name("Player"), TypeHash::from_name("Enemy"));
    }

    #[test]
    fn usable_in_const_context() {
        const H: TypeHash = TypeHash::from_name("Player");
        assert_eq!(H, TypeHash::from_name("Player"));
    }

    #[test]
    fn empty_is_zero() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("Player").is_empty());
    }

    #[test]
    fn debug_formats_as_hex() {
        let s = format!("{:?}", TypeHash(0xdead_beef));
        assert!(s.starts_with("TypeHash(0x"));
    }
}
