//! Manifest-based discovery registry for nodegraph bindings.
//!
//! Modules describe what they expose with [`ModuleBindings`] manifests
//! (normally assembled from the macro-generated `__exposed_bindings()`
//! constructors) and hand them to a [`BindingRegistry`], which indexes every
//! descriptor under its target type with inheritance-aware lookup.
//!
//! A process-wide instance with an explicit init/rebuild/shutdown lifecycle
//! lives in [`global`].

pub mod error;
pub mod global;
pub mod manifest;
pub mod registry;

pub use error::RegistryError;
pub use manifest::{ModuleBindings, SkippedMember, TypeBindings};
pub use registry::BindingRegistry;
