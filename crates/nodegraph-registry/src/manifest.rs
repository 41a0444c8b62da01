//! Per-module binding manifests.
//!
//! Discovery is manifest-based: each module hands the registry an explicit
//! [`ModuleBindings`] built from the `__exposed_bindings()` constructors the
//! macros generate. No assembly scanning, no load-order coupling; a module's
//! bindings exist exactly when its manifest is installed.

use nodegraph_core::{Binding, TypeInfo};

/// A member that was annotated for exposure but could not be bound.
///
/// Recorded instead of silently dropped so discovery can log the reason.
#[derive(Debug, Clone)]
pub struct SkippedMember {
    pub name: &'static str,
    pub reason: &'static str,
}

/// One host type's contribution to a module manifest.
///
/// Produced by the generated `__exposed_bindings()`; rarely constructed by
/// hand outside tests.
#[derive(Debug)]
pub struct TypeBindings {
    /// The declaring type (for extension impls, the helper type).
    pub info: &'static TypeInfo,
    pub bindings: Vec<Binding>,
    pub skipped: Vec<SkippedMember>,
}

impl TypeBindings {
    pub fn new(info: &'static TypeInfo) -> Self {
        TypeBindings {
            info,
            bindings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn skipped(mut self, name: &'static str, reason: &'static str) -> Self {
        self.skipped.push(SkippedMember { name, reason });
        self
    }
}

/// Everything one module exposes, ready to install.
///
/// # Examples
///
/// ```ignore
/// let manifest = ModuleBindings::new("game_core")
///     .with(Player::__exposed_bindings())
///     .with(Inventory::__exposed_bindings());
/// registry.install(manifest)?;
/// ```
#[derive(Debug)]
pub struct ModuleBindings {
    pub module: &'static str,
    pub types: Vec<TypeBindings>,
}

impl ModuleBindings {
    pub fn new(module: &'static str) -> Self {
        ModuleBindings {
            module,
            types: Vec::new(),
        }
    }

    pub fn with(mut self, type_bindings: TypeBindings) -> Self {
        self.types.push(type_bindings);
        self
    }

    /// Total bindings across all types.
    pub fn binding_count(&self) -> usize {
        self.types.iter().map(|t| t.bindings.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegraph_core::{NodeObject, NodeType, TypeHash};
    use std::any::Any;

    struct Sample;

    impl NodeObject for Sample {
        fn type_info(&self) -> &'static TypeInfo {
            Sample::INFO
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any> {
            (hash == Sample::INFO.hash).then_some(self as &dyn Any)
        }
    }

    impl NodeType for Sample {
        const INFO: &'static TypeInfo = &TypeInfo::new("ManifestSample", None);
    }

    #[test]
    fn builder_accumulates_types() {
        let manifest = ModuleBindings::new("test_module")
            .with(TypeBindings::new(Sample::INFO).skipped("hidden", "not public"));
        assert_eq!(manifest.module, "test_module");
        assert_eq!(manifest.types.len(), 1);
        assert_eq!(manifest.binding_count(), 0);
        assert_eq!(manifest.types[0].skipped[0].name, "hidden");
    }
}
