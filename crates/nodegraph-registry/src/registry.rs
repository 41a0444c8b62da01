//! The discovery registry: binding descriptors indexed per target type.
//!
//! Read-mostly by design: modules are installed up front (or wholesale via
//! rebuild) and lookups are plain map reads afterwards. Bindings are indexed
//! under their **target** type, so extension methods land under the type
//! they extend, not the helper that declares them.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use nodegraph_core::{Binding, EventId, TypeHash, TypeInfo};

use crate::error::RegistryError;
use crate::manifest::ModuleBindings;

/// Ownership record for an installed event id.
#[derive(Debug, Clone)]
struct EventOwner {
    module: &'static str,
    event: &'static str,
    binding: Arc<Binding>,
}

/// Inheritance-aware index of all installed binding descriptors.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    /// Bindings per target type.
    bindings: FxHashMap<TypeHash, Vec<Arc<Binding>>>,
    /// Known type identities, including ancestors of installed types.
    type_infos: FxHashMap<TypeHash, &'static TypeInfo>,
    /// Installed events by id, for collision detection and hook routing.
    events: FxHashMap<EventId, EventOwner>,
    /// Module names in install order.
    modules: Vec<&'static str>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        BindingRegistry::default()
    }

    /// Install one module's manifest.
    ///
    /// Validates registry-wide invariants before mutating anything, so a
    /// failed install leaves the registry untouched. Skipped members are
    /// logged and dropped. Returns the number of bindings installed.
    pub fn install(&mut self, manifest: ModuleBindings) -> Result<usize, RegistryError> {
        if self.modules.contains(&manifest.module) {
            return Err(RegistryError::DuplicateModule(manifest.module));
        }
        self.check_event_ids(&manifest)?;

        let module = manifest.module;
        let mut installed = 0usize;

        for type_bindings in manifest.types {
            for skipped in &type_bindings.skipped {
                warn!(
                    module,
                    ty = type_bindings.info.name,
                    member = skipped.name,
                    reason = skipped.reason,
                    "skipping exposed member"
                );
            }

            self.register_type_chain(type_bindings.info);

            for binding in type_bindings.bindings {
                let binding = Arc::new(binding);
                self.register_type_chain(binding.common().target_type);
                if let Binding::Event(event) = binding.as_ref() {
                    self.events.insert(
                        event.event_id,
                        EventOwner {
                            module,
                            event: event.common.name,
                            binding: Arc::clone(&binding),
                        },
                    );
                }
                self.bindings
                    .entry(binding.target_hash())
                    .or_default()
                    .push(binding);
                installed += 1;
            }
        }

        self.modules.push(module);
        debug!(module, bindings = installed, "installed module bindings");
        Ok(installed)
    }

    fn check_event_ids(&self, manifest: &ModuleBindings) -> Result<(), RegistryError> {
        let mut batch: FxHashMap<EventId, &'static str> = FxHashMap::default();
        for type_bindings in &manifest.types {
            for binding in &type_bindings.bindings {
                let Binding::Event(event) = binding else {
                    continue;
                };
                if let Some(owner) = self.events.get(&event.event_id) {
                    return Err(RegistryError::EventIdCollision {
                        id: event.event_id,
                        module: manifest.module,
                        event: event.common.name,
                        existing_module: owner.module,
                        existing_event: owner.event,
                    });
                }
                if let Some(existing) = batch.insert(event.event_id, event.common.name) {
                    return Err(RegistryError::EventIdCollision {
                        id: event.event_id,
                        module: manifest.module,
                        event: event.common.name,
                        existing_module: manifest.module,
                        existing_event: existing,
                    });
                }
            }
        }
        Ok(())
    }

    fn register_type_chain(&mut self, info: &'static TypeInfo) {
        for ancestor in info.chain() {
            self.type_infos.entry(ancestor.hash).or_insert(ancestor);
        }
    }

    /// Bindings declared for exactly this type. Unknown types yield an
    /// empty slice, never an error.
    pub fn get_strict(&self, hash: TypeHash) -> &[Arc<Binding>] {
        self.bindings
            .get(&hash)
            .map(|bindings| bindings.as_slice())
            .unwrap_or(&[])
    }

    /// Bindings for this type and its declared ancestors, nearest first.
    ///
    /// A base type never sees descendant bindings; the walk only goes up.
    pub fn get_with_ancestors(
        &self,
        hash: TypeHash,
    ) -> impl Iterator<Item = &Arc<Binding>> {
        let chain: Vec<TypeHash> = match self.type_infos.get(&hash) {
            Some(info) => info.chain().map(|ancestor| ancestor.hash).collect(),
            None => vec![hash],
        };
        chain
            .into_iter()
            .flat_map(move |ancestor| self.get_strict(ancestor).iter())
    }

    /// First binding with the given name visible from this type, walking
    /// the ancestor chain from nearest to farthest.
    pub fn lookup(&self, hash: TypeHash, name: &str) -> Option<Arc<Binding>> {
        self.get_with_ancestors(hash)
            .find(|binding| binding.name() == name)
            .cloned()
    }

    /// The event binding that owns an id, if installed.
    pub fn get_event(&self, id: EventId) -> Option<Arc<Binding>> {
        self.events.get(&id).map(|owner| Arc::clone(&owner.binding))
    }

    /// Identity record of a known type.
    pub fn type_info(&self, hash: TypeHash) -> Option<&'static TypeInfo> {
        self.type_infos.get(&hash).copied()
    }

    /// Types with at least one binding.
    pub fn types(&self) -> impl Iterator<Item = &'static TypeInfo> {
        self.bindings
            .keys()
            .filter_map(|hash| self.type_infos.get(hash).copied())
    }

    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.type_infos.clear();
        self.events.clear();
        self.modules.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::TypeBindings;
    use nodegraph_core::{
        BindingCommon, ConceptualType, DispatchError, EventBinding, ExposeFlags, HandlerToken,
        MethodBinding, MethodKind, NodeObject, NodeType, ObjRef, ValueStack,
    };
    use std::any::Any;

    // Hand-built host hierarchy; the macro-generated path is covered by the
    // integration suite in the workspace root.

    struct Animal;
    struct Dog;

    impl NodeObject for Animal {
        fn type_info(&self) -> &'static TypeInfo {
            Animal::INFO
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any> {
            (hash == Animal::INFO.hash).then_some(self as &dyn Any)
        }
    }

    impl NodeType for Animal {
        const INFO: &'static TypeInfo = &TypeInfo::new("Animal", None);
    }

    impl NodeObject for Dog {
        fn type_info(&self) -> &'static TypeInfo {
            Dog::INFO
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any> {
            (hash == Dog::INFO.hash).then_some(self as &dyn Any)
        }
    }

    impl NodeType for Dog {
        const INFO: &'static TypeInfo = &TypeInfo::new("Dog", Some(Animal::INFO));
    }

    fn noop_thunk(_: Option<&ObjRef>, _: &mut ValueStack) -> Result<(), DispatchError> {
        Ok(())
    }

    fn method(name: &'static str, target: &'static TypeInfo) -> Binding {
        Binding::Method(MethodBinding {
            common: BindingCommon {
                name,
                target_type: target,
                declaring_type: target,
                is_static: false,
                flags: ExposeFlags::default(),
                conceptual_type: ConceptualType::Function,
                category: None,
                description: "",
            },
            kind: MethodKind::Function,
            params: vec![],
            has_return_values: false,
            thunk: noop_thunk,
            thunk_name: "CALL_test",
        })
    }

    fn event(name: &'static str, target: &'static TypeInfo, id: u64) -> Binding {
        fn subscribe(_: &ObjRef) -> Result<HandlerToken, DispatchError> {
            unreachable!()
        }
        fn unsubscribe(_: &ObjRef, _: HandlerToken) -> Result<(), DispatchError> {
            unreachable!()
        }
        Binding::Event(EventBinding {
            common: BindingCommon {
                name,
                target_type: target,
                declaring_type: target,
                is_static: false,
                flags: ExposeFlags::default(),
                conceptual_type: ConceptualType::Undefined,
                category: None,
                description: "",
            },
            event_id: EventId::from_raw(id),
            params: vec![],
            handler_name: "HANDLE_test",
            subscribe,
            unsubscribe,
        })
    }

    fn animal_module() -> ModuleBindings {
        ModuleBindings::new("animals").with(
            TypeBindings::new(Animal::INFO)
                .binding(method("speak", Animal::INFO))
                .binding(event("on_fed", Animal::INFO, 0x8000)),
        )
    }

    #[test]
    fn strict_lookup_sees_only_own_type() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();
        registry
            .install(
                ModuleBindings::new("dogs")
                    .with(TypeBindings::new(Dog::INFO).binding(method("fetch", Dog::INFO))),
            )
            .unwrap();

        let dog_strict: Vec<_> = registry
            .get_strict(Dog::INFO.hash)
            .iter()
            .map(|b| b.name())
            .collect();
        assert_eq!(dog_strict, vec!["fetch"]);
    }

    #[test]
    fn ancestor_lookup_inherits_downward_only() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();
        registry
            .install(
                ModuleBindings::new("dogs")
                    .with(TypeBindings::new(Dog::INFO).binding(method("fetch", Dog::INFO))),
            )
            .unwrap();

        let dog_all: Vec<_> = registry
            .get_with_ancestors(Dog::INFO.hash)
            .map(|b| b.name())
            .collect();
        assert!(dog_all.contains(&"fetch"));
        assert!(dog_all.contains(&"speak"));

        let animal_all: Vec<_> = registry
            .get_with_ancestors(Animal::INFO.hash)
            .map(|b| b.name())
            .collect();
        assert!(!animal_all.contains(&"fetch"));
    }

    #[test]
    fn unknown_type_is_empty_not_an_error() {
        let registry = BindingRegistry::new();
        let unknown = TypeHash::from_name("Nope");
        assert!(registry.get_strict(unknown).is_empty());
        assert_eq!(registry.get_with_ancestors(unknown).count(), 0);
        assert!(registry.lookup(unknown, "anything").is_none());
    }

    #[test]
    fn lookup_by_name_prefers_nearest() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();
        registry
            .install(
                ModuleBindings::new("dogs")
                    .with(TypeBindings::new(Dog::INFO).binding(method("speak", Dog::INFO))),
            )
            .unwrap();

        let found = registry.lookup(Dog::INFO.hash, "speak").unwrap();
        assert_eq!(found.common().target_type.hash, Dog::INFO.hash);
    }

    #[test]
    fn event_id_collision_fails_install_atomically() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();

        let err = registry
            .install(
                ModuleBindings::new("clones")
                    .with(TypeBindings::new(Dog::INFO).binding(event("on_fed2", Dog::INFO, 0x8000))),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::EventIdCollision { .. }));
        assert_eq!(registry.modules(), &["animals"]);
        assert!(registry.get_strict(Dog::INFO.hash).is_empty());
    }

    #[test]
    fn duplicate_module_rejected() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();
        let err = registry.install(animal_module()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateModule("animals"));
    }

    #[test]
    fn event_routing_by_id() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();
        let found = registry.get_event(EventId::from_raw(0x8000)).unwrap();
        assert_eq!(found.name(), "on_fed");
        assert!(registry.get_event(EventId::from_raw(0x8001)).is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut registry = BindingRegistry::new();
        registry.install(animal_module()).unwrap();
        assert_eq!(registry.binding_count(), 2);
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.modules().is_empty());
        registry.install(animal_module()).unwrap();
    }
}
