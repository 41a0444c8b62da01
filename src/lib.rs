//! nodegraph: host binding and dispatch layer for a node-graph scripting
//! runtime.
//!
//! Host code exposes methods, properties, and events to visual graphs
//! through two macros; the runtime discovers them through explicit module
//! manifests and calls them through uniform stack thunks.
//!
//! ```ignore
//! use nodegraph::*;
//! use std::sync::atomic::{AtomicI32, Ordering};
//!
//! #[derive(NodeType)]
//! struct Counter {
//!     count: AtomicI32,
//! }
//!
//! #[exposed_api(category = "Demo")]
//! impl Counter {
//!     #[expose("Current count")]
//!     pub fn count(&self) -> i32 {
//!         self.count.load(Ordering::SeqCst)
//!     }
//! }
//!
//! global::init(vec![
//!     ModuleBindings::new("demo").with(Counter::__exposed_bindings()),
//! ])?;
//! ```

pub use nodegraph_core::{
    Binding, BindingCommon, Color, ConceptualType, CustomMethodBinding, DispatchError, EventArgs,
    EventBinding, EventHandler, EventHook, EventId, EventSource, ExposeFlags, HandlerToken,
    MethodBinding, MethodKind, NodeObject, NodeType, ObjRef, ParamInfo, Quat, StackValue,
    SubscribeFn, ThunkFn, TypeHash, TypeInfo, UnsubscribeFn, Value, ValueKind, ValueStack, Vec3,
    clear_event_hook, dispatch, dispatch_event, raise_to_hook, reset_current_stack,
    set_event_hook, with_current_stack,
};
pub use nodegraph_macros::{NodeType, exposed_api};
pub use nodegraph_registry::{
    BindingRegistry, ModuleBindings, RegistryError, SkippedMember, TypeBindings, global,
};
