//! Core value model, stack, and binding descriptors for the nodegraph
//! runtime.
//!
//! This crate defines the contract between three parties:
//!
//! - **Host code** exposes methods, properties, and events through the
//!   `nodegraph-macros` attributes, which generate uniform thunks over the
//!   types defined here.
//! - **The registry** (`nodegraph-registry`) indexes the resulting
//!   [`Binding`] descriptors per target type.
//! - **The interpreter** pushes arguments onto a [`ValueStack`] and calls
//!   [`dispatch::invoke`].
//!
//! Nothing in this crate reflects or scans; all metadata is constructed at
//! compile time and handed over explicitly.

pub mod binding;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod math;
pub mod object;
pub mod stack;
pub mod type_hash;
pub mod value;

pub use binding::{
    Binding, BindingCommon, ConceptualType, CustomMethodBinding, EventBinding, ExposeFlags,
    MethodBinding, MethodKind, ParamInfo, SubscribeFn, ThunkFn, UnsubscribeFn,
};
pub use convert::StackValue;
pub use error::DispatchError;
pub use event::{
    EventArgs, EventHandler, EventHook, EventId, EventSource, HandlerToken, clear_event_hook,
    dispatch_event, raise_to_hook, set_event_hook,
};
pub use math::{Color, Quat, Vec3};
pub use object::{NodeObject, NodeType, ObjRef, TypeInfo};
pub use stack::{ValueStack, reset_current_stack, with_current_stack};
pub use type_hash::TypeHash;
pub use value::{Value, ValueKind};
