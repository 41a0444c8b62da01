//! Binding descriptors: the metadata records the registry indexes and the
//! interpreter consumes.
//!
//! Descriptors are produced by the generated `__exposed_bindings()`
//! constructors. Thunks are plain function pointers resolved at compile
//! time; the thunk name string is carried for diagnostics and tooling only,
//! never for lookup.

use bitflags::bitflags;

use crate::error::DispatchError;
use crate::event::{EventId, HandlerToken};
use crate::object::{ObjRef, TypeInfo};
use crate::stack::ValueStack;
use crate::type_hash::TypeHash;
use crate::value::ValueKind;

/// Uniform calling convention of every generated thunk.
///
/// Arguments arrive on the stack in reverse declaration order; results leave
/// with the return value on top and out-parameters below it.
pub type ThunkFn = fn(Option<&ObjRef>, &mut ValueStack) -> Result<(), DispatchError>;

/// Wrapper binding a generated event handler to a host's event source.
pub type SubscribeFn = fn(&ObjRef) -> Result<HandlerToken, DispatchError>;

/// Counterpart of [`SubscribeFn`].
pub type UnsubscribeFn = fn(&ObjRef, HandlerToken) -> Result<(), DispatchError>;

bitflags! {
    /// Presentation flags carried through from the expose attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExposeFlags: u32 {
        /// Force Function classification even when the binding has results.
        const FORCE_FLOW_NODE = 1 << 0;
        /// Keep the node out of graph editor palettes.
        const HIDE_IN_UI = 1 << 1;
    }
}

/// How a node for this binding behaves in a graph.
///
/// Resolved at generation time: member attribute over type attribute over
/// the structural default (bindings with results are getters, the rest are
/// flow functions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptualType {
    Undefined,
    Getter,
    Function,
}

/// What a method binding wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Function,
    PropertyGet,
    PropertySet,
}

/// One declared parameter of a bound method or event.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub kind: ValueKind,
    /// Out-parameters are produced by the call instead of consumed by it.
    pub is_out: bool,
    /// For Object parameters with a concrete declared type, its hash.
    pub object_type: Option<TypeHash>,
}

impl ParamInfo {
    pub fn new(name: &'static str, kind: ValueKind) -> Self {
        ParamInfo {
            name,
            kind,
            is_out: false,
            object_type: None,
        }
    }

    pub fn out(name: &'static str, kind: ValueKind) -> Self {
        ParamInfo {
            name,
            kind,
            is_out: true,
            object_type: None,
        }
    }

    pub fn object(name: &'static str, object_type: TypeHash) -> Self {
        ParamInfo {
            name,
            kind: ValueKind::Object,
            is_out: false,
            object_type: Some(object_type),
        }
    }
}

/// Fields shared by every binding descriptor.
#[derive(Debug, Clone)]
pub struct BindingCommon {
    /// Member name as declared on the host type.
    pub name: &'static str,
    /// Type the binding is indexed under (the extended type for extensions).
    pub target_type: &'static TypeInfo,
    /// Type whose impl block declared the binding.
    pub declaring_type: &'static TypeInfo,
    /// True for associated functions without a target object. Extension
    /// methods are not static: their target is the extended type.
    pub is_static: bool,
    pub flags: ExposeFlags,
    pub conceptual_type: ConceptualType,
    /// Editor palette path; `None` falls back to the target type name.
    pub category: Option<&'static str>,
    pub description: &'static str,
}

impl BindingCommon {
    pub fn hide_in_ui(&self) -> bool {
        self.flags.contains(ExposeFlags::HIDE_IN_UI)
    }

    pub fn category_path(&self) -> &'static str {
        self.category.unwrap_or(self.target_type.name)
    }
}

/// A bound method or property accessor.
#[derive(Debug, Clone)]
pub struct MethodBinding {
    pub common: BindingCommon,
    pub kind: MethodKind,
    /// Declared inputs and out-parameters, extension receiver excluded.
    pub params: Vec<ParamInfo>,
    /// Non-unit return or at least one out-parameter.
    pub has_return_values: bool,
    pub thunk: ThunkFn,
    pub thunk_name: &'static str,
}

impl MethodBinding {
    pub fn invoke(
        &self,
        target: Option<&ObjRef>,
        stack: &mut ValueStack,
    ) -> Result<(), DispatchError> {
        (self.thunk)(target, stack)
    }
}

/// A bound event declaration.
#[derive(Debug, Clone)]
pub struct EventBinding {
    pub common: BindingCommon,
    pub event_id: EventId,
    pub params: Vec<ParamInfo>,
    pub handler_name: &'static str,
    pub subscribe: SubscribeFn,
    pub unsubscribe: UnsubscribeFn,
}

/// A hand-written thunk indexed as-is.
#[derive(Debug, Clone)]
pub struct CustomMethodBinding {
    pub common: BindingCommon,
    pub thunk: ThunkFn,
    pub thunk_name: &'static str,
}

impl CustomMethodBinding {
    pub fn invoke(
        &self,
        target: Option<&ObjRef>,
        stack: &mut ValueStack,
    ) -> Result<(), DispatchError> {
        (self.thunk)(target, stack)
    }
}

/// Any binding descriptor.
#[derive(Debug, Clone)]
pub enum Binding {
    Method(MethodBinding),
    Event(EventBinding),
    Custom(CustomMethodBinding),
}

impl Binding {
    pub fn common(&self) -> &BindingCommon {
        match self {
            Binding::Method(b) => &b.common,
            Binding::Event(b) => &b.common,
            Binding::Custom(b) => &b.common,
        }
    }

    pub fn name(&self) -> &'static str {
        self.common().name
    }

    /// Hash of the type this binding is indexed under.
    pub fn target_hash(&self) -> TypeHash {
        self.common().target_type.hash
    }

    pub fn as_method(&self) -> Option<&MethodBinding> {
        match self {
            Binding::Method(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventBinding> {
        match self {
            Binding::Event(b) => Some(b),
            _ => None,
        }
    }
}
