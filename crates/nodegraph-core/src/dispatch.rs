//! Thin pass-through from descriptors to thunks.
//!
//! All marshaling already happened when the caller pushed arguments; all
//! scheduling belongs to the interpreter. This stays a single indirect call.

use crate::binding::Binding;
use crate::error::DispatchError;
use crate::object::ObjRef;
use crate::stack::ValueStack;

/// Invoke a binding's thunk against the given target and stack.
///
/// Event bindings carry no thunk; they are raised by their host and routed
/// through the event hook instead.
pub fn invoke(
    binding: &Binding,
    target: Option<&ObjRef>,
    stack: &mut ValueStack,
) -> Result<(), DispatchError> {
    match binding {
        Binding::Method(b) => b.invoke(target, stack),
        Binding::Custom(b) => b.invoke(target, stack),
        Binding::Event(b) => Err(DispatchError::NotInvokable(b.common.name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{
        BindingCommon, ConceptualType, EventBinding, ExposeFlags, MethodBinding, MethodKind,
    };
    use crate::event::EventId;
    use crate::object::{NodeObject, NodeType, TypeInfo};
    use crate::type_hash::TypeHash;
    use std::any::Any;

    struct Host;

    impl NodeObject for Host {
        fn type_info(&self) -> &'static TypeInfo {
            Host::INFO
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any> {
            (hash == Host::INFO.hash).then_some(self as &dyn Any)
        }
    }

    impl NodeType for Host {
        const INFO: &'static TypeInfo = &TypeInfo::new("DispatchHost", None);
    }

    fn common(name: &'static str) -> BindingCommon {
        BindingCommon {
            name,
            target_type: Host::INFO,
            declaring_type: Host::INFO,
            is_static: true,
            flags: ExposeFlags::default(),
            conceptual_type: ConceptualType::Function,
            category: None,
            description: "",
        }
    }

    #[test]
    fn method_dispatches_to_thunk() {
        fn thunk(_: Option<&ObjRef>, stack: &mut ValueStack) -> Result<(), DispatchError> {
            stack.push_bool(true);
            Ok(())
        }
        let binding = Binding::Method(MethodBinding {
            common: common("probe"),
            kind: MethodKind::Function,
            params: vec![],
            has_return_values: true,
            thunk,
            thunk_name: "CALL_probe",
        });
        let mut stack = ValueStack::new();
        invoke(&binding, None, &mut stack).unwrap();
        assert!(stack.pop_bool().unwrap());
    }

    #[test]
    fn events_are_not_invokable() {
        fn subscribe(_: &ObjRef) -> Result<crate::event::HandlerToken, DispatchError> {
            unreachable!()
        }
        fn unsubscribe(
            _: &ObjRef,
            _: crate::event::HandlerToken,
        ) -> Result<(), DispatchError> {
            unreachable!()
        }
        let binding = Binding::Event(EventBinding {
            common: common("on_hit"),
            event_id: EventId::from_raw(0x400),
            params: vec![],
            handler_name: "HANDLE_on_hit",
            subscribe,
            unsubscribe,
        });
        let mut stack = ValueStack::new();
        let err = invoke(&binding, None, &mut stack).unwrap_err();
        assert_eq!(err, DispatchError::NotInvokable("on_hit".to_string()));
    }
}
