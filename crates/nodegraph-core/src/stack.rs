//! The tagged value stack carrying arguments and results across thunks.
//!
//! Callers push arguments in reverse declaration order; thunks pop them in
//! declaration order with the kind-specific accessors. Results come back the
//! same way: the return value on top, out-parameters below it in declaration
//! order.
//!
//! After a failed typed pop the stack contents are unspecified; callers own
//! a stack per execution context and reset it before reuse.

use std::cell::RefCell;

use crate::convert::StackValue;
use crate::error::DispatchError;
use crate::math::{Color, Quat, Vec3};
use crate::object::ObjRef;
use crate::value::{Value, ValueKind};

/// A LIFO stack of tagged values.
#[derive(Debug, Default)]
pub struct ValueStack {
    entries: Vec<Value>,
}

impl ValueStack {
    pub fn new() -> Self {
        ValueStack {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Push any tagged value.
    pub fn push(&mut self, value: Value) {
        self.entries.push(value);
    }

    /// Push a payload with its kind tag.
    pub fn push_value<T: StackValue>(&mut self, value: T) {
        self.entries.push(value.into_value());
    }

    /// Pop the top value, checking its kind.
    pub fn pop_value<T: StackValue>(&mut self) -> Result<T, DispatchError> {
        let value = self.entries.pop().ok_or(DispatchError::StackUnderflow)?;
        T::from_value(value)
    }

    /// Pop and discard the top value regardless of kind.
    pub fn pop_discard(&mut self) -> Result<(), DispatchError> {
        self.entries
            .pop()
            .map(|_| ())
            .ok_or(DispatchError::StackUnderflow)
    }

    /// Kind of the top value, if any.
    pub fn peek_kind(&self) -> Option<ValueKind> {
        self.entries.last().map(Value::kind)
    }

    pub fn push_bool(&mut self, v: bool) {
        self.push_value(v);
    }

    pub fn push_int(&mut self, v: i32) {
        self.push_value(v);
    }

    pub fn push_float(&mut self, v: f32) {
        self.push_value(v);
    }

    pub fn push_string(&mut self, v: String) {
        self.push_value(v);
    }

    pub fn push_vector3(&mut self, v: Vec3) {
        self.push_value(v);
    }

    pub fn push_quaternion(&mut self, v: Quat) {
        self.push_value(v);
    }

    pub fn push_color(&mut self, v: Color) {
        self.push_value(v);
    }

    pub fn push_object(&mut self, v: ObjRef) {
        self.push_value(v);
    }

    pub fn pop_bool(&mut self) -> Result<bool, DispatchError> {
        self.pop_value()
    }

    pub fn pop_int(&mut self) -> Result<i32, DispatchError> {
        self.pop_value()
    }

    pub fn pop_float(&mut self) -> Result<f32, DispatchError> {
        self.pop_value()
    }

    pub fn pop_string(&mut self) -> Result<String, DispatchError> {
        self.pop_value()
    }

    pub fn pop_vector3(&mut self) -> Result<Vec3, DispatchError> {
        self.pop_value()
    }

    pub fn pop_quaternion(&mut self) -> Result<Quat, DispatchError> {
        self.pop_value()
    }

    pub fn pop_color(&mut self) -> Result<Color, DispatchError> {
        self.pop_value()
    }

    /// Pop an object reference. Universal over objects: any referenced type
    /// and null are accepted; typed narrowing happens at the cast site.
    pub fn pop_object(&mut self) -> Result<ObjRef, DispatchError> {
        self.pop_value()
    }
}

thread_local! {
    static CURRENT: RefCell<ValueStack> = RefCell::new(ValueStack::new());
}

/// Run `f` with the calling context's stack.
///
/// Event handler thunks use this to reach the stack of whatever execution
/// context raised the event; interpreters typically run one context per
/// thread.
pub fn with_current_stack<R>(f: impl FnOnce(&mut ValueStack) -> R) -> R {
    CURRENT.with(|stack| f(&mut stack.borrow_mut()))
}

/// Discard the calling context's stack contents, e.g. after a failed call.
pub fn reset_current_stack() {
    CURRENT.with(|stack| stack.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_every_kind() {
        let mut stack = ValueStack::new();
        stack.push_bool(true);
        stack.push_int(-3);
        stack.push_float(2.5);
        stack.push_string("hello".to_string());
        stack.push_vector3(Vec3::new(1.0, 2.0, 3.0));
        stack.push_quaternion(Quat::IDENTITY);
        stack.push_color(Color::RED);
        stack.push_object(ObjRef::null());

        assert_eq!(stack.len(), 8);
        assert!(stack.pop_object().unwrap().is_null());
        assert_eq!(stack.pop_color().unwrap(), Color::RED);
        assert_eq!(stack.pop_quaternion().unwrap(), Quat::IDENTITY);
        assert_eq!(stack.pop_vector3().unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(stack.pop_string().unwrap(), "hello");
        assert_eq!(stack.pop_float().unwrap(), 2.5);
        assert_eq!(stack.pop_int().unwrap(), -3);
        assert!(stack.pop_bool().unwrap());
        assert!(stack.is_empty());
    }

    #[test]
    fn wrong_kind_pop_names_both_kinds() {
        let mut stack = ValueStack::new();
        stack.push_int(5);
        let err = stack.pop_bool().unwrap_err();
        assert_eq!(
            err,
            DispatchError::TypeMismatch {
                expected: ValueKind::Bool,
                actual: ValueKind::Int,
            }
        );
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut stack = ValueStack::new();
        assert_eq!(stack.pop_int().unwrap_err(), DispatchError::StackUnderflow);
        assert_eq!(
            stack.pop_discard().unwrap_err(),
            DispatchError::StackUnderflow
        );
    }

    #[test]
    fn pop_discard_ignores_kind() {
        let mut stack = ValueStack::new();
        stack.push_string("x".to_string());
        stack.push_int(1);
        stack.pop_discard().unwrap();
        stack.pop_discard().unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn peek_kind_sees_top() {
        let mut stack = ValueStack::new();
        assert_eq!(stack.peek_kind(), None);
        stack.push_float(1.0);
        assert_eq!(stack.peek_kind(), Some(ValueKind::Float));
    }

    #[test]
    fn current_stack_is_per_thread() {
        with_current_stack(|stack| stack.push_int(9));
        let other = std::thread::spawn(|| with_current_stack(|stack| stack.len()))
            .join()
            .unwrap();
        assert_eq!(other, 0);
        assert_eq!(with_current_stack(|stack| stack.pop_int().unwrap()), 9);
        reset_current_stack();
    }
}
