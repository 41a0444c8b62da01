//! Call-time error taxonomy.
//!
//! Everything here is a recoverable, returned error: a graph asked the host
//! to do something with the wrong shape of data. Generation-time violations
//! never reach this enum because they fail the build inside the macros, and
//! discovery-time failures are logged and skipped by the registry.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced while invoking a binding or moving values across the stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A typed pop found a value of a different kind on top of the stack.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Kind the caller asked for
        expected: ValueKind,
        /// Kind actually on top of the stack
        actual: ValueKind,
    },

    /// A pop was attempted on an empty stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// An object reference could not be downcast to the requested type.
    #[error("invalid cast: {from} is not a {to}")]
    InvalidCast {
        /// Runtime type of the reference ("null" for null references)
        from: &'static str,
        /// Type the binding required
        to: &'static str,
    },

    /// An instance binding was invoked without a target object.
    #[error("binding '{0}' requires a target object")]
    NullTarget(&'static str),

    /// The binding carries no thunk (event bindings are dispatched, not called).
    #[error("binding '{0}' is not invokable")]
    NotInvokable(String),
}

impl DispatchError {
    /// Whether this error is a stack-shape problem (mismatch or underflow).
    pub fn is_stack_error(&self) -> bool {
        matches!(
            self,
            DispatchError::TypeMismatch { .. } | DispatchError::StackUnderflow
        )
    }

    /// Whether this error is a target-resolution problem.
    pub fn is_target_error(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidCast { .. } | DispatchError::NullTarget(_)
        )
    }
}
