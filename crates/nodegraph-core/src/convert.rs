//! Conversions between Rust payload types and tagged values.

use crate::error::DispatchError;
use crate::math::{Color, Quat, Vec3};
use crate::object::ObjRef;
use crate::value::{Value, ValueKind};

/// Binds a Rust payload type to its stack kind.
///
/// Implemented for exactly the eight payload types of the value model; the
/// typed stack accessors and event argument tuples are written against it.
pub trait StackValue: Sized {
    /// The kind this type occupies on the stack.
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    /// Recover the payload, reporting a kind mismatch otherwise.
    fn from_value(value: Value) -> Result<Self, DispatchError>;
}

macro_rules! impl_stack_value {
    ($ty:ty, $kind:ident) => {
        impl StackValue for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn into_value(self) -> Value {
                Value::$kind(self)
            }

            fn from_value(value: Value) -> Result<Self, DispatchError> {
                match value {
                    Value::$kind(v) => Ok(v),
                    other => Err(DispatchError::TypeMismatch {
                        expected: ValueKind::$kind,
                        actual: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_stack_value!(bool, Bool);
impl_stack_value!(i32, Int);
impl_stack_value!(f32, Float);
impl_stack_value!(String, String);
impl_stack_value!(Vec3, Vector3);
impl_stack_value!(Quat, Quaternion);
impl_stack_value!(Color, Color);
impl_stack_value!(ObjRef, Object);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        assert_eq!(i32::from_value(42.into_value()).unwrap(), 42);
        assert_eq!(
            String::from_value("hi".to_string().into_value()).unwrap(),
            "hi"
        );
        assert_eq!(Vec3::from_value(Vec3::ONE.into_value()).unwrap(), Vec3::ONE);
    }

    #[test]
    fn mismatch_reports_kinds() {
        let err = bool::from_value(Value::Int(1)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::TypeMismatch {
                expected: ValueKind::Bool,
                actual: ValueKind::Int,
            }
        );
    }
}
