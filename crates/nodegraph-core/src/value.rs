//! The closed value model shared by graphs and host bindings.
//!
//! Exactly eight kinds exist. Thunks and the interpreter agree on this set
//! at build time; anything else is rejected when bindings are generated.

use std::fmt;

use crate::math::{Color, Quat, Vec3};
use crate::object::ObjRef;

/// A tagged value as it travels across the binding boundary.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Vector3(Vec3),
    Quaternion(Quat),
    Color(Color),
    Object(ObjRef),
}

impl Value {
    /// The payload-free kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Vector3(_) => ValueKind::Vector3,
            Value::Quaternion(_) => ValueKind::Quaternion,
            Value::Color(_) => ValueKind::Color,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

/// Discriminant of [`Value`], used in descriptors and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Vector3,
    Quaternion,
    Color,
    Object,
}

impl ValueKind {
    /// All kinds, in declaration order.
    pub const ALL: [ValueKind; 8] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::Vector3,
        ValueKind::Quaternion,
        ValueKind::Color,
        ValueKind::Object,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Vector3 => "Vector3",
            ValueKind::Quaternion => "Quaternion",
            ValueKind::Color => "Color",
            ValueKind::Object => "Object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_payload() {
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Int(1).kind(), ValueKind::Int);
        assert_eq!(Value::Float(1.0).kind(), ValueKind::Float);
        assert_eq!(Value::String("x".into()).kind(), ValueKind::String);
        assert_eq!(Value::Vector3(Vec3::ZERO).kind(), ValueKind::Vector3);
        assert_eq!(Value::Quaternion(Quat::IDENTITY).kind(), ValueKind::Quaternion);
        assert_eq!(Value::Color(Color::RED).kind(), ValueKind::Color);
        assert_eq!(Value::Object(ObjRef::null()).kind(), ValueKind::Object);
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ValueKind::Vector3.to_string(), "Vector3");
        assert_eq!(ValueKind::ALL.len(), 8);
    }
}
