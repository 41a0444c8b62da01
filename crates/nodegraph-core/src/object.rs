//! Host object references and declared type identity.
//!
//! Graph values of kind Object are [`ObjRef`]s: shared, nullable handles to
//! host types. Host types implement [`NodeObject`] (normally via
//! `#[derive(NodeType)]`) and declare at most one base type; the declared
//! chain is what inheritance-aware binding lookup and downcasts walk, since
//! Rust has no structural subtyping to reflect over.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::type_hash::TypeHash;

/// Static identity of an exposed host type.
///
/// Lives in a `const` per type so descriptors and manifests can share it by
/// reference. The parent pointer forms the declared ancestor chain.
#[derive(Debug)]
pub struct TypeInfo {
    pub name: &'static str,
    pub hash: TypeHash,
    pub parent: Option<&'static TypeInfo>,
}

impl TypeInfo {
    /// Build a type info, hashing the name at compile time.
    pub const fn new(name: &'static str, parent: Option<&'static TypeInfo>) -> Self {
        TypeInfo {
            name,
            hash: TypeHash::from_name(name),
            parent,
        }
    }

    /// Whether this type is `hash` or has it among its declared ancestors.
    pub fn is_a(&'static self, hash: TypeHash) -> bool {
        self.chain().any(|info| info.hash == hash)
    }

    /// Iterate this type followed by its declared ancestors, nearest first.
    pub fn chain(&'static self) -> impl Iterator<Item = &'static TypeInfo> {
        let mut next = Some(self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.parent;
            Some(current)
        })
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for TypeInfo {}

/// Object-safe surface every exposed host type implements.
///
/// Implemented by `#[derive(NodeType)]`; hand-written impls are possible but
/// must keep `ancestor_any` consistent with the declared base chain.
pub trait NodeObject: Any + Send + Sync {
    /// Static identity of the concrete type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Upcast to `Any` for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Resolve a view of this object as the type identified by `hash`,
    /// delegating through the embedded base value when the hash names an
    /// ancestor.
    fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any>;
}

/// Static-side identity for concrete host types.
pub trait NodeType: NodeObject + Sized {
    /// The type's shared identity record.
    const INFO: &'static TypeInfo;

    /// Hash shorthand for lookups.
    fn type_hash() -> TypeHash {
        Self::INFO.hash
    }
}

/// A shared, nullable reference to a host object.
///
/// This is the Object payload of the value stack. Cloning is cheap (Arc).
/// Null is a first-class value; typed casts fail on it with
/// [`DispatchError::InvalidCast`].
#[derive(Clone)]
pub struct ObjRef(Option<Arc<dyn NodeObject>>);

impl ObjRef {
    /// The null reference.
    pub const fn null() -> Self {
        ObjRef(None)
    }

    /// Wrap an already-shared host object.
    pub fn new(object: Arc<dyn NodeObject>) -> Self {
        ObjRef(Some(object))
    }

    /// Move a host value behind a fresh shared handle.
    pub fn from_value<T: NodeObject>(value: T) -> Self {
        ObjRef(Some(Arc::new(value)))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Hash of the referenced object's concrete type, or `EMPTY` for null.
    pub fn type_hash(&self) -> TypeHash {
        match &self.0 {
            Some(obj) => obj.type_info().hash,
            None => TypeHash::EMPTY,
        }
    }

    /// Name of the referenced object's concrete type, or `"null"`.
    pub fn type_name(&self) -> &'static str {
        match &self.0 {
            Some(obj) => obj.type_info().name,
            None => "null",
        }
    }

    /// Whether the referenced object is of the given type or a descendant
    /// of it. Null is not an instance of anything.
    pub fn is_a(&self, hash: TypeHash) -> bool {
        match &self.0 {
            Some(obj) => obj.type_info().is_a(hash),
            None => false,
        }
    }

    /// Borrow the object as `T`, walking the declared base chain.
    pub fn downcast_ref<T: NodeType>(&self) -> Option<&T> {
        self.0
            .as_ref()?
            .ancestor_any(T::INFO.hash)?
            .downcast_ref::<T>()
    }

    /// Borrow the object as `T`, or fail with an [`DispatchError::InvalidCast`]
    /// naming both types. Null always fails.
    pub fn expect_cast<T: NodeType>(&self) -> Result<&T, DispatchError> {
        self.downcast_ref::<T>()
            .ok_or_else(|| DispatchError::InvalidCast {
                from: self.type_name(),
                to: T::INFO.name,
            })
    }

    /// Whether two references point at the same object (null == null).
    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Default for ObjRef {
    fn default() -> Self {
        ObjRef::null()
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(obj) => write!(f, "ObjRef({})", obj.type_info().name),
            None => write!(f, "ObjRef(null)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget {
        id: u32,
    }

    impl NodeObject for Widget {
        fn type_info(&self) -> &'static TypeInfo {
            <Widget as NodeType>::INFO
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any> {
            (hash == Widget::INFO.hash).then_some(self as &dyn Any)
        }
    }

    impl NodeType for Widget {
        const INFO: &'static TypeInfo = &TypeInfo::new("Widget", None);
    }

    #[derive(Debug)]
    struct Gadget {
        base: Widget,
    }

    impl NodeObject for Gadget {
        fn type_info(&self) -> &'static TypeInfo {
            <Gadget as NodeType>::INFO
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn ancestor_any(&self, hash: TypeHash) -> Option<&dyn Any> {
            if hash == Gadget::INFO.hash {
                return Some(self as &dyn Any);
            }
            self.base.ancestor_any(hash)
        }
    }

    impl NodeType for Gadget {
        const INFO: &'static TypeInfo = &TypeInfo::new("Gadget", Some(Widget::INFO));
    }

    #[test]
    fn null_ref_behavior() {
        let r = ObjRef::null();
        assert!(r.is_null());
        assert_eq!(r.type_hash(), TypeHash::EMPTY);
        assert_eq!(r.type_name(), "null");
        assert!(!r.is_a(Widget::INFO.hash));
        assert!(r.downcast_ref::<Widget>().is_none());
    }

    #[test]
    fn downcast_to_concrete_type() {
        let r = ObjRef::from_value(Widget { id: 7 });
        assert_eq!(r.downcast_ref::<Widget>().unwrap().id, 7);
    }

    #[test]
    fn downcast_through_declared_base() {
        let r = ObjRef::from_value(Gadget {
            base: Widget { id: 3 },
        });
        assert!(r.is_a(Widget::INFO.hash));
        assert_eq!(r.downcast_ref::<Widget>().unwrap().id, 3);
        assert!(r.downcast_ref::<Gadget>().is_some());
    }

    #[test]
    fn base_is_not_a_descendant() {
        let r = ObjRef::from_value(Widget { id: 1 });
        assert!(!r.is_a(Gadget::INFO.hash));
        assert!(r.downcast_ref::<Gadget>().is_none());
    }

    #[test]
    fn expect_cast_reports_both_types() {
        let r = ObjRef::from_value(Widget { id: 1 });
        let err = r.expect_cast::<Gadget>().unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidCast {
                from: "Widget",
                to: "Gadget",
            }
        );
    }

    #[test]
    fn ptr_eq_tracks_identity() {
        let a = ObjRef::from_value(Widget { id: 1 });
        let b = a.clone();
        let c = ObjRef::from_value(Widget { id: 1 });
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert!(ObjRef::null().ptr_eq(&ObjRef::null()));
    }
}
