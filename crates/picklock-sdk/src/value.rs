//! Runtime value representation.
//!
//! A safe enum rather than a packed word: this model has no garbage
//! collector and favors clarity over raw speed. Objects are shared
//! references onto a flat field-slot vector; arrays carry an element-type
//! tag so `int[]` and `Integer[]` stay distinct at runtime.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::{ClassId, Primitive, Ty};

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null reference
    Null,
    /// `boolean`
    Bool(bool),
    /// `byte`
    Byte(i8),
    /// `char`
    Char(char),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// A string value
    Str(String),
    /// A heap object
    Object(ObjRef),
    /// An array
    Array(ArrayRef),
    /// A class value (drives static-member access)
    Class(ClassId),
}

impl Value {
    /// Check if this is the null reference.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Primitive kind of a scalar value, `None` otherwise.
    pub fn primitive_kind(&self) -> Option<Primitive> {
        match self {
            Value::Bool(_) => Some(Primitive::Bool),
            Value::Byte(_) => Some(Primitive::Byte),
            Value::Char(_) => Some(Primitive::Char),
            Value::Short(_) => Some(Primitive::Short),
            Value::Int(_) => Some(Primitive::Int),
            Value::Long(_) => Some(Primitive::Long),
            Value::Float(_) => Some(Primitive::Float),
            Value::Double(_) => Some(Primitive::Double),
            _ => None,
        }
    }

    /// Borrow the object reference, if this is an object.
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Borrow the array reference, if this is an array.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Class id of a class value.
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Value::Class(id) => Some(*id),
            _ => None,
        }
    }

    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract an `int`, if this is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract a `long`, if this is one.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Extract a `boolean`, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i8> for Value {
    fn from(b: i8) -> Self {
        Value::Byte(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i16> for Value {
    fn from(s: i16) -> Self {
        Value::Short(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Object(obj)
    }
}

impl From<ArrayRef> for Value {
    fn from(array: ArrayRef) -> Self {
        Value::Array(array)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Short(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "object@{}", obj.object_id()),
            Value::Array(array) => {
                let items: Vec<String> =
                    array.to_vec().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Class(id) => write!(f, "class#{}", id.0),
        }
    }
}

/// Shared reference to a heap object.
#[derive(Debug, Clone)]
pub struct ObjRef(Arc<ObjInner>);

#[derive(Debug)]
struct ObjInner {
    /// Unique object ID (assigned on creation)
    object_id: u64,
    /// Class of the instance
    class: ClassId,
    /// Flat field slots across the ancestor chain
    slots: RwLock<Vec<Value>>,
}

impl ObjRef {
    pub(crate) fn new(class: ClassId, slots: Vec<Value>) -> Self {
        ObjRef(Arc::new(ObjInner {
            object_id: generate_object_id(),
            class,
            slots: RwLock::new(slots),
        }))
    }

    /// Class of the instance.
    pub fn class(&self) -> ClassId {
        self.0.class
    }

    /// Unique object ID.
    pub fn object_id(&self) -> u64 {
        self.0.object_id
    }

    /// Reference identity with another object.
    pub fn same(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn get_slot(&self, index: usize) -> Option<Value> {
        self.0.slots.read().get(index).cloned()
    }

    pub(crate) fn set_slot(&self, index: usize, value: Value) -> bool {
        let mut slots = self.0.slots.write();
        if index < slots.len() {
            slots[index] = value;
            true
        } else {
            false
        }
    }

    /// Number of field slots, including inherited ones.
    pub fn field_count(&self) -> usize {
        self.0.slots.read().len()
    }
}

impl PartialEq for ObjRef {
    /// Structural equality: same class and equal field slots.
    fn eq(&self, other: &ObjRef) -> bool {
        if self.same(other) {
            return true;
        }
        self.0.class == other.0.class && *self.0.slots.read() == *other.0.slots.read()
    }
}

/// Shared reference to an array with an element-type tag.
#[derive(Debug, Clone)]
pub struct ArrayRef(Arc<ArrayInner>);

#[derive(Debug)]
struct ArrayInner {
    /// Declared element type
    element: Ty,
    /// Array elements
    items: RwLock<Vec<Value>>,
}

impl ArrayRef {
    /// Create an array with the given element type and contents.
    pub fn new(element: Ty, items: Vec<Value>) -> Self {
        ArrayRef(Arc::new(ArrayInner {
            element,
            items: RwLock::new(items),
        }))
    }

    /// Declared element type.
    pub fn element_type(&self) -> &Ty {
        &self.0.element
    }

    /// Array length.
    pub fn len(&self) -> usize {
        self.0.items.read().len()
    }

    /// Check if the array is empty.
    pub fn is_empty(&self) -> bool {
        self.0.items.read().is_empty()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.items.read().get(index).cloned()
    }

    /// Store `value` at `index`; `false` if out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut items = self.0.items.write();
        if index < items.len() {
            items[index] = value;
            true
        } else {
            false
        }
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.read().clone()
    }
}

impl PartialEq for ArrayRef {
    /// Structural equality: same element type and equal elements.
    fn eq(&self, other: &ArrayRef) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.0.element == other.0.element && *self.0.items.read() == *other.0.items.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_kind() {
        assert_eq!(Value::Int(5).primitive_kind(), Some(Primitive::Int));
        assert_eq!(Value::Bool(true).primitive_kind(), Some(Primitive::Bool));
        assert_eq!(Value::Str("x".to_string()).primitive_kind(), None);
        assert_eq!(Value::Null.primitive_kind(), None);
    }

    #[test]
    fn test_object_ids_unique() {
        let a = ObjRef::new(ClassId(0), vec![]);
        let b = ObjRef::new(ClassId(0), vec![]);
        assert_ne!(a.object_id(), b.object_id());
    }

    #[test]
    fn test_object_structural_equality() {
        let a = ObjRef::new(ClassId(1), vec![Value::Int(5)]);
        let b = ObjRef::new(ClassId(1), vec![Value::Int(5)]);
        let c = ObjRef::new(ClassId(1), vec![Value::Int(6)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.same(&b));
    }

    #[test]
    fn test_object_equality_requires_same_class() {
        let a = ObjRef::new(ClassId(1), vec![]);
        let b = ObjRef::new(ClassId(2), vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_array_element_tag_distinguishes() {
        let ints = ArrayRef::new(
            Ty::Primitive(Primitive::Int),
            vec![Value::Int(5), Value::Int(3)],
        );
        let boxed = ArrayRef::new(Ty::Class(ClassId(7)), vec![Value::Int(5), Value::Int(3)]);
        assert_ne!(ints, boxed);
    }

    #[test]
    fn test_array_get_set() {
        let array = ArrayRef::new(Ty::Primitive(Primitive::Int), vec![Value::Int(1)]);
        assert!(array.set(0, Value::Int(9)));
        assert!(!array.set(1, Value::Int(9)));
        assert_eq!(array.get(0), Some(Value::Int(9)));
        assert_eq!(array.get(1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Str("Charlie".to_string()).to_string(), "Charlie");
        let array = ArrayRef::new(
            Ty::Primitive(Primitive::Int),
            vec![Value::Int(1), Value::Int(2)],
        );
        assert_eq!(Value::Array(array).to_string(), "[1, 2]");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(5), Value::Int(5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("x"), Value::Str("x".to_string()));
    }
}
