//! The capability interface the access engine is written against.
//!
//! `Mirror` is everything the engine may ask of a host runtime: enumerate a
//! class's declared members, snapshot their metadata, walk the ancestor
//! relation, force the per-member access bypass, and perform the raw
//! read/write/invoke/construct primitives. The engine contains no other
//! knowledge of the host; swapping the host means implementing this trait.

use crate::meta::{
    CtorHandle, CtorMeta, FieldHandle, FieldMeta, MemberHandle, MethodHandle, MethodMeta,
};
use crate::types::{ClassId, Ty};
use crate::value::Value;

/// Failure raised by an invoked member itself, as opposed to a failure the
/// engine detected. Carries the failure's class name, message, and whether
/// it is a checked (recoverable) failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{class_name}: {message}")]
pub struct Thrown {
    /// Class name of the failure
    pub class_name: String,
    /// Failure message
    pub message: String,
    /// Checked failures get wrapped by the engine; unchecked ones pass through
    pub checked: bool,
}

impl Thrown {
    /// A checked (recoverable) failure.
    pub fn checked(class_name: impl Into<String>, message: impl Into<String>) -> Thrown {
        Thrown {
            class_name: class_name.into(),
            message: message.into(),
            checked: true,
        }
    }

    /// An unchecked failure.
    pub fn unchecked(class_name: impl Into<String>, message: impl Into<String>) -> Thrown {
        Thrown {
            class_name: class_name.into(),
            message: message.into(),
            checked: false,
        }
    }

    pub(crate) fn null_pointer(message: impl Into<String>) -> Thrown {
        Thrown::unchecked("java.lang.NullPointerException", message)
    }

    pub(crate) fn illegal_access(message: impl Into<String>) -> Thrown {
        Thrown::unchecked("java.lang.IllegalAccessException", message)
    }

    pub(crate) fn illegal_argument(message: impl Into<String>) -> Thrown {
        Thrown::unchecked("java.lang.IllegalArgumentException", message)
    }
}

/// Host-introspection capability interface.
///
/// Handles passed to the metadata and raw-access methods must come from the
/// same mirror's `declared_*` enumerations; a foreign handle is a contract
/// violation and may panic, like any out-of-bounds index.
pub trait Mirror {
    /// The universal root class.
    fn root_class(&self) -> ClassId;

    /// Exact class lookup by registered (qualified) name.
    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    /// Registered name of a class.
    fn class_name(&self, class: ClassId) -> String;

    /// Direct ancestor of a class; `None` for the root.
    fn parent_of(&self, class: ClassId) -> Option<ClassId>;

    /// Handles of the fields declared directly on `class`.
    fn declared_fields(&self, class: ClassId) -> Vec<FieldHandle>;

    /// Handles of the methods declared directly on `class`.
    fn declared_methods(&self, class: ClassId) -> Vec<MethodHandle>;

    /// Handles of the constructors declared directly on `class`.
    fn declared_constructors(&self, class: ClassId) -> Vec<CtorHandle>;

    /// Metadata snapshot of a declared field.
    fn field_meta(&self, field: FieldHandle) -> FieldMeta;

    /// Metadata snapshot of a declared method.
    fn method_meta(&self, method: MethodHandle) -> MethodMeta;

    /// Metadata snapshot of a declared constructor.
    fn ctor_meta(&self, ctor: CtorHandle) -> CtorMeta;

    /// Runtime type of a value; `None` for the null reference.
    fn type_of(&self, value: &Value) -> Option<Ty>;

    /// Force the member's access bypass flag. Never rolled back.
    fn bypass_access(&self, member: MemberHandle);

    /// Attempt to lift a final field's write protection for subsequent
    /// writes. Returns `false` when the host refuses (compile-time-constant
    /// fields). Trivially succeeds for non-final fields.
    fn clear_final(&self, field: FieldHandle) -> bool;

    /// Read a field's current value. `target` is ignored for static fields.
    fn read_raw(&self, field: FieldHandle, target: Option<&Value>) -> Result<Value, Thrown>;

    /// Store a value into a field. `target` is ignored for static fields.
    fn write_raw(
        &self,
        field: FieldHandle,
        target: Option<&Value>,
        value: Value,
    ) -> Result<(), Thrown>;

    /// Invoke a method. `target` is ignored for static methods.
    fn invoke_raw(
        &self,
        method: MethodHandle,
        target: Option<&Value>,
        args: Vec<Value>,
    ) -> Result<Value, Thrown>;

    /// Construct a new instance of `class` through the given constructor
    /// (which may have been declared on an ancestor).
    fn construct_raw(
        &self,
        class: ClassId,
        ctor: CtorHandle,
        args: Vec<Value>,
    ) -> Result<Value, Thrown>;

    /// Walk the ancestor chain from `sub` looking for `ancestor`.
    fn is_subclass_of(&self, sub: ClassId, ancestor: ClassId) -> bool {
        if sub == ancestor {
            return true;
        }
        let mut current = self.parent_of(sub);
        while let Some(class) = current {
            if class == ancestor {
                return true;
            }
            current = self.parent_of(class);
        }
        false
    }

    /// Human-readable name of a type handle.
    fn type_name(&self, ty: &Ty) -> String {
        match ty {
            Ty::Primitive(p) => p.keyword().to_string(),
            Ty::Class(id) => self.class_name(*id),
            Ty::Array(element) => format!("{}[]", self.type_name(element)),
        }
    }
}
