//! Member handles and metadata snapshots.
//!
//! A handle addresses a declared member as (declaring class, declaration
//! index); a metadata snapshot is cloned out of the class table per request
//! so callers never borrow into the registry.

use crate::types::{ClassId, Ty};

/// Declared visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible to subclasses
    Protected,
    /// Visible within the declaring namespace
    Package,
    /// Visible only to the declaring class
    Private,
}

impl Visibility {
    /// Check if access requires no bypass.
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Handle to a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldHandle {
    /// Declaring class
    pub class: ClassId,
    /// Declaration index within the class
    pub index: usize,
}

/// Handle to a declared method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle {
    /// Declaring class
    pub class: ClassId,
    /// Declaration index within the class
    pub index: usize,
}

/// Handle to a declared constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CtorHandle {
    /// Declaring class
    pub class: ClassId,
    /// Declaration index within the class
    pub index: usize,
}

/// Any member handle, for access-control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberHandle {
    /// A field
    Field(FieldHandle),
    /// A method
    Method(MethodHandle),
    /// A constructor
    Constructor(CtorHandle),
}

impl From<FieldHandle> for MemberHandle {
    fn from(handle: FieldHandle) -> Self {
        MemberHandle::Field(handle)
    }
}

impl From<MethodHandle> for MemberHandle {
    fn from(handle: MethodHandle) -> Self {
        MemberHandle::Method(handle)
    }
}

impl From<CtorHandle> for MemberHandle {
    fn from(handle: CtorHandle) -> Self {
        MemberHandle::Constructor(handle)
    }
}

/// Snapshot of a field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMeta {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: Ty,
    /// Declared visibility
    pub visibility: Visibility,
    /// Whether the field is static
    pub is_static: bool,
    /// Whether the field is final
    pub is_final: bool,
    /// Whether the field is a compile-time constant (refuses final override)
    pub is_constant: bool,
    /// Class the field was declared in
    pub declared_in: ClassId,
}

/// Snapshot of a method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMeta {
    /// Method name
    pub name: String,
    /// Declared parameter types, in order
    pub params: Vec<Ty>,
    /// Declared return type; `None` for void
    pub ret: Option<Ty>,
    /// Declared visibility
    pub visibility: Visibility,
    /// Whether the method is static
    pub is_static: bool,
    /// Class the method was declared in
    pub declared_in: ClassId,
}

/// Snapshot of a constructor declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct CtorMeta {
    /// Declared parameter types, in order
    pub params: Vec<Ty>,
    /// Declared visibility
    pub visibility: Visibility,
    /// Class the constructor was declared in
    pub declared_in: ClassId,
}
