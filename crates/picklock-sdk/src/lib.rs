//! picklock-sdk — host-runtime model for the picklock access engine.
//!
//! This crate holds everything the engine treats as "the host": the runtime
//! value representation ([`Value`]), type handles ([`Ty`]), member handles
//! and metadata snapshots, the [`Mirror`] capability interface, and a
//! reference [`Runtime`] implementation with a fluent [`ClassBuilder`] for
//! defining fixture classes. The engine crate never touches anything but
//! the `Mirror` surface.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod bootstrap;
mod builder;
mod meta;
mod mirror;
mod runtime;
mod types;
mod value;

pub use bootstrap::CoreClasses;
pub use builder::{ClassBuilder, CtorDef, FieldDef, MethodDef, NativeCall, NativeFn};
pub use meta::{
    CtorHandle, CtorMeta, FieldHandle, FieldMeta, MemberHandle, MethodHandle, MethodMeta,
    Visibility,
};
pub use mirror::{Mirror, Thrown};
pub use runtime::Runtime;
pub use types::{ClassId, Primitive, Ty};
pub use value::{ArrayRef, ObjRef, Value};
