//! Class definition builders for assembling a runtime model.
//!
//! Fixture classes are defined fluently and registered on a [`Runtime`]:
//!
//! ```ignore
//! let parent = ClassBuilder::new("Parent")
//!     .field(FieldDef::new("name", Ty::Class(string)))
//!     .constructor(CtorDef::new(|rt, call| { ... }).with_param(Ty::Class(string)))
//!     .method(MethodDef::new("getName", |rt, call| { ... }).returns(Ty::Class(string)))
//!     .register(&runtime);
//! ```
//!
//! Members default to private; the model exists so tests can reach them
//! anyway.

use std::fmt;
use std::sync::Arc;

use crate::meta::Visibility;
use crate::mirror::Thrown;
use crate::runtime::Runtime;
use crate::types::{ClassId, Primitive, Ty};
use crate::value::{ObjRef, Value};

/// Receiver and arguments handed to a native member body.
#[derive(Debug, Clone, Copy)]
pub struct NativeCall<'a> {
    /// The receiver; `None` for static invocation
    pub this: Option<&'a Value>,
    /// The reconciled argument list
    pub args: &'a [Value],
}

impl<'a> NativeCall<'a> {
    /// The receiver, or a null-pointer failure when invoked without one.
    pub fn receiver(&self) -> Result<&'a Value, Thrown> {
        self.this
            .ok_or_else(|| Thrown::null_pointer("instance member invoked without a receiver"))
    }

    /// The receiver as an object instance.
    pub fn receiver_object(&self) -> Result<&'a ObjRef, Thrown> {
        self.receiver()?
            .as_object()
            .ok_or_else(|| Thrown::null_pointer("receiver is not an object instance"))
    }

    /// Argument at `index`, null when absent.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or(Value::Null)
    }
}

/// Body of a native method or constructor.
pub type NativeFn = Arc<dyn Fn(&Runtime, NativeCall<'_>) -> Result<Value, Thrown> + Send + Sync>;

/// Definition of a declared field.
#[derive(Debug, Clone)]
pub struct FieldDef {
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
    /// Whether the field is a compile-time constant
    pub is_constant: bool,
    /// Initial value; `None` means the type's zero value
    pub default: Option<Value>,
}

impl FieldDef {
    /// A private instance field of the given type.
    pub fn new(name: impl Into<String>, ty: Ty) -> FieldDef {
        FieldDef {
            name: name.into(),
            ty,
            visibility: Visibility::Private,
            is_static: false,
            is_final: false,
            is_constant: false,
            default: None,
        }
    }

    /// Set the declared visibility.
    pub fn visibility(mut self, visibility: Visibility) -> FieldDef {
        self.visibility = visibility;
        self
    }

    /// Mark as public.
    pub fn public(self) -> FieldDef {
        self.visibility(Visibility::Public)
    }

    /// Mark as protected.
    pub fn protected(self) -> FieldDef {
        self.visibility(Visibility::Protected)
    }

    /// Mark as static.
    pub fn as_static(mut self) -> FieldDef {
        self.is_static = true;
        self
    }

    /// Mark as final.
    pub fn as_final(mut self) -> FieldDef {
        self.is_final = true;
        self
    }

    /// Mark as a compile-time constant with the given value. Implies
    /// static and final; the host refuses to lift write protection.
    pub fn as_constant(mut self, value: Value) -> FieldDef {
        self.is_static = true;
        self.is_final = true;
        self.is_constant = true;
        self.default = Some(value);
        self
    }

    /// Set the initial value.
    pub fn with_default(mut self, value: Value) -> FieldDef {
        self.default = Some(value);
        self
    }

    /// The value a slot of this field starts with.
    pub(crate) fn initial_value(&self) -> Value {
        match &self.default {
            Some(value) => value.clone(),
            None => zero_value(&self.ty),
        }
    }
}

/// Zero value of a declared type.
fn zero_value(ty: &Ty) -> Value {
    match ty {
        Ty::Primitive(Primitive::Bool) => Value::Bool(false),
        Ty::Primitive(Primitive::Byte) => Value::Byte(0),
        Ty::Primitive(Primitive::Char) => Value::Char('\0'),
        Ty::Primitive(Primitive::Short) => Value::Short(0),
        Ty::Primitive(Primitive::Int) => Value::Int(0),
        Ty::Primitive(Primitive::Long) => Value::Long(0),
        Ty::Primitive(Primitive::Float) => Value::Float(0.0),
        Ty::Primitive(Primitive::Double) => Value::Double(0.0),
        Ty::Class(_) | Ty::Array(_) => Value::Null,
    }
}

/// Definition of a declared method.
#[derive(Clone)]
pub struct MethodDef {
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
    /// Native body
    pub body: NativeFn,
}

impl MethodDef {
    /// A private void method with no parameters.
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&Runtime, NativeCall<'_>) -> Result<Value, Thrown> + Send + Sync + 'static,
    ) -> MethodDef {
        MethodDef {
            name: name.into(),
            params: Vec::new(),
            ret: None,
            visibility: Visibility::Private,
            is_static: false,
            body: Arc::new(body),
        }
    }

    /// Append a parameter type.
    pub fn with_param(mut self, ty: Ty) -> MethodDef {
        self.params.push(ty);
        self
    }

    /// Set the return type.
    pub fn returns(mut self, ty: Ty) -> MethodDef {
        self.ret = Some(ty);
        self
    }

    /// Set the declared visibility.
    pub fn visibility(mut self, visibility: Visibility) -> MethodDef {
        self.visibility = visibility;
        self
    }

    /// Mark as public.
    pub fn public(self) -> MethodDef {
        self.visibility(Visibility::Public)
    }

    /// Mark as static.
    pub fn as_static(mut self) -> MethodDef {
        self.is_static = true;
        self
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// Definition of a declared constructor.
#[derive(Clone)]
pub struct CtorDef {
    /// Declared parameter types, in order
    pub params: Vec<Ty>,
    /// Declared visibility
    pub visibility: Visibility,
    /// Native body; runs with the freshly allocated instance as receiver
    pub body: NativeFn,
}

impl CtorDef {
    /// A private constructor with no parameters.
    pub fn new(
        body: impl Fn(&Runtime, NativeCall<'_>) -> Result<Value, Thrown> + Send + Sync + 'static,
    ) -> CtorDef {
        CtorDef {
            params: Vec::new(),
            visibility: Visibility::Private,
            body: Arc::new(body),
        }
    }

    /// Append a parameter type.
    pub fn with_param(mut self, ty: Ty) -> CtorDef {
        self.params.push(ty);
        self
    }

    /// Set the declared visibility.
    pub fn visibility(mut self, visibility: Visibility) -> CtorDef {
        self.visibility = visibility;
        self
    }

    /// Mark as public.
    pub fn public(self) -> CtorDef {
        self.visibility(Visibility::Public)
    }
}

impl fmt::Debug for CtorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtorDef")
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Fluent definition of a class to be registered on a runtime.
#[derive(Debug)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) parent: Option<ClassId>,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) methods: Vec<MethodDef>,
    pub(crate) ctors: Vec<CtorDef>,
}

impl ClassBuilder {
    /// Start a class definition. Classes without an explicit parent extend
    /// the runtime's root class.
    pub fn new(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
        }
    }

    /// Set the direct ancestor.
    pub fn extends(mut self, parent: ClassId) -> ClassBuilder {
        self.parent = Some(parent);
        self
    }

    /// Declare a field.
    pub fn field(mut self, field: FieldDef) -> ClassBuilder {
        self.fields.push(field);
        self
    }

    /// Declare a method.
    pub fn method(mut self, method: MethodDef) -> ClassBuilder {
        self.methods.push(method);
        self
    }

    /// Declare a constructor.
    pub fn constructor(mut self, ctor: CtorDef) -> ClassBuilder {
        self.ctors.push(ctor);
        self
    }

    /// Register the class and return its id.
    pub fn register(self, runtime: &Runtime) -> ClassId {
        runtime.install_class(self, false)
    }
}
