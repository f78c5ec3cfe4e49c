//! Shared fixture classes for the integration suites.
//!
//! `Parent`/`Child` mirror the kind of production types the engine exists
//! to crack open: private fields, private methods, private and public
//! constructors, statics, finals, and a compile-time constant.

#![allow(dead_code)]

use picklock_sdk::{
    ArrayRef, ClassBuilder, ClassId, CtorDef, FieldDef, MethodDef, Primitive, Runtime, Thrown,
    Ty, Value,
};

/// The registered fixture model.
pub struct Fixtures {
    pub runtime: Runtime,
    pub parent: ClassId,
    pub child: ClassId,
    pub primitives: ClassId,
    pub explosive: ClassId,
}

pub fn fixtures() -> Fixtures {
    let runtime = Runtime::new();
    let string = Ty::Class(runtime.core().string);
    let object = Ty::Class(runtime.core().object);
    let integer = Ty::Class(runtime.core().integer);
    let int = Ty::Primitive(Primitive::Int);

    let parent = ClassBuilder::new("Parent")
        .field(FieldDef::new("name", string.clone()))
        .field(
            FieldDef::new("motto", string.clone())
                .as_final()
                .with_default(Value::from("fixed")),
        )
        .field(FieldDef::new("instances", int.clone()).as_static())
        .field(FieldDef::new("MAGIC", int.clone()).as_constant(Value::Int(42)))
        .field(FieldDef::new("ints", Ty::array_of(int.clone())))
        .field(FieldDef::new("boxedInts", Ty::array_of(integer.clone())))
        .field(FieldDef::new("strings", Ty::array_of(string.clone())))
        .field(FieldDef::new("objects", Ty::array_of(object.clone())))
        .constructor(
            CtorDef::new(|rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "name", call.arg(0));
                Ok(Value::Null)
            })
            .with_param(string.clone())
            .public(),
        )
        .constructor(
            CtorDef::new(|rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "name", Value::from("Unknown"));
                Ok(Value::Null)
            })
            .public(),
        )
        .method(
            MethodDef::new("getName", |rt, call| {
                let this = call.receiver_object()?;
                Ok(rt.object_get_field(this, "name").unwrap_or(Value::Null))
            })
            .returns(string.clone()),
        )
        .method(
            MethodDef::new("setName", |rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "name", call.arg(0));
                Ok(Value::Null)
            })
            .with_param(string.clone()),
        )
        .method(
            MethodDef::new("setInts", |rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "ints", call.arg(0));
                Ok(Value::Null)
            })
            .with_param(Ty::array_of(int.clone())),
        )
        .method(
            MethodDef::new("setBoxedInts", |rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "boxedInts", call.arg(0));
                Ok(Value::Null)
            })
            .with_param(Ty::array_of(integer.clone())),
        )
        .method(
            MethodDef::new("setStrings", |rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "strings", call.arg(0));
                Ok(Value::Null)
            })
            .with_param(Ty::array_of(string.clone())),
        )
        .method(
            MethodDef::new("setObjects", |rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "objects", call.arg(0));
                Ok(Value::Null)
            })
            .with_param(Ty::array_of(object.clone())),
        )
        .method(
            MethodDef::new("setNumbers", |rt, call| {
                let this = call.receiver_object()?;
                let pair = ArrayRef::new(
                    Ty::Primitive(Primitive::Int),
                    vec![call.arg(0), call.arg(1)],
                );
                rt.object_set_field(this, "ints", Value::Array(pair));
                Ok(Value::Null)
            })
            .with_param(int.clone())
            .with_param(int.clone()),
        )
        .method(
            MethodDef::new("defaultName", |_, _| Ok(Value::from("Unknown")))
                .as_static()
                .returns(string.clone()),
        )
        .method(MethodDef::new("throwChecked", |_, _| {
            Err(Thrown::checked("java.io.IOException", "boom"))
        }))
        .method(MethodDef::new("throwUnchecked", |_, _| {
            Err(Thrown::unchecked("java.lang.IllegalStateException", "boom"))
        }))
        .register(&runtime);

    let child = ClassBuilder::new("Child")
        .extends(parent)
        .field(FieldDef::new("number", int.clone()))
        .constructor(
            CtorDef::new(|rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "name", call.arg(0));
                rt.object_set_field(this, "number", Value::Int(8));
                Ok(Value::Null)
            })
            .with_param(string.clone())
            .public(),
        )
        .constructor(
            CtorDef::new(|rt, call| {
                let this = call.receiver_object()?;
                rt.object_set_field(this, "name", call.arg(0));
                rt.object_set_field(this, "number", call.arg(1));
                Ok(Value::Null)
            })
            .with_param(string.clone())
            .with_param(integer.clone())
            .public(),
        )
        .method(
            MethodDef::new("getNumber", |rt, call| {
                let this = call.receiver_object()?;
                Ok(rt.object_get_field(this, "number").unwrap_or(Value::Null))
            })
            .returns(int.clone()),
        )
        .register(&runtime);

    let primitives = ClassBuilder::new("Primitives")
        .field(FieldDef::new("flag", Ty::Primitive(Primitive::Bool)))
        .field(FieldDef::new("b", Ty::Primitive(Primitive::Byte)))
        .field(FieldDef::new("c", Ty::Primitive(Primitive::Char)))
        .field(FieldDef::new("s", Ty::Primitive(Primitive::Short)))
        .field(FieldDef::new("i", Ty::Primitive(Primitive::Int)))
        .field(FieldDef::new("l", Ty::Primitive(Primitive::Long)))
        .field(FieldDef::new("f", Ty::Primitive(Primitive::Float)))
        .field(FieldDef::new("d", Ty::Primitive(Primitive::Double)))
        .field(FieldDef::new("boxedInt", integer.clone()))
        .field(FieldDef::new("data", Ty::array_of(int.clone())))
        .field(FieldDef::new("any", object.clone()))
        .register(&runtime);

    let explosive = ClassBuilder::new("Explosive")
        .constructor(
            CtorDef::new(|_, _| Err(Thrown::checked("java.io.IOException", "refused")))
                .public(),
        )
        .register(&runtime);

    Fixtures {
        runtime,
        parent,
        child,
        primitives,
        explosive,
    }
}

/// `int[]` literal.
pub fn int_array(values: &[i32]) -> Value {
    Value::Array(ArrayRef::new(
        Ty::Primitive(Primitive::Int),
        values.iter().map(|i| Value::Int(*i)).collect(),
    ))
}

/// `Integer[]` literal.
pub fn boxed_int_array(runtime: &Runtime, values: &[i32]) -> Value {
    Value::Array(ArrayRef::new(
        Ty::Class(runtime.core().integer),
        values.iter().map(|i| Value::Int(*i)).collect(),
    ))
}

/// `String[]` literal.
pub fn string_array(runtime: &Runtime, values: &[&str]) -> Value {
    Value::Array(ArrayRef::new(
        Ty::Class(runtime.core().string),
        values.iter().map(|s| Value::from(*s)).collect(),
    ))
}
