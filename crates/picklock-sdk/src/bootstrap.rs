//! Core-namespace bootstrap.
//!
//! Every runtime starts with the universal root class and the standard
//! boxed types registered, so unqualified shortcuts like `Integer` and the
//! root's `toString()`/`equals()`/`hashCode()`/`getClass()` behave the way
//! callers expect from the modeled host.

use crate::builder::{ClassBuilder, FieldDef, MethodDef, NativeCall};
use crate::mirror::{Mirror, Thrown};
use crate::runtime::Runtime;
use crate::types::{ClassId, Primitive, Ty};
use crate::value::Value;

/// Well-known classes present in every runtime.
#[derive(Debug, Clone, Copy)]
pub struct CoreClasses {
    /// `java.lang.Object`, the universal root
    pub object: ClassId,
    /// `java.lang.Class`
    pub class: ClassId,
    /// `java.lang.String`
    pub string: ClassId,
    /// `java.lang.Number`
    pub number: ClassId,
    /// `java.lang.Boolean`
    pub boolean: ClassId,
    /// `java.lang.Byte`
    pub byte: ClassId,
    /// `java.lang.Character`
    pub character: ClassId,
    /// `java.lang.Short`
    pub short: ClassId,
    /// `java.lang.Integer`
    pub integer: ClassId,
    /// `java.lang.Long`
    pub long: ClassId,
    /// `java.lang.Float`
    pub float: ClassId,
    /// `java.lang.Double`
    pub double: ClassId,
}

impl CoreClasses {
    pub(crate) fn uninit() -> CoreClasses {
        CoreClasses {
            object: ClassId(0),
            class: ClassId(0),
            string: ClassId(0),
            number: ClassId(0),
            boolean: ClassId(0),
            byte: ClassId(0),
            character: ClassId(0),
            short: ClassId(0),
            integer: ClassId(0),
            long: ClassId(0),
            float: ClassId(0),
            double: ClassId(0),
        }
    }

    /// Boxed class of a primitive kind.
    pub fn boxed(&self, primitive: Primitive) -> ClassId {
        match primitive {
            Primitive::Bool => self.boolean,
            Primitive::Byte => self.byte,
            Primitive::Char => self.character,
            Primitive::Short => self.short,
            Primitive::Int => self.integer,
            Primitive::Long => self.long,
            Primitive::Float => self.float,
            Primitive::Double => self.double,
        }
    }
}

/// Register the core namespace; called once from `Runtime::new`.
pub(crate) fn install(runtime: &Runtime) -> CoreClasses {
    let object = runtime.install_class(ClassBuilder::new("java.lang.Object"), true);
    let class = runtime.install_class(ClassBuilder::new("java.lang.Class").extends(object), false);
    let string =
        runtime.install_class(ClassBuilder::new("java.lang.String").extends(object), false);
    let number =
        runtime.install_class(ClassBuilder::new("java.lang.Number").extends(object), false);

    let boolean =
        runtime.install_class(ClassBuilder::new("java.lang.Boolean").extends(object), false);
    let character = runtime.install_class(
        ClassBuilder::new("java.lang.Character").extends(object),
        false,
    );
    let byte = runtime.install_class(ClassBuilder::new("java.lang.Byte").extends(number), false);
    let short = runtime.install_class(ClassBuilder::new("java.lang.Short").extends(number), false);
    let integer = runtime.install_class(
        ClassBuilder::new("java.lang.Integer")
            .extends(number)
            .field(
                FieldDef::new("MAX_VALUE", Ty::Primitive(Primitive::Int))
                    .public()
                    .as_constant(Value::Int(i32::MAX)),
            )
            .field(
                FieldDef::new("MIN_VALUE", Ty::Primitive(Primitive::Int))
                    .public()
                    .as_constant(Value::Int(i32::MIN)),
            ),
        false,
    );
    let long = runtime.install_class(ClassBuilder::new("java.lang.Long").extends(number), false);
    let float = runtime.install_class(ClassBuilder::new("java.lang.Float").extends(number), false);
    let double =
        runtime.install_class(ClassBuilder::new("java.lang.Double").extends(number), false);

    runtime.add_method(
        object,
        MethodDef::new("toString", object_to_string)
            .public()
            .returns(Ty::Class(string)),
    );
    runtime.add_method(
        object,
        MethodDef::new("hashCode", object_hash_code)
            .public()
            .returns(Ty::Primitive(Primitive::Int)),
    );
    runtime.add_method(
        object,
        MethodDef::new("equals", object_equals)
            .public()
            .with_param(Ty::Class(object))
            .returns(Ty::Primitive(Primitive::Bool)),
    );
    runtime.add_method(
        object,
        MethodDef::new("getClass", object_get_class)
            .public()
            .returns(Ty::Class(class)),
    );

    CoreClasses {
        object,
        class,
        string,
        number,
        boolean,
        byte,
        character,
        short,
        integer,
        long,
        float,
        double,
    }
}

fn object_to_string(rt: &Runtime, call: NativeCall<'_>) -> Result<Value, Thrown> {
    let receiver = call.receiver()?;
    let rendered = match receiver {
        Value::Object(obj) => format!("{}@{}", rt.class_name(obj.class()), obj.object_id()),
        Value::Class(id) => format!("class {}", rt.class_name(*id)),
        other => other.to_string(),
    };
    Ok(Value::Str(rendered))
}

fn object_hash_code(_rt: &Runtime, call: NativeCall<'_>) -> Result<Value, Thrown> {
    let receiver = call.receiver()?;
    let hash = match receiver {
        Value::Object(obj) => obj.object_id() as i32,
        Value::Str(s) => string_hash(s),
        Value::Bool(b) => {
            if *b {
                1231
            } else {
                1237
            }
        }
        Value::Byte(b) => *b as i32,
        Value::Char(c) => *c as i32,
        Value::Short(s) => *s as i32,
        Value::Int(i) => *i,
        Value::Long(l) => (*l ^ (*l >> 32)) as i32,
        Value::Float(f) => f.to_bits() as i32,
        Value::Double(d) => {
            let bits = d.to_bits();
            (bits ^ (bits >> 32)) as i32
        }
        _ => 0,
    };
    Ok(Value::Int(hash))
}

/// `s.chars().fold(0, |h, c| 31 * h + c)`, the modeled host's string hash.
fn string_hash(s: &str) -> i32 {
    s.chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

fn object_equals(_rt: &Runtime, call: NativeCall<'_>) -> Result<Value, Thrown> {
    let receiver = call.receiver()?;
    let other = call.arg(0);
    let equal = match (receiver, &other) {
        // Object identity at the root, not structure.
        (Value::Object(a), Value::Object(b)) => a.same(b),
        _ => *receiver == other,
    };
    Ok(Value::Bool(equal))
}

fn object_get_class(rt: &Runtime, call: NativeCall<'_>) -> Result<Value, Thrown> {
    let receiver = call.receiver()?;
    match rt.receiver_class(receiver) {
        Some(class) => Ok(Value::Class(class)),
        None => Err(Thrown::null_pointer("null has no class")),
    }
}
