//! Invocation facade: the public surface of the engine.
//!
//! Every operation is a short, stateless pipeline: parse (methods only) →
//! resolve parameter types → locate the member → reconcile arguments →
//! raw primitive. The accessor holds nothing between calls; members are
//! re-resolved every time.

use picklock_sdk::{ClassId, Mirror, Ty, Value};

use crate::error::{AccessError, AccessResult};
use crate::locate;
use crate::reconcile;
use crate::resolve;
use crate::signature::MemberDescriptor;

/// Reflective access to members of a host mirror's values, regardless of
/// declared visibility.
pub struct Accessor<'m, M: Mirror> {
    mirror: &'m M,
}

impl<'m, M: Mirror> Accessor<'m, M> {
    /// An accessor over the given mirror.
    pub fn new(mirror: &'m M) -> Accessor<'m, M> {
        Accessor { mirror }
    }

    /// Every field name declared across the target's ancestor chain.
    /// Empty for a null target.
    pub fn field_names(&self, target: &Value) -> Vec<String> {
        locate::field_names(self.mirror, target)
    }

    /// Every method signature across the target's ancestor chain,
    /// formatted `"<returnType> <name>(<paramTypes>)"`. Empty for a null
    /// target.
    pub fn method_signatures(&self, target: &Value) -> Vec<String> {
        locate::method_signatures(self.mirror, target)
    }

    /// Declared type of the named field.
    pub fn field_type(&self, target: &Value, name: &str) -> AccessResult<Ty> {
        let start = locate::target_class(self.mirror, target)?;
        Ok(locate::find_field(self.mirror, start, name)?.meta.ty)
    }

    /// Read the named field, bypassing visibility.
    pub fn get_value(&self, target: &Value, name: &str) -> AccessResult<Value> {
        let start = locate::target_class(self.mirror, target)?;
        let field = locate::find_field(self.mirror, start, name)?;
        let receiver = if field.meta.is_static {
            None
        } else {
            Some(target)
        };
        self.mirror
            .read_raw(field.handle, receiver)
            .map_err(AccessError::from_thrown)
    }

    /// Write the named field, bypassing visibility and lifting finality
    /// where the host permits. Returns the target for chaining.
    pub fn set_value(&self, target: &Value, name: &str, value: Value) -> AccessResult<Value> {
        let start = locate::target_class(self.mirror, target)?;
        let field = locate::find_field(self.mirror, start, name)?;
        if field.meta.is_final && !self.mirror.clear_final(field.handle) {
            return Err(AccessError::ImmutableMember {
                field: name.to_string(),
                class: self.mirror.class_name(field.meta.declared_in),
            });
        }
        let receiver = if field.meta.is_static {
            None
        } else {
            Some(target)
        };
        self.mirror
            .write_raw(field.handle, receiver, value)
            .map_err(AccessError::from_thrown)?;
        Ok(target.clone())
    }

    /// Construct an instance of `class`. Parameter types are taken as
    /// given, or inferred from the arguments' runtime types when absent
    /// (a null argument infers the root class).
    pub fn instantiate(
        &self,
        class: ClassId,
        param_types: Option<&[Ty]>,
        args: &[Value],
    ) -> AccessResult<Value> {
        let inferred: Vec<Ty>;
        let params: &[Ty] = match param_types {
            Some(params) => params,
            None => {
                inferred = args
                    .iter()
                    .map(|arg| {
                        self.mirror
                            .type_of(arg)
                            .unwrap_or(Ty::Class(self.mirror.root_class()))
                    })
                    .collect();
                inferred.as_slice()
            }
        };
        let ctor = locate::find_constructor(self.mirror, class, params)?;
        let label = locate::callable_label(self.mirror, "<init>", &ctor.meta.params);
        let plan = reconcile::reconcile(self.mirror, &label, &ctor.meta.params, args)?;
        self.mirror
            .construct_raw(class, ctor.handle, plan.into_args())
            .map_err(AccessError::from_thrown)
    }

    /// Invoke the method named by `signature` (e.g.
    /// `"setName(java.lang.String)"`). Void methods yield `Value::Null`.
    pub fn invoke(&self, target: &Value, signature: &str, args: &[Value]) -> AccessResult<Value> {
        let descriptor = MemberDescriptor::parse(signature)?;
        let mut params = Vec::with_capacity(descriptor.parameter_type_names.len());
        for name in &descriptor.parameter_type_names {
            params.push(resolve::resolve_type(self.mirror, name)?);
        }
        let start = locate::target_class(self.mirror, target)?;
        let method = locate::find_method(self.mirror, start, &descriptor.name, &params)?;
        let label = locate::callable_label(self.mirror, &method.meta.name, &method.meta.params);
        let plan = reconcile::reconcile(self.mirror, &label, &method.meta.params, args)?;
        let receiver = if method.meta.is_static {
            None
        } else {
            Some(target)
        };
        self.mirror
            .invoke_raw(method.handle, receiver, plan.into_args())
            .map_err(AccessError::from_thrown)
    }

    /// `"<typeName> {field1=value1, field2=value2}"`, fields in
    /// `field_names` order across the full ancestor chain.
    pub fn describe(&self, target: &Value) -> AccessResult<String> {
        let start = locate::target_class(self.mirror, target)?;
        let mut parts = Vec::new();
        for name in self.field_names(target) {
            // Resolution already succeeded during enumeration; a read
            // failure here is surfaced, not normalized.
            let value = self.get_value(target, &name)?;
            parts.push(format!("{}={}", name, render(self.mirror, &value)));
        }
        Ok(format!(
            "{} {{{}}}",
            self.mirror.class_name(start),
            parts.join(", ")
        ))
    }
}

/// Render a value the way the modeled host prints it.
fn render<M: Mirror>(mirror: &M, value: &Value) -> String {
    match value {
        Value::Object(obj) => format!("{}@{}", mirror.class_name(obj.class()), obj.object_id()),
        Value::Array(array) => {
            let items: Vec<String> = array
                .to_vec()
                .iter()
                .map(|item| render(mirror, item))
                .collect();
            format!("[{}]", items.join(", "))
        }
        Value::Class(id) => format!("class {}", mirror.class_name(*id)),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picklock_sdk::{ClassBuilder, FieldDef, Primitive, Runtime};

    #[test]
    fn test_null_target_rejected_for_value_access() {
        let runtime = Runtime::new();
        let accessor = Accessor::new(&runtime);
        assert!(matches!(
            accessor.get_value(&Value::Null, "name"),
            Err(AccessError::InvalidTarget)
        ));
        assert!(matches!(
            accessor.set_value(&Value::Null, "name", Value::Null),
            Err(AccessError::InvalidTarget)
        ));
        assert!(matches!(
            accessor.invoke(&Value::Null, "toString()", &[]),
            Err(AccessError::InvalidTarget)
        ));
    }

    #[test]
    fn test_null_target_enumerations_are_empty() {
        let runtime = Runtime::new();
        let accessor = Accessor::new(&runtime);
        assert!(accessor.field_names(&Value::Null).is_empty());
        assert!(accessor.method_signatures(&Value::Null).is_empty());
    }

    #[test]
    fn test_field_type_reports_declared_type() {
        let runtime = Runtime::new();
        let class = ClassBuilder::new("Holder")
            .field(FieldDef::new("count", Ty::Primitive(Primitive::Int)))
            .register(&runtime);
        let accessor = Accessor::new(&runtime);
        let obj = Value::Object(runtime.allocate(class));
        assert_eq!(
            accessor.field_type(&obj, "count").unwrap(),
            Ty::Primitive(Primitive::Int)
        );
        assert!(matches!(
            accessor.field_type(&obj, "ghost"),
            Err(AccessError::NoSuchMember { .. })
        ));
    }

    #[test]
    fn test_set_value_returns_target_for_chaining() {
        let runtime = Runtime::new();
        let class = ClassBuilder::new("Holder")
            .field(FieldDef::new("count", Ty::Primitive(Primitive::Int)))
            .register(&runtime);
        let accessor = Accessor::new(&runtime);
        let obj = Value::Object(runtime.allocate(class));
        let returned = accessor.set_value(&obj, "count", Value::Int(4)).unwrap();
        assert_eq!(returned, obj);
        assert_eq!(accessor.get_value(&obj, "count").unwrap(), Value::Int(4));
    }

    #[test]
    fn test_describe_renders_fields_in_order() {
        let runtime = Runtime::new();
        let class = ClassBuilder::new("Point")
            .field(
                FieldDef::new("x", Ty::Primitive(Primitive::Int)).with_default(Value::Int(1)),
            )
            .field(
                FieldDef::new("y", Ty::Primitive(Primitive::Int)).with_default(Value::Int(2)),
            )
            .register(&runtime);
        let accessor = Accessor::new(&runtime);
        let obj = Value::Object(runtime.allocate(class));
        assert_eq!(accessor.describe(&obj).unwrap(), "Point {x=1, y=2}");
    }

    #[test]
    fn test_describe_class_target_renders_statics() {
        let runtime = Runtime::new();
        let class = ClassBuilder::new("Counter")
            .field(
                FieldDef::new("total", Ty::Primitive(Primitive::Int))
                    .as_static()
                    .with_default(Value::Int(7)),
            )
            .register(&runtime);
        let accessor = Accessor::new(&runtime);
        assert_eq!(
            accessor.describe(&Value::Class(class)).unwrap(),
            "Counter {total=7}"
        );
    }
}
