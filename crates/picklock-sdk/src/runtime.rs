//! Reference host runtime: class table, instances, and the raw access
//! primitives behind the [`Mirror`] capability interface.
//!
//! Instance fields live in a flat slot vector per object; each class's
//! declared instance fields get absolute slot indices starting after its
//! parent's. Static fields are singleton slots on the declaring class.
//! Visibility is enforced here, in the raw layer, and only here: a
//! non-public member requires its bypass flag before any raw access
//! succeeds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::bootstrap::{self, CoreClasses};
use crate::builder::{ClassBuilder, CtorDef, FieldDef, MethodDef, NativeCall};
use crate::meta::{
    CtorHandle, CtorMeta, FieldHandle, FieldMeta, MemberHandle, MethodHandle, MethodMeta,
    Visibility,
};
use crate::mirror::{Mirror, Thrown};
use crate::types::{ClassId, Ty};
use crate::value::{ObjRef, Value};

/// A registered class: declared members plus slot layout.
#[derive(Debug)]
pub(crate) struct ClassDef {
    name: String,
    parent: Option<ClassId>,
    /// Instance slots including inherited
    total_slots: usize,
    fields: Vec<FieldSlot>,
    methods: Vec<MethodSlot>,
    ctors: Vec<CtorSlot>,
    /// Static field values, indexed by the declaring class's static slots
    statics: RwLock<Vec<Value>>,
}

#[derive(Debug)]
struct FieldSlot {
    def: FieldDef,
    /// Absolute instance slot, or index into `statics` for static fields
    slot: usize,
    accessible: AtomicBool,
    final_cleared: AtomicBool,
}

#[derive(Debug)]
struct MethodSlot {
    def: MethodDef,
    accessible: AtomicBool,
}

#[derive(Debug)]
struct CtorSlot {
    def: CtorDef,
    accessible: AtomicBool,
}

/// The host runtime the engine reflects over.
///
/// Long-lived by nature (it is the host); everything the engine itself
/// resolves against it is per-call and uncached.
#[derive(Debug)]
pub struct Runtime {
    classes: RwLock<Vec<ClassDef>>,
    names: RwLock<FxHashMap<String, ClassId>>,
    core: CoreClasses,
}

impl Runtime {
    /// A runtime with the core namespace installed.
    pub fn new() -> Runtime {
        let runtime = Runtime {
            classes: RwLock::new(Vec::new()),
            names: RwLock::new(FxHashMap::default()),
            core: CoreClasses::uninit(),
        };
        let core = bootstrap::install(&runtime);
        Runtime { core, ..runtime }
    }

    /// Well-known core classes.
    pub fn core(&self) -> &CoreClasses {
        &self.core
    }

    /// Register a class definition; called through [`ClassBuilder::register`].
    pub(crate) fn install_class(&self, builder: ClassBuilder, root: bool) -> ClassId {
        let parent = if root {
            None
        } else {
            Some(builder.parent.unwrap_or(self.core.object))
        };
        let mut classes = self.classes.write();
        let id = ClassId(classes.len());
        let mut next_slot = parent.map(|p| classes[p.0].total_slots).unwrap_or(0);
        let mut statics = Vec::new();
        let fields = builder
            .fields
            .into_iter()
            .map(|def| {
                let slot = if def.is_static {
                    statics.push(def.initial_value());
                    statics.len() - 1
                } else {
                    next_slot += 1;
                    next_slot - 1
                };
                FieldSlot {
                    slot,
                    accessible: AtomicBool::new(false),
                    final_cleared: AtomicBool::new(false),
                    def,
                }
            })
            .collect();
        let methods = builder
            .methods
            .into_iter()
            .map(|def| MethodSlot {
                accessible: AtomicBool::new(false),
                def,
            })
            .collect();
        let ctors = builder
            .ctors
            .into_iter()
            .map(|def| CtorSlot {
                accessible: AtomicBool::new(false),
                def,
            })
            .collect();
        classes.push(ClassDef {
            name: builder.name.clone(),
            parent,
            total_slots: next_slot,
            fields,
            methods,
            ctors,
            statics: RwLock::new(statics),
        });
        self.names.write().insert(builder.name, id);
        id
    }

    /// Add a method to an already-registered class.
    pub fn add_method(&self, class: ClassId, method: MethodDef) {
        self.classes.write()[class.0].methods.push(MethodSlot {
            accessible: AtomicBool::new(false),
            def: method,
        });
    }

    /// Allocate an instance with every slot at its declared initial value.
    /// Constructors run on top of this.
    pub fn allocate(&self, class: ClassId) -> ObjRef {
        let classes = self.classes.read();
        let mut slots = vec![Value::Null; classes[class.0].total_slots];
        let mut current = Some(class);
        while let Some(id) = current {
            let def = &classes[id.0];
            for field in &def.fields {
                if !field.def.is_static {
                    slots[field.slot] = field.def.initial_value();
                }
            }
            current = def.parent;
        }
        ObjRef::new(class, slots)
    }

    /// Direct field read for native member bodies: first declared instance
    /// field named `name` up the chain, no access checks.
    pub fn object_get_field(&self, obj: &ObjRef, name: &str) -> Option<Value> {
        let classes = self.classes.read();
        let mut current = Some(obj.class());
        while let Some(id) = current {
            let def = &classes[id.0];
            if let Some(field) = def
                .fields
                .iter()
                .find(|f| !f.def.is_static && f.def.name == name)
            {
                return obj.get_slot(field.slot);
            }
            current = def.parent;
        }
        None
    }

    /// Direct field write for native member bodies; `false` when no
    /// instance field of that name exists on the chain.
    pub fn object_set_field(&self, obj: &ObjRef, name: &str, value: Value) -> bool {
        let classes = self.classes.read();
        let mut current = Some(obj.class());
        while let Some(id) = current {
            let def = &classes[id.0];
            if let Some(field) = def
                .fields
                .iter()
                .find(|f| !f.def.is_static && f.def.name == name)
            {
                return obj.set_slot(field.slot, value);
            }
            current = def.parent;
        }
        false
    }

    /// Class a receiver value belongs to for dispatch purposes.
    pub(crate) fn receiver_class(&self, receiver: &Value) -> Option<ClassId> {
        match receiver {
            Value::Object(obj) => Some(obj.class()),
            Value::Str(_) => Some(self.core.string),
            Value::Class(_) => Some(self.core.class),
            Value::Array(_) => Some(self.core.object),
            Value::Null => None,
            scalar => scalar.primitive_kind().map(|p| self.core.boxed(p)),
        }
    }

    /// Host-side store check: the write primitive refuses values that do
    /// not fit the declared type.
    fn value_fits(&self, classes: &[ClassDef], ty: &Ty, value: &Value) -> bool {
        match value {
            Value::Null => !ty.is_primitive(),
            Value::Array(array) => match ty {
                Ty::Array(element) => element_fits(classes, element, array.element_type()),
                Ty::Class(id) => *id == self.core.object,
                Ty::Primitive(_) => false,
            },
            other => match ty {
                Ty::Primitive(p) => other.primitive_kind() == Some(*p),
                Ty::Class(id) => match self.receiver_class(other) {
                    Some(class) => subclass_of(classes, class, *id),
                    None => false,
                },
                Ty::Array(_) => false,
            },
        }
    }
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new()
    }
}

/// Ancestor walk over the locked class table.
fn subclass_of(classes: &[ClassDef], sub: ClassId, ancestor: ClassId) -> bool {
    let mut current = Some(sub);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = classes[id.0].parent;
    }
    false
}

/// Array element compatibility: primitive elements must match exactly,
/// class elements may widen. Never primitive↔boxed at element level.
fn element_fits(classes: &[ClassDef], expected: &Ty, actual: &Ty) -> bool {
    match (expected, actual) {
        (Ty::Primitive(a), Ty::Primitive(b)) => a == b,
        (Ty::Class(a), Ty::Class(b)) => subclass_of(classes, *b, *a),
        (Ty::Array(a), Ty::Array(b)) => element_fits(classes, a, b),
        _ => false,
    }
}

fn ensure_accessible(
    visibility: Visibility,
    accessible: &AtomicBool,
    what: &str,
) -> Result<(), Thrown> {
    if visibility.is_public() || accessible.load(Ordering::Relaxed) {
        Ok(())
    } else {
        Err(Thrown::illegal_access(format!(
            "member `{}` is not accessible",
            what
        )))
    }
}

fn instance_object<'v>(target: Option<&'v Value>) -> Result<&'v ObjRef, Thrown> {
    match target {
        Some(Value::Object(obj)) => Ok(obj),
        Some(Value::Null) | None => Err(Thrown::null_pointer(
            "instance member accessed without an instance",
        )),
        Some(_) => Err(Thrown::illegal_argument("target is not an object instance")),
    }
}

impl Mirror for Runtime {
    fn root_class(&self) -> ClassId {
        self.core.object
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.names.read().get(name).copied()
    }

    fn class_name(&self, class: ClassId) -> String {
        self.classes.read()[class.0].name.clone()
    }

    fn parent_of(&self, class: ClassId) -> Option<ClassId> {
        self.classes.read()[class.0].parent
    }

    fn declared_fields(&self, class: ClassId) -> Vec<FieldHandle> {
        let classes = self.classes.read();
        (0..classes[class.0].fields.len())
            .map(|index| FieldHandle { class, index })
            .collect()
    }

    fn declared_methods(&self, class: ClassId) -> Vec<MethodHandle> {
        let classes = self.classes.read();
        (0..classes[class.0].methods.len())
            .map(|index| MethodHandle { class, index })
            .collect()
    }

    fn declared_constructors(&self, class: ClassId) -> Vec<CtorHandle> {
        let classes = self.classes.read();
        (0..classes[class.0].ctors.len())
            .map(|index| CtorHandle { class, index })
            .collect()
    }

    fn field_meta(&self, field: FieldHandle) -> FieldMeta {
        let classes = self.classes.read();
        let def = &classes[field.class.0].fields[field.index].def;
        FieldMeta {
            name: def.name.clone(),
            ty: def.ty.clone(),
            visibility: def.visibility,
            is_static: def.is_static,
            is_final: def.is_final,
            is_constant: def.is_constant,
            declared_in: field.class,
        }
    }

    fn method_meta(&self, method: MethodHandle) -> MethodMeta {
        let classes = self.classes.read();
        let def = &classes[method.class.0].methods[method.index].def;
        MethodMeta {
            name: def.name.clone(),
            params: def.params.clone(),
            ret: def.ret.clone(),
            visibility: def.visibility,
            is_static: def.is_static,
            declared_in: method.class,
        }
    }

    fn ctor_meta(&self, ctor: CtorHandle) -> CtorMeta {
        let classes = self.classes.read();
        let def = &classes[ctor.class.0].ctors[ctor.index].def;
        CtorMeta {
            params: def.params.clone(),
            visibility: def.visibility,
            declared_in: ctor.class,
        }
    }

    fn type_of(&self, value: &Value) -> Option<Ty> {
        match value {
            Value::Null => None,
            Value::Str(_) => Some(Ty::Class(self.core.string)),
            Value::Object(obj) => Some(Ty::Class(obj.class())),
            Value::Array(array) => Some(Ty::array_of(array.element_type().clone())),
            Value::Class(_) => Some(Ty::Class(self.core.class)),
            scalar => scalar.primitive_kind().map(Ty::Primitive),
        }
    }

    fn bypass_access(&self, member: MemberHandle) {
        let classes = self.classes.read();
        let flag = match member {
            MemberHandle::Field(h) => &classes[h.class.0].fields[h.index].accessible,
            MemberHandle::Method(h) => &classes[h.class.0].methods[h.index].accessible,
            MemberHandle::Constructor(h) => &classes[h.class.0].ctors[h.index].accessible,
        };
        flag.store(true, Ordering::Relaxed);
    }

    fn clear_final(&self, field: FieldHandle) -> bool {
        let classes = self.classes.read();
        let slot = &classes[field.class.0].fields[field.index];
        if slot.def.is_constant {
            return false;
        }
        slot.final_cleared.store(true, Ordering::Relaxed);
        true
    }

    fn read_raw(&self, field: FieldHandle, target: Option<&Value>) -> Result<Value, Thrown> {
        let classes = self.classes.read();
        let class = &classes[field.class.0];
        let slot = &class.fields[field.index];
        ensure_accessible(slot.def.visibility, &slot.accessible, &slot.def.name)?;
        if slot.def.is_static {
            return Ok(class.statics.read()[slot.slot].clone());
        }
        let obj = instance_object(target)?;
        if !subclass_of(&classes, obj.class(), field.class) {
            return Err(Thrown::illegal_argument(
                "target is not an instance of the declaring class",
            ));
        }
        obj.get_slot(slot.slot)
            .ok_or_else(|| Thrown::illegal_argument("field slot out of range for target"))
    }

    fn write_raw(
        &self,
        field: FieldHandle,
        target: Option<&Value>,
        value: Value,
    ) -> Result<(), Thrown> {
        let classes = self.classes.read();
        let class = &classes[field.class.0];
        let slot = &class.fields[field.index];
        ensure_accessible(slot.def.visibility, &slot.accessible, &slot.def.name)?;
        if slot.def.is_final && !slot.final_cleared.load(Ordering::Relaxed) {
            return Err(Thrown::illegal_access(format!(
                "field `{}` is final",
                slot.def.name
            )));
        }
        if !self.value_fits(&classes, &slot.def.ty, &value) {
            return Err(Thrown::illegal_argument(format!(
                "value does not fit field `{}`",
                slot.def.name
            )));
        }
        if slot.def.is_static {
            class.statics.write()[slot.slot] = value;
            return Ok(());
        }
        let obj = instance_object(target)?;
        if !subclass_of(&classes, obj.class(), field.class) {
            return Err(Thrown::illegal_argument(
                "target is not an instance of the declaring class",
            ));
        }
        if obj.set_slot(slot.slot, value) {
            Ok(())
        } else {
            Err(Thrown::illegal_argument(
                "field slot out of range for target",
            ))
        }
    }

    fn invoke_raw(
        &self,
        method: MethodHandle,
        target: Option<&Value>,
        args: Vec<Value>,
    ) -> Result<Value, Thrown> {
        // Extract the body and drop the class-table lock before running it:
        // bodies re-enter the runtime through `object_get_field` and friends.
        let (body, is_static) = {
            let classes = self.classes.read();
            let slot = &classes[method.class.0].methods[method.index];
            ensure_accessible(slot.def.visibility, &slot.accessible, &slot.def.name)?;
            if !slot.def.is_static {
                let receiver = match target {
                    Some(value) if !value.is_null() => value,
                    _ => {
                        return Err(Thrown::null_pointer(
                            "instance method invoked without an instance",
                        ))
                    }
                };
                let fits = self
                    .receiver_class(receiver)
                    .is_some_and(|class| subclass_of(&classes, class, method.class));
                if !fits {
                    return Err(Thrown::illegal_argument(
                        "receiver is not an instance of the declaring class",
                    ));
                }
            }
            (Arc::clone(&slot.def.body), slot.def.is_static)
        };
        let this = if is_static { None } else { target };
        (body)(self, NativeCall { this, args: &args })
    }

    fn construct_raw(
        &self,
        class: ClassId,
        ctor: CtorHandle,
        args: Vec<Value>,
    ) -> Result<Value, Thrown> {
        let body = {
            let classes = self.classes.read();
            let slot = &classes[ctor.class.0].ctors[ctor.index];
            ensure_accessible(slot.def.visibility, &slot.accessible, "<init>")?;
            Arc::clone(&slot.def.body)
        };
        let instance = Value::Object(self.allocate(class));
        (body)(
            self,
            NativeCall {
                this: Some(&instance),
                args: &args,
            },
        )?;
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn sample_runtime() -> (Runtime, ClassId, ClassId) {
        let runtime = Runtime::new();
        let string = runtime.core().string;
        let parent = ClassBuilder::new("Parent")
            .field(FieldDef::new("name", Ty::Class(string)).with_default(Value::from("Unknown")))
            .field(
                FieldDef::new("count", Ty::Primitive(Primitive::Int))
                    .as_static()
                    .with_default(Value::Int(3)),
            )
            .register(&runtime);
        let child = ClassBuilder::new("Child")
            .extends(parent)
            .field(FieldDef::new("name", Ty::Class(string)).with_default(Value::from("inner")))
            .field(FieldDef::new("number", Ty::Primitive(Primitive::Int)))
            .register(&runtime);
        (runtime, parent, child)
    }

    fn field_handle(runtime: &Runtime, class: ClassId, name: &str) -> FieldHandle {
        runtime
            .declared_fields(class)
            .into_iter()
            .find(|h| runtime.field_meta(*h).name == name)
            .unwrap()
    }

    #[test]
    fn test_register_assigns_parent_and_root() {
        let (runtime, parent, child) = sample_runtime();
        assert_eq!(runtime.parent_of(child), Some(parent));
        assert_eq!(runtime.parent_of(parent), Some(runtime.core().object));
        assert_eq!(runtime.parent_of(runtime.core().object), None);
    }

    #[test]
    fn test_lookup_by_name() {
        let (runtime, parent, _) = sample_runtime();
        assert_eq!(runtime.lookup_class("Parent"), Some(parent));
        assert_eq!(runtime.lookup_class("Nobody"), None);
    }

    #[test]
    fn test_allocate_applies_defaults_down_the_chain() {
        let (runtime, _, child) = sample_runtime();
        let obj = runtime.allocate(child);
        // Shadowed field: the child's declaration wins on name search,
        // both slots exist.
        assert_eq!(
            runtime.object_get_field(&obj, "name"),
            Some(Value::from("inner"))
        );
        assert_eq!(
            runtime.object_get_field(&obj, "number"),
            Some(Value::Int(0))
        );
        assert_eq!(obj.field_count(), 3);
    }

    #[test]
    fn test_shadowed_field_slots_are_distinct() {
        let (runtime, parent, child) = sample_runtime();
        let obj = Value::Object(runtime.allocate(child));
        let parent_name = field_handle(&runtime, parent, "name");
        let child_name = field_handle(&runtime, child, "name");
        runtime.bypass_access(parent_name.into());
        runtime.bypass_access(child_name.into());
        runtime
            .write_raw(parent_name, Some(&obj), Value::from("upper"))
            .unwrap();
        assert_eq!(
            runtime.read_raw(parent_name, Some(&obj)).unwrap(),
            Value::from("upper")
        );
        assert_eq!(
            runtime.read_raw(child_name, Some(&obj)).unwrap(),
            Value::from("inner")
        );
    }

    #[test]
    fn test_private_field_requires_bypass() {
        let (runtime, parent, _) = sample_runtime();
        let obj = Value::Object(runtime.allocate(parent));
        let name = field_handle(&runtime, parent, "name");
        let err = runtime.read_raw(name, Some(&obj)).unwrap_err();
        assert_eq!(err.class_name, "java.lang.IllegalAccessException");
        runtime.bypass_access(name.into());
        assert_eq!(
            runtime.read_raw(name, Some(&obj)).unwrap(),
            Value::from("Unknown")
        );
    }

    #[test]
    fn test_static_slot_read_write() {
        let (runtime, parent, _) = sample_runtime();
        let count = field_handle(&runtime, parent, "count");
        runtime.bypass_access(count.into());
        assert_eq!(runtime.read_raw(count, None).unwrap(), Value::Int(3));
        runtime.write_raw(count, None, Value::Int(9)).unwrap();
        assert_eq!(runtime.read_raw(count, None).unwrap(), Value::Int(9));
    }

    #[test]
    fn test_write_rejects_wrong_type() {
        let (runtime, parent, _) = sample_runtime();
        let obj = Value::Object(runtime.allocate(parent));
        let name = field_handle(&runtime, parent, "name");
        runtime.bypass_access(name.into());
        let err = runtime
            .write_raw(name, Some(&obj), Value::Int(5))
            .unwrap_err();
        assert_eq!(err.class_name, "java.lang.IllegalArgumentException");
    }

    #[test]
    fn test_final_field_needs_clear_before_write() {
        let runtime = Runtime::new();
        let class = ClassBuilder::new("Sealed")
            .field(
                FieldDef::new("motto", Ty::Class(runtime.core().string))
                    .as_final()
                    .with_default(Value::from("fixed")),
            )
            .register(&runtime);
        let obj = Value::Object(runtime.allocate(class));
        let motto = field_handle(&runtime, class, "motto");
        runtime.bypass_access(motto.into());
        assert!(runtime
            .write_raw(motto, Some(&obj), Value::from("changed"))
            .is_err());
        assert!(runtime.clear_final(motto));
        runtime
            .write_raw(motto, Some(&obj), Value::from("changed"))
            .unwrap();
    }

    #[test]
    fn test_constant_refuses_clear_final() {
        let runtime = Runtime::new();
        let integer = runtime.core().integer;
        let max = field_handle(&runtime, integer, "MAX_VALUE");
        assert!(!runtime.clear_final(max));
        // Constants are still readable (public, no bypass needed).
        assert_eq!(
            runtime.read_raw(max, None).unwrap(),
            Value::Int(i32::MAX)
        );
    }

    #[test]
    fn test_read_instance_field_without_target() {
        let (runtime, parent, _) = sample_runtime();
        let name = field_handle(&runtime, parent, "name");
        runtime.bypass_access(name.into());
        let err = runtime.read_raw(name, None).unwrap_err();
        assert_eq!(err.class_name, "java.lang.NullPointerException");
    }

    #[test]
    fn test_read_with_unrelated_target() {
        let (runtime, parent, _) = sample_runtime();
        let other = ClassBuilder::new("Other").register(&runtime);
        let obj = Value::Object(runtime.allocate(other));
        let name = field_handle(&runtime, parent, "name");
        runtime.bypass_access(name.into());
        let err = runtime.read_raw(name, Some(&obj)).unwrap_err();
        assert_eq!(err.class_name, "java.lang.IllegalArgumentException");
    }

    #[test]
    fn test_invoke_instance_method_needs_matching_receiver() {
        let runtime = Runtime::new();
        let class = ClassBuilder::new("Greeter")
            .method(
                MethodDef::new("greet", |_, _| Ok(Value::from("hi")))
                    .returns(Ty::Class(ClassId(2))),
            )
            .register(&runtime);
        let method = runtime.declared_methods(class)[0];
        runtime.bypass_access(method.into());
        let obj = Value::Object(runtime.allocate(class));
        assert_eq!(
            runtime.invoke_raw(method, Some(&obj), vec![]).unwrap(),
            Value::from("hi")
        );
        let err = runtime.invoke_raw(method, None, vec![]).unwrap_err();
        assert_eq!(err.class_name, "java.lang.NullPointerException");
        let stranger = Value::Object(runtime.allocate(runtime.core().object));
        let err = runtime.invoke_raw(method, Some(&stranger), vec![]).unwrap_err();
        assert_eq!(err.class_name, "java.lang.IllegalArgumentException");
    }

    #[test]
    fn test_construct_runs_body_on_fresh_instance() {
        let runtime = Runtime::new();
        let string = runtime.core().string;
        let class = ClassBuilder::new("Named")
            .field(FieldDef::new("name", Ty::Class(string)))
            .constructor(
                CtorDef::new(|rt, call| {
                    let obj = call.receiver_object()?;
                    rt.object_set_field(obj, "name", call.arg(0));
                    Ok(Value::Null)
                })
                .with_param(Ty::Class(string)),
            )
            .register(&runtime);
        let ctor = runtime.declared_constructors(class)[0];
        runtime.bypass_access(ctor.into());
        let instance = runtime
            .construct_raw(class, ctor, vec![Value::from("Charlie")])
            .unwrap();
        let obj = instance.as_object().unwrap();
        assert_eq!(
            runtime.object_get_field(obj, "name"),
            Some(Value::from("Charlie"))
        );
    }
}
