//! Member locator: ancestor-chain walks for fields, methods, and
//! constructors, plus the enumeration walks behind `field_names` and
//! `method_signatures`.
//!
//! Single-member lookups stop at the first declaration found walking from
//! the start class toward the root, and force the member's access bypass
//! before returning — that side effect is the point of the tool and is
//! never rolled back. Callable matching is exact on the ordered parameter
//! list: no overload scoring, any mismatch moves the walk to the next
//! ancestor.

use picklock_sdk::{
    ClassId, CtorHandle, CtorMeta, FieldHandle, FieldMeta, MethodHandle, MethodMeta, Mirror, Ty,
    Value,
};
use rustc_hash::FxHashSet;

use crate::error::{AccessError, AccessResult};
use crate::reconcile::boxed_class_name;

/// A located field: handle plus metadata snapshot.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedField {
    pub handle: FieldHandle,
    pub meta: FieldMeta,
}

/// A located method: handle plus metadata snapshot.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedMethod {
    pub handle: MethodHandle,
    pub meta: MethodMeta,
}

/// A located constructor: handle plus metadata snapshot.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCtor {
    pub handle: CtorHandle,
    pub meta: CtorMeta,
}

/// Class a lookup against `target` starts from.
///
/// A class value drives static context and starts at that class; an
/// instance starts at its runtime class. Scalars start at their boxed
/// class, arrays at the root. Null is rejected here — enumeration walks
/// handle their null-means-empty rule before calling this.
pub(crate) fn target_class<M: Mirror>(mirror: &M, target: &Value) -> AccessResult<ClassId> {
    if target.is_null() {
        return Err(AccessError::InvalidTarget);
    }
    if let Some(class) = target.as_class() {
        return Ok(class);
    }
    match mirror.type_of(target) {
        Some(Ty::Class(class)) => Ok(class),
        Some(Ty::Primitive(primitive)) => {
            let name = boxed_class_name(primitive);
            mirror
                .lookup_class(name)
                .ok_or_else(|| AccessError::UnresolvedType {
                    name: name.to_string(),
                })
        }
        Some(Ty::Array(_)) => Ok(mirror.root_class()),
        None => Err(AccessError::InvalidTarget),
    }
}

/// Find a declared field by name, walking the ancestor chain.
pub(crate) fn find_field<M: Mirror>(
    mirror: &M,
    start: ClassId,
    name: &str,
) -> AccessResult<ResolvedField> {
    let mut current = Some(start);
    while let Some(class) = current {
        for handle in mirror.declared_fields(class) {
            let meta = mirror.field_meta(handle);
            if meta.name == name {
                mirror.bypass_access(handle.into());
                return Ok(ResolvedField { handle, meta });
            }
        }
        current = mirror.parent_of(class);
    }
    Err(AccessError::NoSuchMember {
        member: name.to_string(),
        class: mirror.class_name(start),
    })
}

/// Find a declared method by name and exact parameter list, walking the
/// ancestor chain.
pub(crate) fn find_method<M: Mirror>(
    mirror: &M,
    start: ClassId,
    name: &str,
    params: &[Ty],
) -> AccessResult<ResolvedMethod> {
    let mut current = Some(start);
    while let Some(class) = current {
        for handle in mirror.declared_methods(class) {
            let meta = mirror.method_meta(handle);
            if meta.name == name && meta.params.as_slice() == params {
                mirror.bypass_access(handle.into());
                return Ok(ResolvedMethod { handle, meta });
            }
        }
        current = mirror.parent_of(class);
    }
    Err(AccessError::NoSuchMember {
        member: callable_label(mirror, name, params),
        class: mirror.class_name(start),
    })
}

/// Find a declared constructor by exact parameter list, walking the
/// ancestor chain.
pub(crate) fn find_constructor<M: Mirror>(
    mirror: &M,
    start: ClassId,
    params: &[Ty],
) -> AccessResult<ResolvedCtor> {
    let mut current = Some(start);
    while let Some(class) = current {
        for handle in mirror.declared_constructors(class) {
            let meta = mirror.ctor_meta(handle);
            if meta.params.as_slice() == params {
                mirror.bypass_access(handle.into());
                return Ok(ResolvedCtor { handle, meta });
            }
        }
        current = mirror.parent_of(class);
    }
    Err(AccessError::NoSuchMember {
        member: callable_label(mirror, "<init>", params),
        class: mirror.class_name(start),
    })
}

/// `"name(type1, type2)"` label for lookup and mismatch reports.
pub(crate) fn callable_label<M: Mirror>(mirror: &M, name: &str, params: &[Ty]) -> String {
    let params: Vec<String> = params.iter().map(|ty| mirror.type_name(ty)).collect();
    format!("{}({})", name, params.join(", "))
}

/// `"<returnType> <name>(<paramTypes>)"` as reported by signature
/// enumeration.
pub(crate) fn format_signature<M: Mirror>(mirror: &M, meta: &MethodMeta) -> String {
    let ret = meta
        .ret
        .as_ref()
        .map(|ty| mirror.type_name(ty))
        .unwrap_or_else(|| "void".to_string());
    format!("{} {}", ret, callable_label(mirror, &meta.name, &meta.params))
}

/// Every field name declared across the target's ancestor chain, first
/// occurrence first. A null target yields an empty list, not an error.
pub(crate) fn field_names<M: Mirror>(mirror: &M, target: &Value) -> Vec<String> {
    let Ok(start) = target_class(mirror, target) else {
        return Vec::new();
    };
    let mut seen = FxHashSet::default();
    let mut names = Vec::new();
    let mut current = Some(start);
    while let Some(class) = current {
        for handle in mirror.declared_fields(class) {
            let name = mirror.field_meta(handle).name;
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
        current = mirror.parent_of(class);
    }
    names
}

/// Every method signature across the target's ancestor chain, including
/// the root's, deduplicated. A null target yields an empty list.
pub(crate) fn method_signatures<M: Mirror>(mirror: &M, target: &Value) -> Vec<String> {
    let Ok(start) = target_class(mirror, target) else {
        return Vec::new();
    };
    let mut seen = FxHashSet::default();
    let mut signatures = Vec::new();
    let mut current = Some(start);
    while let Some(class) = current {
        for handle in mirror.declared_methods(class) {
            let signature = format_signature(mirror, &mirror.method_meta(handle));
            if seen.insert(signature.clone()) {
                signatures.push(signature);
            }
        }
        current = mirror.parent_of(class);
    }
    signatures
}
