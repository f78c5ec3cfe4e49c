//! Argument reconciler: decide how the caller's arguments map onto a
//! resolved callable's parameter list.
//!
//! Candidates are tried in a fixed priority order and the first
//! structurally valid one wins; there is no backtracking once a plan is
//! chosen:
//!
//! 1. arity-exact positional match (with primitive/boxed equivalence),
//! 2. a single array parameter taking one assignable array — or a null
//!    array when no arguments were given,
//! 3. varargs collapse: pack every argument into the single array
//!    parameter,
//! 4. spread compensation: a lone boxed/object array flattened and
//!    retried positionally. Primitive arrays are never spread, and never
//!    satisfy an array-of-boxed parameter.

use picklock_sdk::{ArrayRef, ClassId, Mirror, Primitive, Ty, Value};

use crate::error::{AccessError, AccessResult};

/// How the caller's arguments will be handed to the native invoke
/// primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentPlan {
    /// Pass the arguments positionally as given
    Positional(Vec<Value>),
    /// Pass one (possibly packed, possibly null) array argument
    Collapsed(Value),
}

impl ArgumentPlan {
    /// The final argument vector for the raw invoke primitive.
    pub fn into_args(self) -> Vec<Value> {
        match self {
            ArgumentPlan::Positional(args) => args,
            ArgumentPlan::Collapsed(array) => vec![array],
        }
    }
}

/// Boxed counterpart of each primitive. This table is exact; there is no
/// widening between numeric kinds.
pub(crate) fn boxed_class_name(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Bool => "java.lang.Boolean",
        Primitive::Byte => "java.lang.Byte",
        Primitive::Char => "java.lang.Character",
        Primitive::Short => "java.lang.Short",
        Primitive::Int => "java.lang.Integer",
        Primitive::Long => "java.lang.Long",
        Primitive::Float => "java.lang.Float",
        Primitive::Double => "java.lang.Double",
    }
}

/// Primitive kind a class unboxes to, if it is one of the boxed classes.
fn primitive_of_class<M: Mirror>(mirror: &M, class: ClassId) -> Option<Primitive> {
    let name = mirror.class_name(class);
    Primitive::ALL
        .iter()
        .copied()
        .find(|p| boxed_class_name(*p) == name)
}

/// Is `value` acceptable for a parameter of type `expected`?
pub(crate) fn assignable<M: Mirror>(mirror: &M, expected: &Ty, value: &Value) -> bool {
    match mirror.type_of(value) {
        // Null fits any reference type.
        None => !expected.is_primitive(),
        Some(actual) => ty_assignable(mirror, expected, &actual),
    }
}

fn ty_assignable<M: Mirror>(mirror: &M, expected: &Ty, actual: &Ty) -> bool {
    match (expected, actual) {
        (Ty::Primitive(a), Ty::Primitive(b)) => a == b,
        (Ty::Primitive(p), Ty::Class(class)) => primitive_of_class(mirror, *class) == Some(*p),
        (Ty::Class(class), Ty::Primitive(p)) => match mirror.lookup_class(boxed_class_name(*p)) {
            Some(boxed) => mirror.is_subclass_of(boxed, *class),
            None => false,
        },
        (Ty::Class(expected), Ty::Class(actual)) => mirror.is_subclass_of(*actual, *expected),
        (Ty::Class(expected), Ty::Array(_)) => *expected == mirror.root_class(),
        (Ty::Array(expected), Ty::Array(actual)) => element_assignable(mirror, expected, actual),
        _ => false,
    }
}

/// Array element compatibility: primitive elements must match exactly
/// (never primitive↔boxed at element level), class elements may widen.
fn element_assignable<M: Mirror>(mirror: &M, expected: &Ty, actual: &Ty) -> bool {
    match (expected, actual) {
        (Ty::Primitive(a), Ty::Primitive(b)) => a == b,
        (Ty::Class(expected), Ty::Class(actual)) => mirror.is_subclass_of(*actual, *expected),
        (Ty::Class(expected), Ty::Array(_)) => *expected == mirror.root_class(),
        (Ty::Array(expected), Ty::Array(actual)) => element_assignable(mirror, expected, actual),
        _ => false,
    }
}

/// Reconcile `args` against `params`, producing the winning plan or an
/// `ArgumentMismatch` naming the offending position.
pub(crate) fn reconcile<M: Mirror>(
    mirror: &M,
    member: &str,
    params: &[Ty],
    args: &[Value],
) -> AccessResult<ArgumentPlan> {
    // 1. Arity-exact positional match.
    if params.len() == args.len() && positional_match(mirror, params, args) {
        return Ok(ArgumentPlan::Positional(args.to_vec()));
    }

    if let [Ty::Array(element)] = params {
        let param = &params[0];
        // 2. Single array parameter: one assignable array passes through;
        // zero arguments pass a null array.
        match args {
            [] => return Ok(ArgumentPlan::Collapsed(Value::Null)),
            [single] if assignable(mirror, param, single) => {
                return Ok(ArgumentPlan::Collapsed(single.clone()));
            }
            _ => {}
        }

        // 3. Varargs collapse: pack the arguments into one array of the
        // parameter's element type.
        if !args.is_empty() && args.iter().all(|arg| assignable(mirror, element, arg)) {
            let packed = ArrayRef::new((**element).clone(), args.to_vec());
            return Ok(ArgumentPlan::Collapsed(Value::Array(packed)));
        }
    }

    // 4. Spread compensation: a lone boxed/object array that matched
    // nothing above is flattened and retried positionally. Primitive
    // arrays are deliberately exempt.
    if let [Value::Array(array)] = args {
        if !array.element_type().is_primitive() {
            let spread = array.to_vec();
            if params.len() == spread.len() && positional_match(mirror, params, &spread) {
                return Ok(ArgumentPlan::Positional(spread));
            }
        }
    }

    Err(mismatch(mirror, member, params, args))
}

fn positional_match<M: Mirror>(mirror: &M, params: &[Ty], args: &[Value]) -> bool {
    params
        .iter()
        .zip(args)
        .all(|(param, arg)| assignable(mirror, param, arg))
}

fn mismatch<M: Mirror>(mirror: &M, member: &str, params: &[Ty], args: &[Value]) -> AccessError {
    let detail = if params.len() != args.len() {
        format!("expected {} arguments, got {}", params.len(), args.len())
    } else {
        params
            .iter()
            .zip(args)
            .enumerate()
            .find(|(_, (param, arg))| !assignable(mirror, param, arg))
            .map(|(index, (param, arg))| {
                format!(
                    "parameter {} expects {}, got {}",
                    index,
                    mirror.type_name(param),
                    actual_type_name(mirror, arg)
                )
            })
            .unwrap_or_else(|| "arguments not reconcilable".to_string())
    };
    AccessError::ArgumentMismatch {
        member: member.to_string(),
        detail,
    }
}

fn actual_type_name<M: Mirror>(mirror: &M, value: &Value) -> String {
    mirror
        .type_of(value)
        .map(|ty| mirror.type_name(&ty))
        .unwrap_or_else(|| "null".to_string())
}
