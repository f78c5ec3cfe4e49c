//! Type resolver: a type-name token → a concrete [`Ty`] handle.
//!
//! Recognizes the eight primitive keywords, `[`-marked array forms, exact
//! (qualified) class names, and — for unqualified capitalized names — a
//! fixed-order probe of the implicit-import namespaces. The probe is a
//! deliberate, documented shortcut, not an exhaustive search: names from
//! anywhere else must be fully qualified.

use picklock_sdk::{Mirror, Primitive, Ty};

use crate::error::{AccessError, AccessResult};

/// Namespaces probed, in priority order, for unqualified capitalized names.
const IMPLICIT_NAMESPACES: [&str; 2] = ["java.lang", "java.util"];

/// Resolve a type-name token against the mirror's registered classes.
pub(crate) fn resolve_type<M: Mirror>(mirror: &M, name: &str) -> AccessResult<Ty> {
    let name = name.trim();
    if let Some(open) = name.find('[') {
        // `int[]` and `int[][]`: element name before the first bracket,
        // one array level per `[`.
        let element = resolve_type(mirror, &name[..open])?;
        let dimensions = name.matches('[').count();
        let mut ty = element;
        for _ in 0..dimensions {
            ty = Ty::array_of(ty);
        }
        return Ok(ty);
    }
    if let Some(primitive) = Primitive::from_keyword(name) {
        return Ok(Ty::Primitive(primitive));
    }
    if let Some(class) = mirror.lookup_class(name) {
        return Ok(Ty::Class(class));
    }
    if !name.contains('.') && name.chars().next().is_some_and(char::is_uppercase) {
        for namespace in IMPLICIT_NAMESPACES {
            if let Some(class) = mirror.lookup_class(&format!("{}.{}", namespace, name)) {
                return Ok(Ty::Class(class));
            }
        }
    }
    Err(AccessError::UnresolvedType {
        name: name.to_string(),
    })
}
