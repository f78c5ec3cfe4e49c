//! picklock-engine — reflective member resolution and invocation for tests.
//!
//! Given a runtime value (or a class, for static members) and a textual
//! member descriptor — a field name, or a method signature string such as
//! `"setName(java.lang.String)"` — the engine locates the underlying
//! member across the class's ancestor chain, reconciles the supplied
//! arguments to its declared parameter types (including primitive/boxed
//! equivalence and the array/varargs forms), performs the access with
//! visibility bypassed, and reports failures through a small closed
//! taxonomy. Production types stay encapsulated; tests reach inside
//! anyway.
//!
//! The engine is written purely against the [`picklock_sdk::Mirror`]
//! capability interface and holds no state between calls: nothing is
//! cached, nothing is retried, nothing is logged.
//!
//! ```ignore
//! let runtime = Runtime::new();
//! // ... register fixture classes ...
//! let accessor = Accessor::new(&runtime);
//! let parent = accessor.instantiate(parent_class, None, &[Value::from("Charlie")])?;
//! assert_eq!(accessor.get_value(&parent, "name")?, Value::from("Charlie"));
//! accessor.set_value(&parent, "name", Value::from("Herbert"))?;
//! assert_eq!(accessor.invoke(&parent, "getName()", &[])?, Value::from("Herbert"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod accessor;
mod error;
mod locate;
mod reconcile;
mod resolve;
mod signature;

pub use accessor::Accessor;
pub use error::{AccessError, AccessResult};
pub use reconcile::ArgumentPlan;
pub use signature::MemberDescriptor;
