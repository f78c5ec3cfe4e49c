//! The closed error taxonomy of the access engine.
//!
//! Engine-detected failures are the enum below. Failures raised by an
//! invoked member itself stay opaque: checked ones are wrapped in
//! [`AccessError::InvocationFailure`] with the cause preserved, unchecked
//! ones surface unchanged through [`AccessError::Raised`] so assertions
//! written against the target's own failure types keep working.
//!
//! Nothing is retried and nothing is logged; the caller — a test — owns
//! failure reporting.

use picklock_sdk::Thrown;

/// Errors detected by the access engine.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Signature string missing or misordering its parentheses
    #[error("malformed signature `{signature}`")]
    MalformedSignature {
        /// The offending signature string
        signature: String,
    },

    /// A type name could not be mapped to a registered type
    #[error("unresolved type `{name}`")]
    UnresolvedType {
        /// The offending type name
        name: String,
    },

    /// Operation requires a non-null target
    #[error("operation requires a non-null target")]
    InvalidTarget,

    /// Member not found anywhere in the ancestor chain
    #[error("no member `{member}` on `{class}` or its ancestors")]
    NoSuchMember {
        /// Name (and, for callables, parameter list) looked for
        member: String,
        /// Class the walk started from
        class: String,
    },

    /// Resolved member found, but the supplied arguments cannot be
    /// reconciled to its parameter types
    #[error("argument mismatch for `{member}`: {detail}")]
    ArgumentMismatch {
        /// The resolved member
        member: String,
        /// Offending position with expected vs. actual, or the arity gap
        detail: String,
    },

    /// Write refused even after a final-override attempt
    #[error("`{field}` on `{class}` cannot be modified")]
    ImmutableMember {
        /// The field
        field: String,
        /// Its declaring class
        class: String,
    },

    /// Invoked member reported a checked failure; cause preserved
    #[error("invocation failed: {cause}")]
    InvocationFailure {
        /// The original failure
        #[source]
        cause: Thrown,
    },

    /// Unchecked failure raised by the invoked member, surfaced unchanged
    #[error(transparent)]
    Raised(Thrown),
}

impl AccessError {
    /// Categorize a failure coming out of a raw host primitive: checked →
    /// wrapped with cause, unchecked → pass-through.
    pub(crate) fn from_thrown(thrown: Thrown) -> AccessError {
        if thrown.checked {
            AccessError::InvocationFailure { cause: thrown }
        } else {
            AccessError::Raised(thrown)
        }
    }
}

/// Result of an engine operation.
pub type AccessResult<T> = Result<T, AccessError>;
