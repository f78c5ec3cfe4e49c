//! Signature parser: `"name(type1, type2)"` → member name + type-name list.
//!
//! Leaf component. No type-name validation happens here; that is the type
//! resolver's job. Bare-name field access never goes through this parser.

use crate::error::{AccessError, AccessResult};

/// A parsed method-descriptor string. Created fresh per call, discarded
/// after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Member name
    pub name: String,
    /// Parameter type names, in order; empty for a no-arg signature
    pub parameter_type_names: Vec<String>,
}

impl MemberDescriptor {
    /// Parse a signature string.
    ///
    /// The name is the trimmed text before the first `(`; parameter type
    /// names are the comma/whitespace-separated tokens up to the first
    /// `)`. Fails when either parenthesis is missing or the first `(`
    /// does not precede the first `)`.
    pub fn parse(signature: &str) -> AccessResult<MemberDescriptor> {
        let (open, close) = match (signature.find('('), signature.find(')')) {
            (Some(open), Some(close)) if open < close => (open, close),
            _ => {
                return Err(AccessError::MalformedSignature {
                    signature: signature.to_string(),
                })
            }
        };
        let name = signature[..open].trim().to_string();
        let parameter_type_names = signature[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        Ok(MemberDescriptor {
            name,
            parameter_type_names,
        })
    }
}
