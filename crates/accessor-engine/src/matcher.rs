//! Overload matching
//!
//! Selects the first candidate whose arity equals the argument count and
//! whose every parameter accepts the argument in the same position. There is
//! no specificity ranking: with several compatible candidates, the first one
//! in candidate order wins. Candidates gathered through
//! [`TypeHierarchy`](crate::hierarchy::TypeHierarchy) are ordered most-derived
//! level first.

use accessor_sdk::{AccessorError, AccessorResult, Invocable, Kind, PrimitiveKind, Value};
use tracing::trace;

use crate::hierarchy::TypeHierarchy;

/// Argument-to-parameter compatibility and candidate selection
pub struct OverloadMatcher<'a> {
    hierarchy: TypeHierarchy<'a>,
}

impl<'a> OverloadMatcher<'a> {
    /// Create a matcher that resolves subtyping through `hierarchy`
    pub fn new(hierarchy: TypeHierarchy<'a>) -> Self {
        Self { hierarchy }
    }

    /// First candidate named `name` (any name if `None`) that accepts `args`
    pub fn select<'m, M, I>(
        &self,
        candidates: I,
        name: Option<&str>,
        args: &[Value],
    ) -> AccessorResult<Option<&'m M>>
    where
        M: Invocable + 'm,
        I: IntoIterator<Item = &'m M>,
    {
        for candidate in candidates {
            let signature = candidate.signature();
            if name.is_some_and(|n| n != signature.name()) {
                continue;
            }
            if self.params_match(signature.params(), args)? {
                trace!(candidate = %signature, "selected candidate");
                return Ok(Some(candidate));
            }
            trace!(candidate = %signature, "candidate rejected");
        }
        Ok(None)
    }

    /// Check a whole argument list against declared parameter kinds
    pub fn params_match(&self, params: &[Kind], args: &[Value]) -> AccessorResult<bool> {
        if params.len() != args.len() {
            return Ok(false);
        }
        for (param, arg) in params.iter().zip(args) {
            if !self.is_compatible(param, arg)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Check one argument against one declared parameter kind.
    ///
    /// - null is compatible with every kind
    /// - a primitive parameter takes that primitive, unboxed or boxed
    /// - a reference parameter takes the type itself or any subtype
    ///
    /// Parameters of kind `byte` or `void` are not supported and fail with
    /// a configuration error.
    pub fn is_compatible(&self, param: &Kind, arg: &Value) -> AccessorResult<bool> {
        if arg.is_null() {
            return Ok(true);
        }

        match param {
            Kind::Primitive(kind) => {
                if !is_supported_primitive(*kind) {
                    return Err(AccessorError::Configuration(format!(
                        "Unrecognised primitive type {}",
                        kind.name()
                    )));
                }
                Ok(match arg {
                    Value::Primitive(p) | Value::Boxed(p) => p.kind() == *kind,
                    _ => false,
                })
            }
            Kind::Reference(expected) => match arg {
                // An unboxed primitive is not an instance of any reference type
                Value::Primitive(_) => Ok(false),
                _ => self.hierarchy.is_subtype(&arg.type_name(), expected),
            },
        }
    }
}

fn is_supported_primitive(kind: PrimitiveKind) -> bool {
    matches!(
        kind,
        PrimitiveKind::Int
            | PrimitiveKind::Boolean
            | PrimitiveKind::Float
            | PrimitiveKind::Double
            | PrimitiveKind::Char
            | PrimitiveKind::Long
            | PrimitiveKind::Short
    )
}

/// Comma-separated runtime type names of an argument list, for diagnostics
pub fn describe_args(args: &[Value]) -> String {
    args.iter()
        .map(|a| match a {
            Value::Null => "(null)".to_string(),
            other => other.type_name().into_owned(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
