//! Error types shared by the SDK and the engine

use std::fmt;

/// Result type for accessor operations
pub type AccessorResult<T> = Result<T, AccessorError>;

/// A failure raised by code under test.
///
/// This is what a constructor, method or computed field closure returns when
/// the student code "throws". The `kind` is the failure's own type name
/// (e.g. `IllegalArgumentException`) so grading code can assert on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throwable {
    kind: String,
    message: Option<String>,
}

impl Throwable {
    /// Create a failure with a kind and message
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: Some(message.into()),
        }
    }

    /// Create a failure that carries no message
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
        }
    }

    /// The failure's type name
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The failure's message, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Check the failure's kind
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind, message),
            None => f.write_str(&self.kind),
        }
    }
}

impl std::error::Error for Throwable {}

/// Accessor error types
///
/// Every variant except [`AccessorError::TargetFailure`] is an operational
/// failure of the harness itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccessorError {
    /// A named type or member does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A name pattern matched more than one type
    #[error("Found multiple types matching name {pattern}: {}", .matches.join(","))]
    Ambiguous {
        /// The pattern as supplied by the caller
        pattern: String,
        /// Every matching name, in enumeration order
        matches: Vec<String>,
    },

    /// No candidate member accepted the argument list
    #[error("No match: {0}")]
    NoMatch(String),

    /// An instance member was used without an instance
    #[error("Misuse: {0}")]
    Misuse(String),

    /// The registry could not enumerate its types
    #[error("Type registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// The pattern is not a valid regular expression
    #[error("Invalid type name pattern {pattern}: {reason}")]
    InvalidPattern {
        /// The pattern as supplied by the caller
        pattern: String,
        /// Why it failed to compile
        reason: String,
    },

    /// Descriptor or registry setup error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Value conversion failed
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// The invoked code raised a failure
    #[error("{0}")]
    TargetFailure(Throwable),
}

impl AccessorError {
    /// Kind of the failure raised by code under test, if this is one
    pub fn target_kind(&self) -> Option<&str> {
        match self {
            AccessorError::TargetFailure(throwable) => Some(throwable.kind()),
            _ => None,
        }
    }

    /// The failure raised by code under test, if this is one
    pub fn target(&self) -> Option<&Throwable> {
        match self {
            AccessorError::TargetFailure(throwable) => Some(throwable),
            _ => None,
        }
    }

    /// Check if the harness itself failed (as opposed to the code under test)
    pub fn is_operational(&self) -> bool {
        !matches!(self, AccessorError::TargetFailure(_))
    }
}

impl From<Throwable> for AccessorError {
    fn from(throwable: Throwable) -> Self {
        AccessorError::TargetFailure(throwable)
    }
}
