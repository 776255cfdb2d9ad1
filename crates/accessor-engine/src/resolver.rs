//! Type name resolution
//!
//! A type may be named exactly or by a regular expression matched against the
//! whole of every enumerated type name. The two call sites differ on what an
//! empty match means:
//!
//! | Call site                   | No match              |
//! |-----------------------------|-----------------------|
//! | [`NameResolver::resolve`]   | pattern returned as is |
//! | [`NameResolver::load`]      | `NotFound`            |

use std::sync::Arc;

use accessor_sdk::{AccessorError, AccessorResult, TypeDescriptor, TypeRegistry};
use regex::Regex;
use tracing::debug;

/// Resolves type name patterns against a registry
pub struct NameResolver<'a> {
    registry: &'a dyn TypeRegistry,
    scan_prefix: Option<&'a str>,
}

impl<'a> NameResolver<'a> {
    /// Create a resolver over a registry
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Self {
            registry,
            scan_prefix: None,
        }
    }

    /// Only consider enumerated names starting with `prefix`
    pub fn with_scan_prefix(mut self, prefix: Option<&'a str>) -> Self {
        self.scan_prefix = prefix;
        self
    }

    /// Resolve a pattern to one concrete name.
    ///
    /// An exact, loadable name is returned without enumerating the registry.
    /// If nothing matches, the pattern itself is returned and the caller's
    /// subsequent load decides whether it exists.
    pub fn resolve(&self, pattern: &str) -> AccessorResult<String> {
        if self.registry.load_type(pattern).is_some() {
            return Ok(pattern.to_string());
        }

        let mut matches = self.scan(pattern)?;
        match matches.len() {
            0 => Ok(pattern.to_string()),
            1 => Ok(matches.remove(0)),
            _ => Err(ambiguous(pattern, matches)),
        }
    }

    /// Resolve a pattern that must name an existing type
    pub fn resolve_existing(&self, pattern: &str) -> AccessorResult<String> {
        if self.registry.load_type(pattern).is_some() {
            return Ok(pattern.to_string());
        }

        let mut matches = self.scan(pattern)?;
        match matches.len() {
            0 => Err(AccessorError::NotFound(format!(
                "Failed to find a type matching name {}",
                pattern
            ))),
            1 => Ok(matches.remove(0)),
            _ => Err(ambiguous(pattern, matches)),
        }
    }

    /// Resolve a pattern and load the descriptor it names
    pub fn load(&self, pattern: &str) -> AccessorResult<Arc<TypeDescriptor>> {
        let name = self.resolve_existing(pattern)?;
        let desc = self.registry.load_type(&name).ok_or_else(|| {
            AccessorError::NotFound(format!("Type {} is not loadable", name))
        })?;
        if name != pattern {
            debug!(pattern, resolved = %name, "resolved type name pattern");
        }
        Ok(desc)
    }

    /// Every enumerated name the pattern matches in full, in enumeration order
    fn scan(&self, pattern: &str) -> AccessorResult<Vec<String>> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            AccessorError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;

        let names = self.registry.type_names()?;
        let matches: Vec<String> = names
            .into_iter()
            .filter(|name| self.scan_prefix.map_or(true, |p| name.starts_with(p)))
            .filter(|name| regex.is_match(name))
            .collect();

        debug!(pattern, count = matches.len(), "scanned registry for type name pattern");
        Ok(matches)
    }
}

fn ambiguous(pattern: &str, matches: Vec<String>) -> AccessorError {
    AccessorError::Ambiguous {
        pattern: pattern.to_string(),
        matches,
    }
}
