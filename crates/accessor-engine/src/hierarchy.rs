//! Ancestor chains and the nominal subtype relation
//!
//! Chains are walked from the type itself upward, so every list returned here
//! is most-derived first.

use std::sync::Arc;

use accessor_sdk::kind::array_element;
use accessor_sdk::{
    AccessorError, AccessorResult, FieldDescriptor, MethodDescriptor, PrimitiveKind,
    TypeDescriptor, TypeRegistry, OBJECT,
};
use rustc_hash::FxHashSet;

/// Walks ancestor chains through a registry
#[derive(Clone, Copy)]
pub struct TypeHierarchy<'a> {
    registry: &'a dyn TypeRegistry,
}

impl<'a> TypeHierarchy<'a> {
    /// Create a hierarchy view over a registry
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Self { registry }
    }

    /// The type and all of its ancestors, most-derived first.
    ///
    /// A parent that cannot be loaded is NotFound; a chain that revisits a
    /// type is a configuration error.
    pub fn ancestors(
        &self,
        desc: &Arc<TypeDescriptor>,
    ) -> AccessorResult<Vec<Arc<TypeDescriptor>>> {
        let mut chain = vec![Arc::clone(desc)];
        let mut seen = FxHashSet::default();
        seen.insert(desc.name().to_string());

        let mut current = Arc::clone(desc);
        while let Some(parent) = current.parent() {
            if !seen.insert(parent.to_string()) {
                return Err(AccessorError::Configuration(format!(
                    "Cyclic ancestor chain: {} extends {}",
                    current.name(),
                    parent
                )));
            }
            let next = self.registry.load_type(parent).ok_or_else(|| {
                AccessorError::NotFound(format!(
                    "Parent type {} of {} is not loadable",
                    parent,
                    current.name()
                ))
            })?;
            chain.push(Arc::clone(&next));
            current = next;
        }

        Ok(chain)
    }

    /// Every method declared on the chain, most-derived level first and
    /// declaration order within a level. Same-signature members from
    /// different levels are all kept.
    pub fn gather_methods(
        &self,
        desc: &Arc<TypeDescriptor>,
    ) -> AccessorResult<Vec<MethodDescriptor>> {
        Ok(self
            .ancestors(desc)?
            .iter()
            .flat_map(|level| level.methods().iter().cloned())
            .collect())
    }

    /// Every field declared on the chain, most-derived first
    pub fn gather_fields(
        &self,
        desc: &Arc<TypeDescriptor>,
    ) -> AccessorResult<Vec<FieldDescriptor>> {
        Ok(self
            .ancestors(desc)?
            .iter()
            .flat_map(|level| level.fields().iter().cloned())
            .collect())
    }

    /// First field named `name` on the chain
    pub fn find_field(
        &self,
        desc: &Arc<TypeDescriptor>,
        name: &str,
    ) -> AccessorResult<Option<FieldDescriptor>> {
        Ok(self.gather_fields(desc)?.into_iter().find(|f| f.name() == name))
    }

    /// Check if reference type `sub` is `sup` or one of its descendants.
    ///
    /// Every reference type is a subtype of `Object`. `A[] <: B[]` holds when
    /// `A <: B` for reference element types; primitive arrays are only
    /// subtypes of themselves (and `Object`).
    pub fn is_subtype(&self, sub: &str, sup: &str) -> AccessorResult<bool> {
        if sub == sup || sup == OBJECT {
            return Ok(true);
        }

        match (array_element(sub), array_element(sup)) {
            (Some(sub_elem), Some(sup_elem)) => {
                if is_primitive_name(sub_elem) || is_primitive_name(sup_elem) {
                    return Ok(false);
                }
                return self.is_subtype(sub_elem, sup_elem);
            }
            (Some(_), None) | (None, Some(_)) => return Ok(false),
            (None, None) => {}
        }

        let desc = match self.registry.load_type(sub) {
            Some(desc) => desc,
            None => return Ok(false),
        };
        Ok(self.ancestors(&desc)?.iter().any(|level| level.name() == sup))
    }
}

fn is_primitive_name(name: &str) -> bool {
    PrimitiveKind::from_name(name).is_some()
}
