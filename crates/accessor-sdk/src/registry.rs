//! Type registry
//!
//! The registry is the harness's view of "whatever is loadable": it
//! enumerates top-level type names and loads descriptors by exact name. It is
//! populated once at harness start and read-only afterwards.

use std::sync::{Arc, LazyLock};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::TypeDescriptor;
use crate::error::{AccessorError, AccessorResult};
use crate::kind::{PrimitiveKind, OBJECT, STRING};
use crate::value::{ObjectRef, Value};

/// Capability to enumerate and load types by name
pub trait TypeRegistry: Send + Sync {
    /// Enumerate every visible top-level type name, in enumeration order.
    ///
    /// Fails with [`AccessorError::RegistryUnavailable`] if the underlying
    /// source cannot be scanned.
    fn type_names(&self) -> AccessorResult<Vec<String>>;

    /// Load a type descriptor by exact name
    fn load_type(&self, name: &str) -> Option<Arc<TypeDescriptor>>;

    /// Allocate an object of type `name` with one default-valued slot per
    /// instance field name declared on its ancestor chain.
    ///
    /// A shadowing field shares the slot of the field it shadows; the
    /// most-derived declaration sets its initial value. Bodies that return
    /// new objects allocate them through here.
    fn instantiate(&self, name: &str) -> AccessorResult<ObjectRef> {
        let mut slots: FxHashMap<String, Value> = FxHashMap::default();
        let mut seen = FxHashSet::default();
        let mut next = Some(name.to_string());

        while let Some(current) = next {
            let desc = self.load_type(&current).ok_or_else(|| {
                AccessorError::NotFound(format!("Type {} is not loadable", current))
            })?;
            if !seen.insert(current) {
                return Err(AccessorError::Configuration(format!(
                    "Cyclic ancestor chain while instantiating {}",
                    name
                )));
            }
            for field in desc.fields().iter().filter(|f| f.has_instance_slot()) {
                slots
                    .entry(field.name().to_string())
                    .or_insert_with(|| Value::default_for(field.kind()));
            }
            next = desc.parent().map(str::to_string);
        }

        Ok(ObjectRef::allocate(name, slots))
    }
}

/// Wrapper types for the boxed primitive kinds
const BOXED_KINDS: [PrimitiveKind; 8] = [
    PrimitiveKind::Int,
    PrimitiveKind::Boolean,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
    PrimitiveKind::Char,
    PrimitiveKind::Long,
    PrimitiveKind::Short,
    PrimitiveKind::Byte,
];

/// Built-in types: `Object`, `String` and the wrapper types.
///
/// They are loadable by name but are not part of any enumeration.
static BUILTINS: LazyLock<FxHashMap<&'static str, Arc<TypeDescriptor>>> = LazyLock::new(|| {
    let mut builtins = FxHashMap::default();
    builtins.insert(OBJECT, Arc::new(TypeDescriptor::builder(OBJECT).build()));
    let derived = std::iter::once(STRING).chain(BOXED_KINDS.iter().map(|k| k.boxed_name()));
    for name in derived {
        builtins.insert(
            name,
            Arc::new(TypeDescriptor::builder(name).extends(OBJECT).build()),
        );
    }
    builtins
});

/// Load a built-in type descriptor
pub fn builtin_type(name: &str) -> Option<Arc<TypeDescriptor>> {
    BUILTINS.get(name).cloned()
}

/// Check if a name is a built-in type
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// In-memory registry of explicitly registered types
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Types in registration order
    types: Vec<Arc<TypeDescriptor>>,
    /// Type name to index mapping
    name_to_id: FxHashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type.
    ///
    /// Fails if the name is already registered or names a built-in type.
    pub fn register(&mut self, desc: TypeDescriptor) -> AccessorResult<usize> {
        let name = desc.name().to_string();
        if is_builtin(&name) || self.name_to_id.contains_key(&name) {
            return Err(AccessorError::Configuration(format!(
                "Type {} is already registered",
                name
            )));
        }

        let id = self.types.len();
        self.types.push(Arc::new(desc));
        self.name_to_id.insert(name, id);
        Ok(id)
    }

    /// Register several types
    pub fn register_all(
        &mut self,
        descs: impl IntoIterator<Item = TypeDescriptor>,
    ) -> AccessorResult<()> {
        for desc in descs {
            self.register(desc)?;
        }
        Ok(())
    }

    /// Get a registered type by name (built-ins excluded)
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.name_to_id.get(name).and_then(|id| self.types.get(*id))
    }

    /// Iterate over registered types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.iter()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for ClassRegistry {
    fn type_names(&self) -> AccessorResult<Vec<String>> {
        Ok(self.types.iter().map(|t| t.name().to_string()).collect())
    }

    fn load_type(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.get(name).cloned().or_else(|| builtin_type(name))
    }
}
