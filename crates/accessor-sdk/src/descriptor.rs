//! Type descriptors
//!
//! A [`TypeDescriptor`] is the explicit description of a type under test: its
//! declared constructors, methods and fields, and the name of its parent.
//! Bodies are native closures. Once built, a descriptor is immutable; the
//! only mutable state reachable from it is the contents of static field
//! slots, which belong to the code under test.
//!
//! ```ignore
//! let counter = StaticSlot::new(Value::int(0));
//! let desc = TypeDescriptor::builder("shapes.Circle")
//!     .extends("shapes.Shape")
//!     .field("radius", Kind::DOUBLE)
//!     .static_field("created", Kind::INT, counter.clone())
//!     .constructor(vec![Kind::DOUBLE], move |this, args| {
//!         this.set_field("radius", arg::<f64>(args, 0)?)?;
//!         Ok(())
//!     })
//!     .method("area", vec![], |this, _| {
//!         let r: f64 = field(this, "radius")?;
//!         Ok(Value::double(std::f64::consts::PI * r * r))
//!     })
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Throwable;
use crate::kind::Kind;
use crate::value::{FromValue, ObjectRef, Value};

/// Constructor body: initialises a freshly allocated object
pub type ConstructorFn = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), Throwable> + Send + Sync>;

/// Instance method body
pub type InstanceMethodFn =
    Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<Value, Throwable> + Send + Sync>;

/// Static method body
pub type StaticMethodFn = Arc<dyn Fn(&[Value]) -> Result<Value, Throwable> + Send + Sync>;

/// Computed field getter; the receiver is `None` for static fields
pub type FieldGetterFn = Arc<dyn Fn(Option<&ObjectRef>) -> Result<Value, Throwable> + Send + Sync>;

// ============================================================================
// Argument helpers for closure bodies
// ============================================================================

/// Extract argument `index` as a Rust type.
///
/// A missing or mistyped argument surfaces as an
/// `IllegalArgumentException` raised by the body.
pub fn arg<T: FromValue>(args: &[Value], index: usize) -> Result<T, Throwable> {
    let value = args.get(index).cloned().ok_or_else(|| {
        Throwable::new(
            "IllegalArgumentException",
            format!("missing argument {}", index),
        )
    })?;
    T::from_value(value).map_err(|e| Throwable::new("IllegalArgumentException", e.to_string()))
}

/// Read a field slot of `this` as a Rust type.
pub fn field<T: FromValue>(this: &ObjectRef, name: &str) -> Result<T, Throwable> {
    let value = this.get_field(name).ok_or_else(|| {
        Throwable::new("NoSuchFieldError", format!("{}.{}", this.type_name(), name))
    })?;
    T::from_value(value).map_err(|e| Throwable::new("ClassCastException", e.to_string()))
}

// ============================================================================
// Signatures and members
// ============================================================================

/// Name plus ordered parameter kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberSignature {
    name: String,
    params: Vec<Kind>,
}

impl MemberSignature {
    /// Create a signature
    pub fn new(name: impl Into<String>, params: Vec<Kind>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter kinds
    pub fn params(&self) -> &[Kind] {
        &self.params
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str(")")
    }
}

/// A member that takes an argument list
pub trait Invocable {
    /// The member's signature
    fn signature(&self) -> &MemberSignature;
}

/// Declared constructor
#[derive(Clone)]
pub struct ConstructorDescriptor {
    signature: MemberSignature,
    body: ConstructorFn,
}

impl ConstructorDescriptor {
    /// Constructor body
    pub fn body(&self) -> &ConstructorFn {
        &self.body
    }
}

impl Invocable for ConstructorDescriptor {
    fn signature(&self) -> &MemberSignature {
        &self.signature
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorDescriptor({})", self.signature)
    }
}

/// Method body, static or bound to a receiver
#[derive(Clone)]
pub enum MethodBody {
    /// Called with no receiver
    Static(StaticMethodFn),
    /// Called with a receiver
    Instance(InstanceMethodFn),
}

/// Declared method
#[derive(Clone)]
pub struct MethodDescriptor {
    signature: MemberSignature,
    body: MethodBody,
}

impl MethodDescriptor {
    /// Method body
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Check if the method is static
    pub fn is_static(&self) -> bool {
        matches!(self.body, MethodBody::Static(_))
    }

    /// Method name
    pub fn name(&self) -> &str {
        self.signature.name()
    }
}

impl Invocable for MethodDescriptor {
    fn signature(&self) -> &MemberSignature {
        &self.signature
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static() {
            write!(f, "MethodDescriptor(static {})", self.signature)
        } else {
            write!(f, "MethodDescriptor({})", self.signature)
        }
    }
}

// ============================================================================
// Fields
// ============================================================================

/// Shared storage for a static field.
///
/// Closures that need to read or write the field capture a clone of the
/// slot; the descriptor holds another.
#[derive(Clone, Default)]
pub struct StaticSlot(Arc<RwLock<Value>>);

impl StaticSlot {
    /// Create a slot with an initial value
    pub fn new(value: impl Into<Value>) -> Self {
        StaticSlot(Arc::new(RwLock::new(value.into())))
    }

    /// Current value
    pub fn get(&self) -> Value {
        self.0.read().clone()
    }

    /// Replace the value
    pub fn set(&self, value: impl Into<Value>) {
        *self.0.write() = value.into();
    }
}

impl fmt::Debug for StaticSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticSlot({:?})", *self.0.read())
    }
}

/// Where a field's value lives
#[derive(Clone)]
pub enum FieldStorage {
    /// A slot in each instance
    Instance,
    /// One slot for the type
    Static(StaticSlot),
    /// Produced by a getter on every read; may raise
    Computed {
        /// Whether the getter runs without a receiver
        is_static: bool,
        /// The getter
        getter: FieldGetterFn,
    },
}

/// Declared field
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: Kind,
    storage: FieldStorage,
}

impl FieldDescriptor {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value kind
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Storage of the field
    pub fn storage(&self) -> &FieldStorage {
        &self.storage
    }

    /// Check if the field is static
    pub fn is_static(&self) -> bool {
        match &self.storage {
            FieldStorage::Instance => false,
            FieldStorage::Static(_) => true,
            FieldStorage::Computed { is_static, .. } => *is_static,
        }
    }

    /// Check if each instance carries a slot for this field
    pub fn has_instance_slot(&self) -> bool {
        matches!(self.storage, FieldStorage::Instance)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_static() { "static " } else { "" };
        write!(f, "FieldDescriptor({}{} {})", prefix, self.kind, self.name)
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// Description of one type under test
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    parent: Option<String>,
    constructors: Vec<ConstructorDescriptor>,
    methods: Vec<MethodDescriptor>,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Start describing a type
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            desc: TypeDescriptor {
                name: name.into(),
                parent: None,
                constructors: Vec::new(),
                methods: Vec::new(),
                fields: Vec::new(),
            },
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent type name, if any
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Declared constructors, in declaration order
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Declared methods, in declaration order
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Find a declared field by name (this level only)
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`TypeDescriptor`]
pub struct TypeDescriptorBuilder {
    desc: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    /// Set the parent type
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.desc.parent = Some(parent.into());
        self
    }

    /// Declare an instance field
    pub fn field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.desc.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            storage: FieldStorage::Instance,
        });
        self
    }

    /// Declare a static field backed by `slot`
    pub fn static_field(mut self, name: impl Into<String>, kind: Kind, slot: StaticSlot) -> Self {
        self.desc.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            storage: FieldStorage::Static(slot),
        });
        self
    }

    /// Declare an instance field whose value is computed on read
    pub fn computed_field<F, R>(mut self, name: impl Into<String>, kind: Kind, getter: F) -> Self
    where
        F: Fn(&ObjectRef) -> Result<R, Throwable> + Send + Sync + 'static,
        R: Into<Value>,
    {
        let getter: FieldGetterFn = Arc::new(move |receiver: Option<&ObjectRef>| match receiver {
            Some(this) => getter(this).map(Into::into),
            None => Err(Throwable::new(
                "NullPointerException",
                "instance field read without receiver",
            )),
        });
        self.desc.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            storage: FieldStorage::Computed {
                is_static: false,
                getter,
            },
        });
        self
    }

    /// Declare a static field whose value is computed on read
    pub fn computed_static_field<F, R>(
        mut self,
        name: impl Into<String>,
        kind: Kind,
        getter: F,
    ) -> Self
    where
        F: Fn() -> Result<R, Throwable> + Send + Sync + 'static,
        R: Into<Value>,
    {
        let getter: FieldGetterFn = Arc::new(move |_: Option<&ObjectRef>| getter().map(Into::into));
        self.desc.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            storage: FieldStorage::Computed {
                is_static: true,
                getter,
            },
        });
        self
    }

    /// Declare a constructor
    pub fn constructor<F>(mut self, params: Vec<Kind>, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), Throwable> + Send + Sync + 'static,
    {
        let signature = MemberSignature::new(self.desc.name.clone(), params);
        self.desc.constructors.push(ConstructorDescriptor {
            signature,
            body: Arc::new(body),
        });
        self
    }

    /// Declare an instance method
    pub fn method<F, R>(mut self, name: impl Into<String>, params: Vec<Kind>, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<R, Throwable> + Send + Sync + 'static,
        R: Into<Value>,
    {
        let body: InstanceMethodFn = Arc::new(move |this: &ObjectRef, args: &[Value]| {
            body(this, args).map(Into::into)
        });
        self.desc.methods.push(MethodDescriptor {
            signature: MemberSignature::new(name, params),
            body: MethodBody::Instance(body),
        });
        self
    }

    /// Declare a static method
    pub fn static_method<F, R>(
        mut self,
        name: impl Into<String>,
        params: Vec<Kind>,
        body: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Result<R, Throwable> + Send + Sync + 'static,
        R: Into<Value>,
    {
        let body: StaticMethodFn = Arc::new(move |args: &[Value]| body(args).map(Into::into));
        self.desc.methods.push(MethodDescriptor {
            signature: MemberSignature::new(name, params),
            body: MethodBody::Static(body),
        });
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> TypeDescriptor {
        self.desc
    }
}
