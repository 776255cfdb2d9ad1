//! Runtime values passed to and returned from code under test
//!
//! A value's runtime kind is derived from its variant: `Primitive` values have
//! a primitive runtime kind, `Boxed` values have the wrapper type as runtime
//! kind (`Integer`, `Character`, ...), and `Str`, `Array` and `Object` values
//! are references to `String`, `T[]` and a registered type respectively.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::{AccessorError, AccessorResult, Throwable};
use crate::kind::{array_type_name, Kind, PrimitiveKind, STRING};

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

// ============================================================================
// Primitive
// ============================================================================

/// A primitive payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// `int`
    Int(i32),
    /// `boolean`
    Boolean(bool),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `char`
    Char(char),
    /// `long`
    Long(i64),
    /// `short`
    Short(i16),
    /// `byte`
    Byte(i8),
}

impl Primitive {
    /// The primitive kind of this payload
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Int(_) => PrimitiveKind::Int,
            Primitive::Boolean(_) => PrimitiveKind::Boolean,
            Primitive::Float(_) => PrimitiveKind::Float,
            Primitive::Double(_) => PrimitiveKind::Double,
            Primitive::Char(_) => PrimitiveKind::Char,
            Primitive::Long(_) => PrimitiveKind::Long,
            Primitive::Short(_) => PrimitiveKind::Short,
            Primitive::Byte(_) => PrimitiveKind::Byte,
        }
    }

    /// Default (zero) value of a primitive kind; `None` for `void`
    pub const fn zero(kind: PrimitiveKind) -> Option<Self> {
        match kind {
            PrimitiveKind::Int => Some(Primitive::Int(0)),
            PrimitiveKind::Boolean => Some(Primitive::Boolean(false)),
            PrimitiveKind::Float => Some(Primitive::Float(0.0)),
            PrimitiveKind::Double => Some(Primitive::Double(0.0)),
            PrimitiveKind::Char => Some(Primitive::Char('\0')),
            PrimitiveKind::Long => Some(Primitive::Long(0)),
            PrimitiveKind::Short => Some(Primitive::Short(0)),
            PrimitiveKind::Byte => Some(Primitive::Byte(0)),
            PrimitiveKind::Void => None,
        }
    }
}

fn write_floating(f: &mut fmt::Formatter<'_>, value: f64, debug: String) -> fmt::Result {
    if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        f.write_str(&debug)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Int(i) => write!(f, "{}", i),
            Primitive::Boolean(b) => write!(f, "{}", b),
            // Floating values keep their fraction: 1.0, not 1
            Primitive::Float(x) => write_floating(f, *x as f64, format!("{:?}", x)),
            Primitive::Double(x) => write_floating(f, *x, format!("{:?}", x)),
            Primitive::Char(c) => write!(f, "{}", c),
            Primitive::Long(l) => write!(f, "{}", l),
            Primitive::Short(s) => write!(f, "{}", s),
            Primitive::Byte(b) => write!(f, "{}", b),
        }
    }
}

// ============================================================================
// Objects and arrays
// ============================================================================

/// Heap object instance
///
/// Holds one slot per field name declared on its type's ancestor chain.
/// Identity is the object ID, never the field contents.
pub struct Object {
    object_id: u64,
    type_name: String,
    fields: Mutex<FxHashMap<String, Value>>,
}

/// Shared handle to an [`Object`]
///
/// Equality is identity: two handles are equal when they refer to the same
/// allocation.
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    /// Allocate a new object of `type_name` with the given initial slots
    pub fn allocate(
        type_name: impl Into<String>,
        slots: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        ObjectRef(Arc::new(Object {
            object_id: generate_object_id(),
            type_name: type_name.into(),
            fields: Mutex::new(slots.into_iter().collect()),
        }))
    }

    /// Unique object ID
    pub fn id(&self) -> u64 {
        self.0.object_id
    }

    /// Runtime type name
    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    /// Read a field slot
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.0.fields.lock().get(name).cloned()
    }

    /// Write a field slot
    ///
    /// Fails with `NoSuchFieldError` if the object has no slot of that name,
    /// so constructor and method closures can propagate it with `?`.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) -> Result<(), Throwable> {
        let mut fields = self.0.fields.lock();
        match fields.get_mut(name) {
            Some(slot) => {
                // Primitive slots stay unboxed
                *slot = match (&*slot, value.into()) {
                    (Value::Primitive(_), Value::Boxed(p)) => Value::Primitive(p),
                    (_, value) => value,
                };
                Ok(())
            }
            None => Err(Throwable::new(
                "NoSuchFieldError",
                format!("{}.{}", self.0.type_name, name),
            )),
        }
    }

    /// Check if the object has a slot of that name
    pub fn has_field(&self, name: &str) -> bool {
        self.0.fields.lock().contains_key(name)
    }

    /// Check if two handles refer to the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.type_name, self.0.object_id)
    }
}

/// Array value
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    element_type: String,
    items: Vec<Value>,
}

impl Array {
    /// Create an array with the given element type name
    pub fn new(element_type: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            element_type: element_type.into(),
            items,
        }
    }

    /// Element type name
    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    /// Array items
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Value
// ============================================================================

/// Runtime value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Unboxed primitive; runtime kind is the primitive
    Primitive(Primitive),
    /// Boxed primitive; runtime kind is the wrapper type
    Boxed(Primitive),
    /// `String`
    Str(Arc<str>),
    /// `T[]`
    Array(Arc<Array>),
    /// Instance of a registered type
    Object(ObjectRef),
}

impl Value {
    /// Unboxed `int`
    pub const fn int(i: i32) -> Self {
        Value::Primitive(Primitive::Int(i))
    }

    /// Unboxed `boolean`
    pub const fn boolean(b: bool) -> Self {
        Value::Primitive(Primitive::Boolean(b))
    }

    /// Unboxed `double`
    pub const fn double(d: f64) -> Self {
        Value::Primitive(Primitive::Double(d))
    }

    /// Unboxed `long`
    pub const fn long(l: i64) -> Self {
        Value::Primitive(Primitive::Long(l))
    }

    /// Unboxed `char`
    pub const fn char(c: char) -> Self {
        Value::Primitive(Primitive::Char(c))
    }

    /// `String` value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Array value
    pub fn array(element_type: impl Into<String>, items: Vec<Value>) -> Self {
        Value::Array(Arc::new(Array::new(element_type, items)))
    }

    /// `String[]` value
    pub fn string_array<S: AsRef<str>>(items: &[S]) -> Self {
        Value::array(STRING, items.iter().map(Value::string).collect())
    }

    /// Default value for a declared kind: zero for primitives, null otherwise
    pub fn default_for(kind: &Kind) -> Self {
        match kind {
            Kind::Primitive(p) => Primitive::zero(*p).map_or(Value::Null, Value::Primitive),
            Kind::Reference(_) => Value::Null,
        }
    }

    /// Check if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime kind; `None` for null
    pub fn runtime_kind(&self) -> Option<Kind> {
        match self {
            Value::Null => None,
            Value::Primitive(p) => Some(Kind::Primitive(p.kind())),
            _ => Some(Kind::Reference(self.type_name().into_owned())),
        }
    }

    /// Runtime type name, for reporting
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Primitive(p) => Cow::Borrowed(p.kind().name()),
            Value::Boxed(p) => Cow::Borrowed(p.kind().boxed_name()),
            Value::Str(_) => Cow::Borrowed(STRING),
            Value::Array(a) => Cow::Owned(array_type_name(a.element_type())),
            Value::Object(o) => Cow::Borrowed(o.type_name()),
        }
    }

    /// The primitive payload of a primitive or boxed value
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Value::Primitive(p) | Value::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// The object handle, if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The string contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Convert into a Rust type
    pub fn cast<T: FromValue>(self) -> AccessorResult<T> {
        T::from_value(self)
    }
}

// Argument lists autobox, so the `From` conversions produce boxed values.
macro_rules! boxed_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Boxed(Primitive::$variant(v))
                }
            }
        )*
    };
}

boxed_from! {
    i32 => Int,
    bool => Boolean,
    f32 => Float,
    f64 => Double,
    char => Char,
    i64 => Long,
    i16 => Short,
    i8 => Byte,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<&ObjectRef> for Value {
    fn from(o: &ObjectRef) -> Self {
        Value::Object(o.clone())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(Arc::new(a))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Conversion out of Value
// ============================================================================

/// Convert from a [`Value`] to a Rust type.
///
/// Primitive targets accept both the unboxed and boxed form.
pub trait FromValue: Sized {
    /// Convert, returning a type mismatch if the value is of another kind
    fn from_value(value: Value) -> AccessorResult<Self>;
}

fn mismatch(expected: &str, value: &Value) -> AccessorError {
    AccessorError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().into_owned(),
    }
}

macro_rules! primitive_from_value {
    ($($ty:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> AccessorResult<Self> {
                    match value.as_primitive() {
                        Some(Primitive::$variant(v)) => Ok(v),
                        _ => Err(mismatch($name, &value)),
                    }
                }
            }
        )*
    };
}

primitive_from_value! {
    i32 => Int, "int";
    bool => Boolean, "boolean";
    f32 => Float, "float";
    f64 => Double, "double";
    char => Char, "char";
    i64 => Long, "long";
    i16 => Short, "short";
    i8 => Byte, "byte";
}

impl FromValue for Value {
    fn from_value(value: Value) -> AccessorResult<Self> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> AccessorResult<Self> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(mismatch(STRING, &other)),
        }
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> AccessorResult<Self> {
        match value {
            Value::Object(o) => Ok(o),
            other => Err(mismatch("object", &other)),
        }
    }
}

impl FromValue for Arc<Array> {
    fn from_value(value: Value) -> AccessorResult<Self> {
        match value {
            Value::Array(a) => Ok(a),
            other => Err(mismatch("array", &other)),
        }
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> AccessorResult<Self> {
        match value {
            Value::Null => Ok(()),
            other => Err(mismatch("void", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> AccessorResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
