//! Declared kinds of parameters and fields
//!
//! A [`Kind`] is what a descriptor declares; the runtime kind of a value is
//! derived from the [`Value`](crate::Value) itself.

use std::fmt;

/// Name of the root reference type
pub const OBJECT: &str = "Object";
/// Name of the string type
pub const STRING: &str = "String";

/// Primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// 32-bit signed integer
    Int,
    /// Boolean
    Boolean,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Unicode scalar
    Char,
    /// 64-bit signed integer
    Long,
    /// 16-bit signed integer
    Short,
    /// 8-bit signed integer
    Byte,
    /// No value (return kind only)
    Void,
}

impl PrimitiveKind {
    /// Source-level name of the primitive
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Void => "void",
        }
    }

    /// Name of the wrapper type a value of this primitive boxes into
    pub const fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Char => "Character",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Void => "Void",
        }
    }

    /// Parse a primitive from its source-level name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(PrimitiveKind::Int),
            "boolean" => Some(PrimitiveKind::Boolean),
            "float" => Some(PrimitiveKind::Float),
            "double" => Some(PrimitiveKind::Double),
            "char" => Some(PrimitiveKind::Char),
            "long" => Some(PrimitiveKind::Long),
            "short" => Some(PrimitiveKind::Short),
            "byte" => Some(PrimitiveKind::Byte),
            "void" => Some(PrimitiveKind::Void),
            _ => None,
        }
    }
}

/// Declared kind of a parameter or field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A primitive kind
    Primitive(PrimitiveKind),
    /// A reference to a named type (including `Object`, `String`, wrappers
    /// and `T[]` array types)
    Reference(String),
}

impl Kind {
    /// `int`
    pub const INT: Kind = Kind::Primitive(PrimitiveKind::Int);
    /// `boolean`
    pub const BOOLEAN: Kind = Kind::Primitive(PrimitiveKind::Boolean);
    /// `float`
    pub const FLOAT: Kind = Kind::Primitive(PrimitiveKind::Float);
    /// `double`
    pub const DOUBLE: Kind = Kind::Primitive(PrimitiveKind::Double);
    /// `char`
    pub const CHAR: Kind = Kind::Primitive(PrimitiveKind::Char);
    /// `long`
    pub const LONG: Kind = Kind::Primitive(PrimitiveKind::Long);
    /// `short`
    pub const SHORT: Kind = Kind::Primitive(PrimitiveKind::Short);

    /// Reference kind for a named type
    pub fn reference(name: impl Into<String>) -> Self {
        Kind::Reference(name.into())
    }

    /// `String`
    pub fn string() -> Self {
        Kind::Reference(STRING.to_string())
    }

    /// `Object`
    pub fn object() -> Self {
        Kind::Reference(OBJECT.to_string())
    }

    /// Array of the given element kind
    pub fn array_of(element: &Kind) -> Self {
        Kind::Reference(array_type_name(&element.to_string()))
    }

    /// Parse a kind from a source-level type name
    ///
    /// Primitive names map to primitive kinds, everything else is a
    /// reference.
    pub fn parse(name: &str) -> Self {
        match PrimitiveKind::from_name(name) {
            Some(p) => Kind::Primitive(p),
            None => Kind::Reference(name.to_string()),
        }
    }

    /// Check if this is a primitive kind
    pub fn is_primitive(&self) -> bool {
        matches!(self, Kind::Primitive(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Primitive(p) => f.write_str(p.name()),
            Kind::Reference(name) => f.write_str(name),
        }
    }
}

/// Name of the array type with the given element type
pub fn array_type_name(element: &str) -> String {
    format!("{}[]", element)
}

/// Element type of an array type name, if it is one
pub fn array_element(name: &str) -> Option<&str> {
    name.strip_suffix("[]")
}
