//! Accessor SDK - describing code under test to the harness
//!
//! This crate provides the types the accessor harness operates on, without
//! depending on the engine: runtime [`Value`]s, declared [`Kind`]s,
//! [`TypeDescriptor`]s whose members are native closures, and the
//! [`TypeRegistry`] capability the engine resolves names against.
//!
//! # Example
//!
//! ```ignore
//! use accessor_sdk::{arg, ClassRegistry, Kind, TypeDescriptor, Throwable, Value};
//!
//! let mut registry = ClassRegistry::new();
//! registry.register(
//!     TypeDescriptor::builder("maths.Calculator")
//!         .static_method("divide", vec![Kind::INT, Kind::INT], |args| {
//!             let (a, b): (i32, i32) = (arg(args, 0)?, arg(args, 1)?);
//!             if b == 0 {
//!                 return Err(Throwable::new("ArithmeticException", "/ by zero"));
//!             }
//!             Ok(Value::int(a / b))
//!         })
//!         .build(),
//! )?;
//! ```

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod kind;
pub mod registry;
pub mod value;

pub use descriptor::{
    arg, field, ConstructorDescriptor, FieldDescriptor, FieldStorage, Invocable,
    MemberSignature, MethodBody, MethodDescriptor, StaticSlot, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use error::{AccessorError, AccessorResult, Throwable};
pub use kind::{Kind, PrimitiveKind, OBJECT, STRING};
pub use registry::{builtin_type, is_builtin, ClassRegistry, TypeRegistry};
pub use value::{Array, FromValue, ObjectRef, Primitive, Value};
