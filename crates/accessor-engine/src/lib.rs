//! Accessor engine - reflective access to code under test
//!
//! Grading code drives student code through an [`Accessor`]: types are named
//! exactly or by regular expression, constructors and methods are chosen by
//! matching runtime argument kinds against declared parameter kinds, and
//! every action is reported to an [`ActionListener`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use accessor_engine::{Accessor, ConsoleListener};
//! use accessor_sdk::{ClassRegistry, Value};
//!
//! let accessor = Accessor::with_listener(Arc::new(registry), ConsoleListener::new());
//! let counter = accessor.construct(Some("c"), ".*Counter", &[Value::from(5)])?;
//! accessor.invoke(&counter, "increment", &[])?;
//! let value: i32 = accessor.get_field(&counter, "value")?.cast()?;
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - type name patterns to concrete names
//! - [`hierarchy`] - ancestor chains and subtyping
//! - [`matcher`] - overload selection
//! - [`accessor`] - the facade
//! - [`listener`], [`console`] - action reporting
//! - [`config`] - `[accessor]` TOML settings

#![warn(missing_docs)]

pub mod accessor;
pub mod config;
pub mod console;
pub mod hierarchy;
pub mod listener;
pub mod matcher;
pub mod resolver;

pub use accessor::{Accessor, Target, PANIC_KIND};
pub use config::{AccessorConfig, ConfigError, ListenerKind};
pub use console::ConsoleListener;
pub use hierarchy::TypeHierarchy;
pub use listener::{ActionListener, NoopListener};
pub use matcher::OverloadMatcher;
pub use resolver::NameResolver;
