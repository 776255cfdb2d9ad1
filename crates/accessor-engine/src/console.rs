//! Human-readable rendering of accessor actions

use std::cell::RefCell;
use std::io::{self, Stdout, Write};

use accessor_sdk::{ObjectRef, Value};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::listener::ActionListener;

/// Listener that writes one line per action.
///
/// Objects bound by [`ActionListener::created_object`] are afterwards
/// rendered by their symbolic name. The binding table is keyed by object
/// identity and lives as long as the listener.
pub struct ConsoleListener<W: Write = Stdout> {
    out: RefCell<W>,
    object_names: RefCell<FxHashMap<u64, String>>,
}

impl ConsoleListener<Stdout> {
    /// Render to standard output
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleListener<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleListener<W> {
    /// Render to any writer
    pub fn with_writer(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            object_names: RefCell::new(FxHashMap::default()),
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Textual form of a value as it appears in rendered lines
    pub fn render(&self, value: &Value) -> String {
        match value {
            Value::Null => "<null>".to_string(),
            Value::Object(o) => self.render_object(o),
            Value::Primitive(p) | Value::Boxed(p) => p.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Array(_) => value.type_name().into_owned(),
        }
    }

    fn render_object(&self, object: &ObjectRef) -> String {
        match self.object_names.borrow().get(&object.id()) {
            Some(name) => name.clone(),
            None => object.type_name().to_string(),
        }
    }

    fn render_args(&self, args: &[Value]) -> String {
        args.iter()
            .map(|a| self.render(a))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn emit(&self, line: std::fmt::Arguments<'_>) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "- {}", line) {
            warn!(error = %e, "failed to write accessor action");
        }
    }
}

impl<W: Write> ActionListener for ConsoleListener<W> {
    fn constructing_class(&self, type_name: &str, args: &[Value]) {
        self.emit(format_args!(
            "Creating new object using constructor {}({})",
            type_name,
            self.render_args(args)
        ));
    }

    fn created_object(&self, instance_name: &str, instance: &ObjectRef) {
        self.object_names
            .borrow_mut()
            .insert(instance.id(), instance_name.to_string());
        self.emit(format_args!(
            "New object will be referred to as '{}'",
            instance_name
        ));
    }

    fn getting_static_field(&self, type_name: &str, field_name: &str) {
        self.emit(format_args!("Getting static field {}.{}", type_name, field_name));
    }

    fn getting_instance_field(&self, instance: &ObjectRef, field_name: &str) {
        self.emit(format_args!(
            "Getting instance field {}.{}",
            self.render_object(instance),
            field_name
        ));
    }

    fn invoking_static_method(&self, type_name: &str, method_name: &str, args: &[Value]) {
        self.emit(format_args!(
            "Invoking static method {}.{}({})",
            type_name,
            method_name,
            self.render_args(args)
        ));
    }

    fn invoking_instance_method(&self, instance: &ObjectRef, method_name: &str, args: &[Value]) {
        self.emit(format_args!(
            "Invoking instance method {}.{}({})",
            self.render_object(instance),
            method_name,
            self.render_args(args)
        ));
    }
}
