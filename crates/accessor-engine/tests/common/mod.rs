//! Shared fixtures for accessor integration tests
//!
//! `tick.*` stands in for a student submission: a counter with overloaded
//! constructors, a small shape hierarchy and a type with a `main`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Arc;

use accessor_engine::ActionListener;
use accessor_sdk::{
    arg, field, AccessorError, AccessorResult, ClassRegistry, Kind, ObjectRef, StaticSlot,
    Throwable, TypeDescriptor, TypeRegistry, Value,
};

/// Fixture registry plus the static slots tests inspect
pub struct Fixture {
    pub registry: Arc<ClassRegistry>,
    pub main_args: StaticSlot,
}

pub fn fixture() -> Fixture {
    let main_args = StaticSlot::new(Value::int(-1));
    let mut registry = ClassRegistry::new();
    registry
        .register_all(vec![
            counter(),
            shape(),
            circle(),
            program(main_args.clone()),
            TypeDescriptor::builder("tick.CounterTest").build(),
        ])
        .expect("fixture types register");
    Fixture {
        registry: Arc::new(registry),
        main_args,
    }
}

fn counter() -> TypeDescriptor {
    TypeDescriptor::builder("tick.Counter")
        .field("value", Kind::INT)
        .field("origin", Kind::string())
        .static_field("LIMIT", Kind::INT, StaticSlot::new(Value::int(100)))
        .constructor(vec![Kind::string()], |this, args| {
            let text: Option<String> = arg(args, 0)?;
            let value: i32 = match text {
                None => 0,
                Some(text) => text.trim().parse().map_err(|_| {
                    Throwable::new(
                        "NumberFormatException",
                        format!("For input string: \"{}\"", text),
                    )
                })?,
            };
            this.set_field("value", Value::int(value))?;
            this.set_field("origin", "String")
        })
        .constructor(vec![Kind::INT], |this, args| {
            let value: Option<i32> = arg(args, 0)?;
            this.set_field("value", Value::int(value.unwrap_or(0)))?;
            this.set_field("origin", "int")
        })
        .method("increment", vec![], |this, _| {
            let value: i32 = field(this, "value")?;
            if value >= 100 {
                return Err(Throwable::new("IllegalStateException", "limit reached"));
            }
            this.set_field("value", Value::int(value + 1))?;
            Ok(Value::int(value + 1))
        })
        .method("add", vec![Kind::INT], |this, args| {
            let value: i32 = field(this, "value")?;
            let delta: i32 = arg(args, 0)?;
            this.set_field("value", Value::int(value + delta))?;
            Ok(())
        })
        .static_method("describe", vec![Kind::object()], |args| {
            let value: Value = arg(args, 0)?;
            Ok(format!("a {}", value.type_name()))
        })
        .build()
}

fn shape() -> TypeDescriptor {
    TypeDescriptor::builder("tick.Shape")
        .field("label", Kind::string())
        .constructor(vec![], |this, _| this.set_field("label", "shape"))
        .method("area", vec![], |_, _| Ok(Value::double(0.0)))
        .method("name", vec![], |this, _| field::<String>(this, "label"))
        .static_method("unit", vec![], |_| Ok(Value::double(1.0)))
        .build()
}

fn circle() -> TypeDescriptor {
    TypeDescriptor::builder("tick.Circle")
        .extends("tick.Shape")
        .field("radius", Kind::DOUBLE)
        .computed_field("diameter", Kind::DOUBLE, |this| {
            let r: f64 = field(this, "radius")?;
            if r < 0.0 {
                return Err(Throwable::new("IllegalStateException", "negative radius"));
            }
            Ok(Value::double(2.0 * r))
        })
        .computed_static_field("SIDES", Kind::INT, || Ok(Value::int(0)))
        .constructor(vec![Kind::DOUBLE], |this, args| {
            this.set_field("label", "circle")?;
            this.set_field("radius", Value::double(arg(args, 0)?))
        })
        .method("area", vec![], |this, _| {
            let r: f64 = field(this, "radius")?;
            Ok(Value::double(3.0 * r * r))
        })
        .build()
}

fn program(main_args: StaticSlot) -> TypeDescriptor {
    TypeDescriptor::builder("tick.Program")
        .static_method(
            "main",
            vec![Kind::array_of(&Kind::string())],
            move |args| {
                let argv: Arc<accessor_sdk::Array> = arg(args, 0)?;
                main_args.set(Value::int(argv.len() as i32));
                Ok(())
            },
        )
        .static_method("divide", vec![Kind::INT, Kind::INT], |args| {
            let (a, b): (i32, i32) = (arg(args, 0)?, arg(args, 1)?);
            if b == 0 {
                return Err(Throwable::new("ArithmeticException", "/ by zero"));
            }
            Ok(Value::int(a / b))
        })
        .static_method("boom", vec![], |_| -> Result<Value, Throwable> {
            panic!("student code panicked")
        })
        .static_method("measure", vec![Kind::reference("tick.Shape")], |args| {
            let shape: ObjectRef = arg(args, 0)?;
            Ok(shape.type_name().to_string())
        })
        .static_method("total", vec![Kind::reference("Integer"), Kind::LONG], |args| {
            let (a, b): (i32, i64) = (arg(args, 0)?, arg(args, 1)?);
            Ok(Value::long(a as i64 + b))
        })
        .static_method("widen", vec![Kind::Primitive(accessor_sdk::PrimitiveKind::Byte)], |_| {
            Ok(())
        })
        .build()
}

/// Registry whose enumeration always fails
pub struct UnscannableRegistry(pub ClassRegistry);

impl TypeRegistry for UnscannableRegistry {
    fn type_names(&self) -> AccessorResult<Vec<String>> {
        Err(AccessorError::RegistryUnavailable(
            "class path could not be read".to_string(),
        ))
    }

    fn load_type(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.0.load_type(name)
    }
}

/// One notification as received by [`RecordingListener`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Constructing(String, Vec<Value>),
    Created(String, ObjectRef),
    StaticField(String, String),
    InstanceField(ObjectRef, String),
    StaticMethod(String, String, Vec<Value>),
    InstanceMethod(ObjectRef, String, Vec<Value>),
}

/// Listener that records every notification in order
#[derive(Default)]
pub struct RecordingListener {
    events: RefCell<Vec<Event>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl ActionListener for RecordingListener {
    fn constructing_class(&self, type_name: &str, args: &[Value]) {
        self.push(Event::Constructing(type_name.to_string(), args.to_vec()));
    }

    fn created_object(&self, instance_name: &str, instance: &ObjectRef) {
        self.push(Event::Created(instance_name.to_string(), instance.clone()));
    }

    fn getting_static_field(&self, type_name: &str, field_name: &str) {
        self.push(Event::StaticField(type_name.to_string(), field_name.to_string()));
    }

    fn getting_instance_field(&self, instance: &ObjectRef, field_name: &str) {
        self.push(Event::InstanceField(instance.clone(), field_name.to_string()));
    }

    fn invoking_static_method(&self, type_name: &str, method_name: &str, args: &[Value]) {
        self.push(Event::StaticMethod(
            type_name.to_string(),
            method_name.to_string(),
            args.to_vec(),
        ));
    }

    fn invoking_instance_method(&self, instance: &ObjectRef, method_name: &str, args: &[Value]) {
        self.push(Event::InstanceMethod(
            instance.clone(),
            method_name.to_string(),
            args.to_vec(),
        ));
    }
}
