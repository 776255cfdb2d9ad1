//! Accessor integration tests
//!
//! Drives the fixture submission in `common` through the facade and checks
//! resolution, overload selection, dispatch and the failures each step can
//! raise.

mod common;

use std::sync::Arc;

use accessor_engine::{Accessor, AccessorConfig, Target, PANIC_KIND};
use accessor_sdk::{AccessorError, ClassRegistry, Value};
use common::{fixture, Event, RecordingListener, UnscannableRegistry};

fn accessor() -> Accessor<RecordingListener> {
    Accessor::with_listener(fixture().registry, RecordingListener::default())
}

// ============================================================================
// Name resolution
// ============================================================================

#[test]
fn test_resolve_own_name() {
    let accessor = accessor();
    assert_eq!(
        accessor.resolve_type_name("tick.CounterTest").unwrap(),
        "tick.CounterTest"
    );
    assert_eq!(accessor.resolve_type_name(".*CounterTest").unwrap(), "tick.CounterTest");
}

#[test]
fn test_resolve_whole_package_is_ambiguous() {
    let accessor = accessor();
    match accessor.resolve_type_name("tick\\..*") {
        Err(AccessorError::Ambiguous { matches, .. }) => assert_eq!(
            matches,
            vec![
                "tick.Counter",
                "tick.Shape",
                "tick.Circle",
                "tick.Program",
                "tick.CounterTest"
            ]
        ),
        other => panic!("expected ambiguity, got {:?}", other),
    }

    let err = accessor.invoke("tick\\..*", "main", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::Ambiguous { .. }));
    assert!(err.to_string().contains("tick.Program"));
}

#[test]
fn test_unmatched_pattern() {
    let accessor = accessor();
    assert_eq!(accessor.resolve_type_name("no.Such").unwrap(), "no.Such");

    let err = accessor.construct(None, "no.Such", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::NotFound(_)));
    let err = accessor.invoke("no\\..*", "run", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::NotFound(_)));
    let err = accessor.get_field("no.Such", "x").unwrap_err();
    assert!(matches!(err, AccessorError::NotFound(_)));
}

#[test]
fn test_exact_name_skips_enumeration() {
    let registry = UnscannableRegistry(Arc::try_unwrap(fixture().registry).unwrap_or_else(|_| {
        panic!("fixture registry is shared")
    }));
    let accessor = Accessor::new(Arc::new(registry));

    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();
    assert_eq!(counter.type_name(), "tick.Counter");

    let err = accessor.construct(None, ".*Counter", &[Value::from(1)]).unwrap_err();
    assert!(matches!(err, AccessorError::RegistryUnavailable(_)));
}

#[test]
fn test_scan_prefix() {
    let config = AccessorConfig {
        scan_prefix: Some("tick.Ci".to_string()),
        ..AccessorConfig::default()
    };
    let accessor = accessor().with_config(config);
    assert_eq!(accessor.resolve_type_name(".*").unwrap(), "tick.Circle");
}

#[test]
fn test_invalid_pattern() {
    let accessor = accessor();
    let err = accessor.construct(None, "tick.(Counter", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::InvalidPattern { .. }));
}

// ============================================================================
// Construction and overloads
// ============================================================================

#[test]
fn test_constructor_overloads_by_argument_kind() {
    let accessor = accessor();

    let from_text = accessor.construct(None, "tick.Counter", &[Value::from("42")]).unwrap();
    assert_eq!(from_text.get_field("origin"), Some(Value::from("String")));
    assert_eq!(from_text.get_field("value"), Some(Value::int(42)));

    let from_int = accessor.construct(None, "tick.Counter", &[Value::from(42)]).unwrap();
    assert_eq!(from_int.get_field("origin"), Some(Value::from("int")));
    assert_eq!(from_int.get_field("value"), Some(Value::int(42)));

    let unboxed = accessor.construct(None, "tick.Counter", &[Value::int(7)]).unwrap();
    assert_eq!(unboxed.get_field("origin"), Some(Value::from("int")));
}

#[test]
fn test_null_argument_takes_first_declared_constructor() {
    let accessor = accessor();
    let counter = accessor.construct(None, "tick.Counter", &[Value::Null]).unwrap();
    // (String) is declared before (int)
    assert_eq!(counter.get_field("origin"), Some(Value::from("String")));
    assert_eq!(counter.get_field("value"), Some(Value::int(0)));
}

#[test]
fn test_constructor_no_match() {
    let accessor = accessor();
    let err = accessor
        .construct(None, "tick.Counter", &[Value::from(1), Value::from(2)])
        .unwrap_err();
    match &err {
        AccessorError::NoMatch(message) => {
            assert!(message.contains("tick.Counter(Integer,Integer)"));
            assert!(message.contains("tick.Counter(String)"));
            assert!(message.contains("tick.Counter(int)"));
        }
        other => panic!("expected no match, got {:?}", other),
    }
    assert!(accessor.listener().events().is_empty());
}

#[test]
fn test_constructors_are_not_inherited() {
    let accessor = accessor();
    let err = accessor.construct(None, "tick.Circle", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::NoMatch(_)));
}

#[test]
fn test_fields_default_before_construction() {
    let accessor = accessor();
    let circle = accessor.construct(None, "tick.Circle", &[Value::double(1.5)]).unwrap();
    assert_eq!(circle.get_field("radius"), Some(Value::double(1.5)));
    assert_eq!(circle.get_field("label"), Some(Value::from("circle")));
    assert!(!circle.has_field("diameter"));
}

#[test]
fn test_construct_notifications() {
    let accessor = accessor();
    let named = accessor.construct(Some("c"), "tick.Counter", &[Value::from(3)]).unwrap();
    accessor.construct(None, "tick.Counter", &[Value::from(4)]).unwrap();

    assert_eq!(
        accessor.listener().events(),
        vec![
            Event::Constructing("tick.Counter".to_string(), vec![Value::from(3)]),
            Event::Created("c".to_string(), named),
            Event::Constructing("tick.Counter".to_string(), vec![Value::from(4)]),
        ]
    );
}

// ============================================================================
// Parameter compatibility
// ============================================================================

#[test]
fn test_null_matches_any_parameter() {
    let accessor = accessor();
    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();

    assert_eq!(
        accessor.invoke("tick.Counter", "describe", &[Value::Null]).unwrap(),
        Value::from("a null")
    );
    assert_eq!(
        accessor
            .invoke("tick.Program", "measure", &[Value::Null])
            .unwrap_err()
            .target_kind(),
        Some("IllegalArgumentException")
    );
    // int parameter, null argument: selected, and the body sees no value
    let err = accessor.invoke(&counter, "add", &[Value::Null]).unwrap_err();
    assert_eq!(err.target_kind(), Some("IllegalArgumentException"));
}

#[test]
fn test_primitive_parameter_accepts_boxed_and_unboxed() {
    let accessor = accessor();
    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();

    accessor.invoke(&counter, "add", &[Value::int(2)]).unwrap();
    accessor.invoke(&counter, "add", &[Value::from(3)]).unwrap();
    assert_eq!(accessor.get_field(&counter, "value").unwrap(), Value::int(6));

    let err = accessor.invoke(&counter, "add", &[Value::from(3i64)]).unwrap_err();
    assert!(matches!(err, AccessorError::NoMatch(_)));
}

#[test]
fn test_reference_parameter_requires_subtype() {
    let accessor = accessor();
    let circle = accessor.construct(None, "tick.Circle", &[Value::double(1.0)]).unwrap();
    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();

    assert_eq!(
        accessor
            .invoke("tick.Program", "measure", &[Value::from(&circle)])
            .unwrap(),
        Value::from("tick.Circle")
    );
    let err = accessor
        .invoke("tick.Program", "measure", &[Value::from(&counter)])
        .unwrap_err();
    assert!(matches!(err, AccessorError::NoMatch(_)));

    // Integer is a reference parameter: unboxed int does not fit
    assert_eq!(
        accessor
            .invoke("tick.Program", "total", &[Value::from(1), Value::long(2)])
            .unwrap(),
        Value::long(3)
    );
    let err = accessor
        .invoke("tick.Program", "total", &[Value::int(1), Value::long(2)])
        .unwrap_err();
    assert!(matches!(err, AccessorError::NoMatch(_)));
}

#[test]
fn test_unsupported_primitive_parameter() {
    let accessor = accessor();
    let err = accessor
        .invoke("tick.Program", "widen", &[Value::from(1i8)])
        .unwrap_err();
    assert!(matches!(err, AccessorError::Configuration(_)));
}

// ============================================================================
// Invocation
// ============================================================================

#[test]
fn test_instance_method_by_type_name_is_misuse() {
    let accessor = accessor();
    let err = accessor.invoke("tick.Counter", "increment", &[]).unwrap_err();
    match err {
        AccessorError::Misuse(message) => {
            assert_eq!(message, "Method tick.Counter.increment() is not static")
        }
        other => panic!("expected misuse, got {:?}", other),
    }
    assert!(accessor.listener().events().is_empty());
}

#[test]
fn test_static_method_through_instance() {
    let accessor = accessor();
    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();

    let via_instance = accessor
        .invoke(&counter, "describe", &[Value::from("x")])
        .unwrap();
    let via_type = accessor
        .invoke("tick.Counter", "describe", &[Value::from("x")])
        .unwrap();
    assert_eq!(via_instance, via_type);

    let events = accessor.listener().events();
    assert_eq!(
        events[1..],
        [
            Event::InstanceMethod(counter, "describe".to_string(), vec![Value::from("x")]),
            Event::StaticMethod(
                "tick.Counter".to_string(),
                "describe".to_string(),
                vec![Value::from("x")]
            ),
        ]
    );
}

#[test]
fn test_overriding_method_wins() {
    let accessor = accessor();
    let circle = accessor.construct(None, "tick.Circle", &[Value::double(2.0)]).unwrap();
    let shape = accessor.construct(None, "tick.Shape", &[]).unwrap();

    assert_eq!(accessor.invoke(&circle, "area", &[]).unwrap(), Value::double(12.0));
    assert_eq!(accessor.invoke(&shape, "area", &[]).unwrap(), Value::double(0.0));
    assert_eq!(accessor.invoke(&circle, "name", &[]).unwrap(), Value::from("circle"));
    assert_eq!(accessor.invoke("tick.Circle", "unit", &[]).unwrap(), Value::double(1.0));
}

#[test]
fn test_unknown_method() {
    let accessor = accessor();
    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();
    let err = accessor.invoke(&counter, "reset", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::NotFound(_)));

    let err = accessor.invoke(&counter, "add", &[]).unwrap_err();
    match err {
        AccessorError::NoMatch(message) => assert!(message.contains("add(int)")),
        other => panic!("expected no match, got {:?}", other),
    }
}

#[test]
fn test_target_failure_keeps_identity() {
    let accessor = accessor();

    let err = accessor
        .invoke("tick.Program", "divide", &[Value::from(1), Value::from(0)])
        .unwrap_err();
    let throwable = err.target().unwrap();
    assert_eq!(throwable.kind(), "ArithmeticException");
    assert_eq!(throwable.message(), Some("/ by zero"));
    assert!(!err.is_operational());

    let err = accessor
        .construct(None, "tick.Counter", &[Value::from("forty")])
        .unwrap_err();
    assert_eq!(err.target_kind(), Some("NumberFormatException"));

    let circle = accessor.construct(None, "tick.Circle", &[Value::double(-1.0)]).unwrap();
    let err = accessor.get_field(&circle, "diameter").unwrap_err();
    assert_eq!(err.target_kind(), Some("IllegalStateException"));
}

#[test]
fn test_panic_becomes_target_failure() {
    let accessor = accessor();
    let err = accessor.invoke("tick.Program", "boom", &[]).unwrap_err();
    let throwable = err.target().unwrap();
    assert_eq!(throwable.kind(), PANIC_KIND);
    assert_eq!(throwable.message(), Some("student code panicked"));
}

#[test]
#[should_panic(expected = "student code panicked")]
fn test_panic_propagates_when_not_caught() {
    let config = AccessorConfig {
        catch_panics: false,
        ..AccessorConfig::default()
    };
    let accessor = accessor().with_config(config);
    let _ = accessor.invoke("tick.Program", "boom", &[]);
}

#[test]
fn test_invoke_main() {
    let fixture = fixture();
    let accessor = Accessor::new(fixture.registry.clone());

    accessor.invoke_main(".*Program", &["a", "b"]).unwrap();
    assert_eq!(fixture.main_args.get(), Value::int(2));

    accessor.invoke_main::<&str>("tick.Program", &[]).unwrap();
    assert_eq!(fixture.main_args.get(), Value::int(0));

    let err = accessor.invoke_main::<&str>("tick.Counter", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::NotFound(_)));
}

#[test]
fn test_invoke_catch() {
    let accessor = accessor();
    assert_eq!(
        accessor
            .invoke_catch("tick.Program", "divide", &[Value::from(1), Value::from(0)])
            .unwrap(),
        Some("ArithmeticException".to_string())
    );
    assert_eq!(
        accessor
            .invoke_catch("tick.Program", "divide", &[Value::from(4), Value::from(2)])
            .unwrap(),
        None
    );
    assert!(accessor.invoke_catch("tick.Program", "missing", &[]).is_err());
}

// ============================================================================
// Fields
// ============================================================================

#[test]
fn test_get_instance_and_static_fields() {
    let accessor = accessor();
    let counter = accessor.construct(Some("c"), "tick.Counter", &[Value::from(5)]).unwrap();
    accessor.invoke(&counter, "increment", &[]).unwrap();

    assert_eq!(accessor.get_field(&counter, "value").unwrap(), Value::int(6));
    assert_eq!(accessor.get_field("tick.Counter", "LIMIT").unwrap(), Value::int(100));
    assert_eq!(accessor.get_field(&counter, "LIMIT").unwrap(), Value::int(100));
    assert_eq!(accessor.get_field(Target::Type(".*Circle"), "SIDES").unwrap(), Value::int(0));

    let events = accessor.listener().events();
    assert_eq!(
        events[3..],
        [
            Event::InstanceField(counter.clone(), "value".to_string()),
            Event::StaticField("tick.Counter".to_string(), "LIMIT".to_string()),
            Event::InstanceField(counter, "LIMIT".to_string()),
            Event::StaticField("tick.Circle".to_string(), "SIDES".to_string()),
        ]
    );
}

#[test]
fn test_inherited_and_computed_fields() {
    let accessor = accessor();
    let circle = accessor.construct(None, "tick.Circle", &[Value::double(1.5)]).unwrap();
    assert_eq!(accessor.get_field(&circle, "label").unwrap(), Value::from("circle"));
    assert_eq!(accessor.get_field(&circle, "diameter").unwrap(), Value::double(3.0));
}

#[test]
fn test_instance_field_by_type_name_is_misuse() {
    let accessor = accessor();
    let err = accessor.get_field("tick.Counter", "value").unwrap_err();
    assert!(matches!(err, AccessorError::Misuse(_)));
}

#[test]
fn test_missing_field() {
    let accessor = accessor();
    let counter = accessor.construct(None, "tick.Counter", &[Value::from(1)]).unwrap();
    let err = accessor.get_field(&counter, "count").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not found: Field count not found in type tick.Counter"
    );
}

#[test]
fn test_instance_of_unregistered_type() {
    let accessor = Accessor::new(Arc::new(ClassRegistry::new()));
    let stray = accessor_sdk::ObjectRef::allocate("gone.Type", Vec::new());
    let err = accessor.invoke(&stray, "run", &[]).unwrap_err();
    assert!(matches!(err, AccessorError::NotFound(_)));
}
