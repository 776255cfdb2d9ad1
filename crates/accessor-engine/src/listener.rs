//! Action listener protocol
//!
//! The accessor reports every reflective action to a listener before
//! dispatching it, so a grading run can show the student what the harness
//! is doing to their code. Names passed to the listener are already
//! resolved.

use accessor_sdk::{ObjectRef, Value};

/// Observer notified of every reflective action
pub trait ActionListener {
    /// A constructor of `type_name` is about to run with `args`
    fn constructing_class(&self, type_name: &str, args: &[Value]);

    /// A freshly constructed object was bound to a symbolic name
    fn created_object(&self, instance_name: &str, instance: &ObjectRef);

    /// A field is about to be read through a type name
    fn getting_static_field(&self, type_name: &str, field_name: &str);

    /// A field is about to be read through an instance
    fn getting_instance_field(&self, instance: &ObjectRef, field_name: &str);

    /// A method is about to be invoked through a type name
    fn invoking_static_method(&self, type_name: &str, method_name: &str, args: &[Value]);

    /// A method is about to be invoked through an instance
    fn invoking_instance_method(&self, instance: &ObjectRef, method_name: &str, args: &[Value]);
}

/// Listener that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ActionListener for NoopListener {
    fn constructing_class(&self, _type_name: &str, _args: &[Value]) {}

    fn created_object(&self, _instance_name: &str, _instance: &ObjectRef) {}

    fn getting_static_field(&self, _type_name: &str, _field_name: &str) {}

    fn getting_instance_field(&self, _instance: &ObjectRef, _field_name: &str) {}

    fn invoking_static_method(&self, _type_name: &str, _method_name: &str, _args: &[Value]) {}

    fn invoking_instance_method(&self, _instance: &ObjectRef, _method_name: &str, _args: &[Value]) {
    }
}

impl<L: ActionListener + ?Sized> ActionListener for Box<L> {
    fn constructing_class(&self, type_name: &str, args: &[Value]) {
        (**self).constructing_class(type_name, args)
    }

    fn created_object(&self, instance_name: &str, instance: &ObjectRef) {
        (**self).created_object(instance_name, instance)
    }

    fn getting_static_field(&self, type_name: &str, field_name: &str) {
        (**self).getting_static_field(type_name, field_name)
    }

    fn getting_instance_field(&self, instance: &ObjectRef, field_name: &str) {
        (**self).getting_instance_field(instance, field_name)
    }

    fn invoking_static_method(&self, type_name: &str, method_name: &str, args: &[Value]) {
        (**self).invoking_static_method(type_name, method_name, args)
    }

    fn invoking_instance_method(&self, instance: &ObjectRef, method_name: &str, args: &[Value]) {
        (**self).invoking_instance_method(instance, method_name, args)
    }
}

impl<L: ActionListener + ?Sized> ActionListener for &L {
    fn constructing_class(&self, type_name: &str, args: &[Value]) {
        (**self).constructing_class(type_name, args)
    }

    fn created_object(&self, instance_name: &str, instance: &ObjectRef) {
        (**self).created_object(instance_name, instance)
    }

    fn getting_static_field(&self, type_name: &str, field_name: &str) {
        (**self).getting_static_field(type_name, field_name)
    }

    fn getting_instance_field(&self, instance: &ObjectRef, field_name: &str) {
        (**self).getting_instance_field(instance, field_name)
    }

    fn invoking_static_method(&self, type_name: &str, method_name: &str, args: &[Value]) {
        (**self).invoking_static_method(type_name, method_name, args)
    }

    fn invoking_instance_method(&self, instance: &ObjectRef, method_name: &str, args: &[Value]) {
        (**self).invoking_instance_method(instance, method_name, args)
    }
}
