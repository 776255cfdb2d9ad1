//! The accessor facade
//!
//! Every operation follows the same pipeline: resolve the target type,
//! gather candidate members along its ancestor chain, select the first
//! compatible one, notify the listener, then dispatch into the native body.
//! Failures raised by a body come back as [`AccessorError::TargetFailure`]
//! carrying the body's own [`Throwable`]; every other error is the harness's.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use accessor_sdk::{
    AccessorError, AccessorResult, FieldDescriptor, FieldStorage, Invocable, MethodBody,
    MethodDescriptor, ObjectRef, Throwable, TypeDescriptor, TypeRegistry, Value,
};
use tracing::debug;

use crate::config::AccessorConfig;
use crate::hierarchy::TypeHierarchy;
use crate::listener::{ActionListener, NoopListener};
use crate::matcher::{describe_args, OverloadMatcher};
use crate::resolver::NameResolver;

/// Failure kind reported for a panic inside a native body
pub const PANIC_KIND: &str = "Panic";

/// What a field read or method call is aimed at
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A type name or pattern; only static members are reachable
    Type(&'a str),
    /// An object; its runtime type is searched
    Instance(&'a ObjectRef),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(pattern: &'a str) -> Self {
        Target::Type(pattern)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(pattern: &'a String) -> Self {
        Target::Type(pattern)
    }
}

impl<'a> From<&'a ObjectRef> for Target<'a> {
    fn from(instance: &'a ObjectRef) -> Self {
        Target::Instance(instance)
    }
}

/// Reflective access to registered types
pub struct Accessor<L: ActionListener = NoopListener> {
    registry: Arc<dyn TypeRegistry>,
    listener: L,
    config: AccessorConfig,
}

impl Accessor<NoopListener> {
    /// Create an accessor that reports to no one
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self::with_listener(registry, NoopListener)
    }
}

impl Accessor<Box<dyn ActionListener>> {
    /// Create an accessor with the listener chosen by `config`
    pub fn configured(registry: Arc<dyn TypeRegistry>, config: AccessorConfig) -> Self {
        let listener = config.build_listener();
        Self::with_listener(registry, listener).with_config(config)
    }
}

impl<L: ActionListener> Accessor<L> {
    /// Create an accessor that reports to `listener`
    pub fn with_listener(registry: Arc<dyn TypeRegistry>, listener: L) -> Self {
        Self {
            registry,
            listener,
            config: AccessorConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: AccessorConfig) -> Self {
        self.config = config;
        self
    }

    /// The listener
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Consume the accessor, returning its listener
    pub fn into_listener(self) -> L {
        self.listener
    }

    /// The configuration in effect
    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(&*self.registry).with_scan_prefix(self.config.scan_prefix.as_deref())
    }

    fn hierarchy(&self) -> TypeHierarchy<'_> {
        TypeHierarchy::new(&*self.registry)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a type name pattern without loading it.
    ///
    /// Returns the pattern itself when nothing matches.
    pub fn resolve_type_name(&self, pattern: &str) -> AccessorResult<String> {
        self.resolver().resolve(pattern)
    }

    /// Resolve a type name pattern and load the type it names
    pub fn load_type(&self, pattern: &str) -> AccessorResult<Arc<TypeDescriptor>> {
        self.resolver().load(pattern)
    }

    fn instance_type(&self, instance: &ObjectRef) -> AccessorResult<Arc<TypeDescriptor>> {
        self.registry.load_type(instance.type_name()).ok_or_else(|| {
            AccessorError::NotFound(format!(
                "Type {} of instance is not loadable",
                instance.type_name()
            ))
        })
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Construct an instance of the type matching `pattern`.
    ///
    /// Only constructors declared on the type itself are candidates. If
    /// `instance_name` is given, the listener is told to refer to the new
    /// object by that name.
    pub fn construct(
        &self,
        instance_name: Option<&str>,
        pattern: &str,
        args: &[Value],
    ) -> AccessorResult<ObjectRef> {
        let desc = self.load_type(pattern)?;
        let matcher = OverloadMatcher::new(self.hierarchy());
        let constructor = matcher
            .select(desc.constructors(), None, args)?
            .ok_or_else(|| {
                AccessorError::NoMatch(format!(
                    "Constructor {}({}) not found; candidates: [{}]",
                    desc.name(),
                    describe_args(args),
                    signatures(desc.constructors().iter())
                ))
            })?;

        let instance = self.registry.instantiate(desc.name())?;
        self.listener.constructing_class(desc.name(), args);
        debug!(constructor = %constructor.signature(), "constructing");
        self.run(|| (constructor.body())(&instance, args))?;

        if let Some(name) = instance_name {
            self.listener.created_object(name, &instance);
        }
        Ok(instance)
    }

    /// Read a field, searching the target's ancestor chain.
    ///
    /// Through a type name only static fields are readable; through an
    /// instance both static and instance fields are.
    pub fn get_field<'t>(
        &self,
        target: impl Into<Target<'t>>,
        field_name: &str,
    ) -> AccessorResult<Value> {
        match target.into() {
            Target::Type(pattern) => {
                let desc = self.load_type(pattern)?;
                let field = self.require_field(&desc, field_name)?;
                if !field.is_static() {
                    return Err(AccessorError::Misuse(format!(
                        "Field {}.{} is not static",
                        desc.name(),
                        field_name
                    )));
                }
                self.listener.getting_static_field(desc.name(), field_name);
                self.read_field(&field, None)
            }
            Target::Instance(instance) => {
                let desc = self.instance_type(instance)?;
                let field = self.require_field(&desc, field_name)?;
                self.listener.getting_instance_field(instance, field_name);
                self.read_field(&field, Some(instance))
            }
        }
    }

    /// Invoke a method, searching the target's ancestor chain.
    ///
    /// The first method with this name whose parameters accept `args` is
    /// selected. Through a type name it must be static; a static method
    /// reached through an instance runs without a receiver.
    pub fn invoke<'t>(
        &self,
        target: impl Into<Target<'t>>,
        method_name: &str,
        args: &[Value],
    ) -> AccessorResult<Value> {
        let target = target.into();
        let (desc, receiver) = match target {
            Target::Type(pattern) => (self.load_type(pattern)?, None),
            Target::Instance(instance) => (self.instance_type(instance)?, Some(instance)),
        };

        let methods = self.hierarchy().gather_methods(&desc)?;
        let matcher = OverloadMatcher::new(self.hierarchy());
        let method = match matcher.select(&methods, Some(method_name), args)? {
            Some(method) => method,
            None => return Err(no_method(&desc, &methods, method_name, receiver.is_some(), args)),
        };

        let call: Box<dyn FnOnce() -> Result<Value, Throwable> + '_> =
            match (method.body(), receiver) {
                (MethodBody::Static(body), _) => Box::new(move || body(args)),
                (MethodBody::Instance(body), Some(instance)) => {
                    Box::new(move || body(instance, args))
                }
                (MethodBody::Instance(_), None) => {
                    return Err(AccessorError::Misuse(format!(
                        "Method {}.{} is not static",
                        desc.name(),
                        method.signature()
                    )))
                }
            };

        match receiver {
            Some(instance) => self
                .listener
                .invoking_instance_method(instance, method_name, args),
            None => self
                .listener
                .invoking_static_method(desc.name(), method_name, args),
        }
        debug!(
            type_name = desc.name(),
            method = %method.signature(),
            is_static = method.is_static(),
            "invoking"
        );

        self.run(call)
    }

    /// Invoke the static `main(String[])` of the type matching `pattern`
    pub fn invoke_main<S: AsRef<str>>(&self, pattern: &str, args: &[S]) -> AccessorResult<Value> {
        let argv = Value::string_array(args);
        self.invoke(Target::Type(pattern), "main", &[argv])
    }

    /// Invoke a static method and report the kind of failure it raised.
    ///
    /// Returns `None` if the method returned normally. Harness errors are
    /// still returned as errors.
    pub fn invoke_catch(
        &self,
        pattern: &str,
        method_name: &str,
        args: &[Value],
    ) -> AccessorResult<Option<String>> {
        match self.invoke(Target::Type(pattern), method_name, args) {
            Ok(_) => Ok(None),
            Err(AccessorError::TargetFailure(throwable)) => Ok(Some(throwable.kind().to_string())),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn require_field(
        &self,
        desc: &Arc<TypeDescriptor>,
        field_name: &str,
    ) -> AccessorResult<FieldDescriptor> {
        self.hierarchy()
            .find_field(desc, field_name)?
            .ok_or_else(|| {
                AccessorError::NotFound(format!(
                    "Field {} not found in type {}",
                    field_name,
                    desc.name()
                ))
            })
    }

    fn read_field(
        &self,
        field: &FieldDescriptor,
        instance: Option<&ObjectRef>,
    ) -> AccessorResult<Value> {
        match field.storage() {
            FieldStorage::Static(slot) => Ok(slot.get()),
            FieldStorage::Computed { getter, .. } => self.run(|| getter(instance)),
            FieldStorage::Instance => match instance {
                Some(this) => this.get_field(field.name()).ok_or_else(|| {
                    AccessorError::TargetFailure(Throwable::new(
                        "NoSuchFieldError",
                        format!("{}.{}", this.type_name(), field.name()),
                    ))
                }),
                None => Err(AccessorError::Misuse(format!(
                    "Field {} is not static",
                    field.name()
                ))),
            },
        }
    }

    /// Run a native body, turning its failure (or panic) into a target failure
    fn run<T>(&self, body: impl FnOnce() -> Result<T, Throwable>) -> AccessorResult<T> {
        let outcome = if self.config.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(body))
                .unwrap_or_else(|payload| Err(Throwable::new(PANIC_KIND, panic_message(&*payload))))
        } else {
            body()
        };

        outcome.map_err(|throwable| {
            debug!(kind = throwable.kind(), "target code raised a failure");
            AccessorError::TargetFailure(throwable)
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn signatures<'m, M: Invocable + 'm>(members: impl Iterator<Item = &'m M>) -> String {
    members
        .map(|m| m.signature().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn no_method(
    desc: &TypeDescriptor,
    methods: &[MethodDescriptor],
    method_name: &str,
    has_instance: bool,
    args: &[Value],
) -> AccessorError {
    let form = if has_instance { "Instance" } else { "Static" };
    let named: Vec<_> = methods.iter().filter(|m| m.name() == method_name).collect();
    if named.is_empty() {
        return AccessorError::NotFound(format!(
            "{} method {} not found in type {}",
            form,
            method_name,
            desc.name()
        ));
    }
    AccessorError::NoMatch(format!(
        "{} method {}({}) not found in type {}; candidates: [{}]",
        form,
        method_name,
        describe_args(args),
        desc.name(),
        signatures(named.into_iter())
    ))
}
