use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ListenerResult;
use crate::event::Event;

/// An object exposing named listener methods.
///
/// This is the invocation contract for bound objects, class instances and
/// services alike: the dispatcher only ever asks which methods exist and
/// calls one of them by name.
pub trait Subscriber: Send + Sync {
    /// Names of the methods that can be bound as listeners
    fn methods(&self) -> &[&'static str];

    fn has_method(&self, method: &str) -> bool {
        self.methods().iter().any(|m| *m == method)
    }

    /// Call `method` with the event being dispatched
    fn invoke(&self, method: &str, event: &mut Event) -> ListenerResult;

    /// Human readable name used in log lines and errors
    fn subscriber_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// A subscriber type known by name and default-constructed on demand.
///
/// `METHODS` lets a listener be validated against the class without
/// constructing an instance.
pub trait SubscriberClass: Subscriber + Default + 'static {
    const CLASS_NAME: &'static str;
    const METHODS: &'static [&'static str];
}

/// Builds a fresh subscriber instance for every call
pub type ClassFactory = Arc<dyn Fn() -> Box<dyn Subscriber> + Send + Sync>;

#[derive(Clone)]
struct ClassEntry {
    methods: &'static [&'static str],
    factory: ClassFactory,
}

/// Catalog of subscriber classes a dispatcher can instantiate by name
#[derive(Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassEntry>,
}

// Manual Debug implementation, factories are opaque
impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.classes.keys().collect();
        names.sort();
        f.debug_struct("ClassRegistry").field("classes", &names).finish()
    }
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self { classes: HashMap::new() }
    }

    /// Register a class under its `CLASS_NAME`
    pub fn register<T: SubscriberClass>(&mut self) -> &mut Self {
        self.register_factory(T::CLASS_NAME, T::METHODS, || {
            Box::new(T::default()) as Box<dyn Subscriber>
        })
    }

    /// Register a class from an explicit method list and constructor
    pub fn register_factory<F>(
        &mut self,
        name: impl Into<String>,
        methods: &'static [&'static str],
        factory: F,
    ) -> &mut Self
    where
        F: Fn() -> Box<dyn Subscriber> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.classes.contains_key(&name) {
            log::warn!("Class '{}' registered twice; the later registration wins", name);
        }
        self.classes.insert(name, ClassEntry { methods, factory: Arc::new(factory) });
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Check a method against the class's declared method list
    pub fn class_has_method(&self, name: &str, method: &str) -> bool {
        self.classes
            .get(name)
            .is_some_and(|entry| entry.methods.iter().any(|m| *m == method))
    }

    pub fn factory(&self, name: &str) -> Option<ClassFactory> {
        self.classes.get(name).map(|entry| entry.factory.clone())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
