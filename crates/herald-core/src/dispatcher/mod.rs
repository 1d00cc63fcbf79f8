//! # Herald Dispatchers
//!
//! [`EventDispatcher`] is the registration/dispatch contract shared by the
//! base [`Dispatcher`] and the [`ServiceResolvingDispatcher`] variant.
//!
//! Dispatch is synchronous: every listener runs on the caller's thread, in
//! ascending priority order, until the event's propagation flag is set or a
//! listener returns an error. Registrations are expected to finish before
//! dispatching starts; a dispatcher shared between threads goes through
//! [`SharedDispatcher`].
pub mod service;
pub mod shared;

use std::fmt;

use crate::constants::DEFAULT_PRIORITY;
use crate::error::{DispatcherError, Result};
use crate::event::Event;
use crate::listener::{ClassRegistry, ListenerReference, ListenerSpec};
use crate::registry::{ListenerRegistry, Priority};

pub use service::{ServiceContainer, ServiceResolvingDispatcher};
pub use shared::SharedDispatcher;

/// Registration and dispatch operations common to all dispatcher variants
pub trait EventDispatcher {
    /// Validate `listener` and store it for `event_name` at `priority`.
    ///
    /// Fails with `InvalidPriority` for negative priorities and with a
    /// listener error when the reference cannot be resolved.
    fn register_listener<L: Into<ListenerSpec>>(
        &mut self,
        event_name: &str,
        listener: L,
        priority: i64,
    ) -> Result<()>;

    /// Register at the default priority
    fn listen<L: Into<ListenerSpec>>(&mut self, event_name: &str, listener: L) -> Result<()> {
        self.register_listener(event_name, listener, DEFAULT_PRIORITY)
    }

    /// Run the listeners registered for `event.name()` until propagation stops
    fn dispatch(&self, event: &mut Event) -> Result<()> {
        let listeners = self.get_listeners(event.name());
        self.execute_listeners(&listeners, event)
    }

    /// Run an explicit listener chain against `event`
    fn execute_listeners(&self, listeners: &[&ListenerReference], event: &mut Event) -> Result<()>;

    fn get_listeners(&self, event_name: &str) -> Vec<&ListenerReference>;

    fn has_listeners(&self, event_name: &str) -> bool;
}

/// Base dispatcher resolving inline, bound-object and class listeners
#[derive(Default)]
pub struct Dispatcher {
    registry: ListenerRegistry,
    classes: ClassRegistry,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("classes", &self.classes)
            .finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher that can instantiate the given classes
    pub fn with_classes(classes: ClassRegistry) -> Self {
        Self { registry: ListenerRegistry::new(), classes }
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub(crate) fn register_with(
        &mut self,
        event_name: &str,
        listener: ListenerSpec,
        priority: i64,
        services: Option<&dyn ServiceContainer>,
    ) -> Result<()> {
        let priority = Priority::try_from(priority)?;
        if event_name.is_empty() {
            return Err(DispatcherError::EmptyEventName);
        }

        let reference = ListenerReference::resolve(listener, &self.classes, services)?;
        log::debug!(
            "Registered {:?} listener {} for '{}' at priority {}",
            reference.kind(),
            reference.describe(),
            event_name,
            priority
        );
        self.registry.register(event_name, reference, priority);
        Ok(())
    }

    pub(crate) fn execute_with(
        &self,
        listeners: &[&ListenerReference],
        event: &mut Event,
        services: Option<&dyn ServiceContainer>,
    ) -> Result<()> {
        for (position, listener) in listeners.iter().enumerate() {
            if event.is_propagation_stopped() {
                log::debug!(
                    "Propagation of '{}' stopped; skipping {} remaining listener(s)",
                    event.name(),
                    listeners.len() - position
                );
                break;
            }
            invoke(listener, event, services)?;
        }
        Ok(())
    }
}

impl EventDispatcher for Dispatcher {
    fn register_listener<L: Into<ListenerSpec>>(
        &mut self,
        event_name: &str,
        listener: L,
        priority: i64,
    ) -> Result<()> {
        self.register_with(event_name, listener.into(), priority, None)
    }

    fn execute_listeners(&self, listeners: &[&ListenerReference], event: &mut Event) -> Result<()> {
        self.execute_with(listeners, event, None)
    }

    fn get_listeners(&self, event_name: &str) -> Vec<&ListenerReference> {
        self.registry.get(event_name)
    }

    fn has_listeners(&self, event_name: &str) -> bool {
        self.registry.has(event_name)
    }
}

/// Call one resolved listener.
///
/// Service listeners need `services`; the base dispatcher passes `None`.
fn invoke(
    reference: &ListenerReference,
    event: &mut Event,
    services: Option<&dyn ServiceContainer>,
) -> Result<()> {
    log::trace!("Invoking {} for '{}'", reference.describe(), event.name());

    let outcome = match reference {
        ListenerReference::Inline(listener) => listener(event),
        ListenerReference::BoundMethod { object, method } => object.invoke(method, event),
        ListenerReference::ClassMethod { factory, method, .. } => factory().invoke(method, event),
        ListenerReference::ServiceMethod { service_id, method } => {
            let container = services.ok_or_else(|| {
                DispatcherError::invalid_target(
                    service_id.as_str(),
                    method.as_str(),
                    "service listeners require a service-resolving dispatcher",
                )
            })?;
            let service = container.get(service_id).map_err(|source| {
                let error = DispatcherError::ServiceResolutionFailed {
                    service_id: service_id.clone(),
                    source,
                };
                log::warn!("[{}] {}", error.as_label(), error);
                error
            })?;
            if !service.has_method(method) {
                return Err(DispatcherError::invalid_target(
                    service_id.as_str(),
                    method.as_str(),
                    "method does not exist on the resolved service",
                ));
            }
            service.invoke(method, event)
        }
    };

    outcome.map_err(|source| {
        let error = DispatcherError::ListenerFailed {
            event: event.name().to_string(),
            listener: reference.describe(),
            source,
        };
        log::warn!("[{}] {}", error.as_label(), error);
        error
    })
}
