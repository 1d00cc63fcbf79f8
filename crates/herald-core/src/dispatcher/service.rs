use std::fmt;
use std::sync::Arc;

use crate::container::ServiceRegistry;
use crate::dispatcher::{Dispatcher, EventDispatcher};
use crate::error::{BoxError, Result};
use crate::event::Event;
use crate::listener::{ClassRegistry, ListenerReference, ListenerSpec, Subscriber};

/// External registry the service-resolving dispatcher looks services up in.
///
/// Only these two operations are ever used; the dispatcher never owns or
/// manages the lifecycle of the container or of the services it returns.
pub trait ServiceContainer: Send + Sync {
    /// Whether `id` is a known service
    fn has(&self, id: &str) -> bool;

    /// Resolve `id` to a service instance; may construct or cache it
    fn get(&self, id: &str) -> std::result::Result<Arc<dyn Subscriber>, BoxError>;
}

/// Dispatcher that treats names which are not known classes as service ids.
///
/// Service ids are checked against the container at registration time, but
/// the service is only resolved, and its method only checked, when the
/// listener is invoked.
pub struct ServiceResolvingDispatcher {
    inner: Dispatcher,
    container: Arc<dyn ServiceContainer>,
}

impl fmt::Debug for ServiceResolvingDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceResolvingDispatcher")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl ServiceResolvingDispatcher {
    pub fn new(container: Arc<dyn ServiceContainer>) -> Self {
        Self { inner: Dispatcher::new(), container }
    }

    pub fn with_classes(classes: ClassRegistry, container: Arc<dyn ServiceContainer>) -> Self {
        Self { inner: Dispatcher::with_classes(classes), container }
    }

    /// Replace the container used for later registrations and dispatches
    pub fn set_container(&mut self, container: Arc<dyn ServiceContainer>) {
        self.container = container;
    }

    pub fn container(&self) -> &Arc<dyn ServiceContainer> {
        &self.container
    }

    pub fn classes(&self) -> &ClassRegistry {
        self.inner.classes()
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        self.inner.classes_mut()
    }
}

/// Backed by an empty [`ServiceRegistry`]; install a real container with
/// [`set_container`](ServiceResolvingDispatcher::set_container).
impl Default for ServiceResolvingDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(ServiceRegistry::new()))
    }
}

impl EventDispatcher for ServiceResolvingDispatcher {
    fn register_listener<L: Into<ListenerSpec>>(
        &mut self,
        event_name: &str,
        listener: L,
        priority: i64,
    ) -> Result<()> {
        self.inner
            .register_with(event_name, listener.into(), priority, Some(self.container.as_ref()))
    }

    fn execute_listeners(&self, listeners: &[&ListenerReference], event: &mut Event) -> Result<()> {
        self.inner
            .execute_with(listeners, event, Some(self.container.as_ref()))
    }

    fn get_listeners(&self, event_name: &str) -> Vec<&ListenerReference> {
        self.inner.get_listeners(event_name)
    }

    fn has_listeners(&self, event_name: &str) -> bool {
        self.inner.has_listeners(event_name)
    }
}
