//! # Herald Service Registry
//!
//! [`ServiceRegistry`] is a small in-memory [`ServiceContainer`] keyed by
//! string ids. Services are registered either as ready instances or as
//! factories that are run on first lookup and cached afterwards, so a
//! service-resolving dispatcher can validate ids without building anything.
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::dispatcher::ServiceContainer;
use crate::error::BoxError;
use crate::listener::Subscriber;

type ServiceFactory = Box<dyn Fn() -> Result<Arc<dyn Subscriber>, BoxError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Service '{service_id}' is not registered")]
    ServiceNotFound { service_id: String },

    #[error("Failed to construct service '{service_id}': {source}")]
    ConstructionFailed {
        service_id: String,
        #[source]
        source: BoxError,
    },

    #[error("Service cache lock was poisoned")]
    Poisoned,
}

/// In-memory service container with eager instances and lazy, cached factories
#[derive(Default)]
pub struct ServiceRegistry {
    instances: HashMap<String, Arc<dyn Subscriber>>,
    factories: HashMap<String, ServiceFactory>,
    // Instances built from factories, filled on first lookup
    built: Mutex<HashMap<String, Arc<dyn Subscriber>>>,
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("service_ids", &self.service_ids())
            .finish()
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready-made service instance under `id`
    pub fn register_instance<V>(&mut self, id: impl Into<String>, instance: Arc<V>) -> &mut Self
    where
        V: Subscriber + 'static,
    {
        let id = id.into();
        self.forget(&id);
        self.instances.insert(id, instance);
        self
    }

    /// Register a factory run on the first lookup of `id`; its result is cached
    pub fn register_factory<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn Subscriber>, BoxError> + Send + Sync + 'static,
    {
        let id = id.into();
        self.forget(&id);
        self.factories.insert(id, Box::new(factory));
        self
    }

    // Drop every registration and cached build for `id`
    fn forget(&mut self, id: &str) {
        self.instances.remove(id);
        self.factories.remove(id);
        // A cache entry is always safe to drop, even behind a poisoned lock
        self.built
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id) || self.factories.contains_key(id)
    }

    /// Look up a service, building and caching it if it was registered as a factory
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Subscriber>, ContainerError> {
        if let Some(instance) = self.instances.get(id) {
            return Ok(Arc::clone(instance));
        }

        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ContainerError::ServiceNotFound { service_id: id.to_string() })?;

        if let Some(instance) = self.built.lock().map_err(|_| ContainerError::Poisoned)?.get(id) {
            return Ok(Arc::clone(instance));
        }

        // Built outside the lock so a factory may look up other services
        let instance = factory().map_err(|source| ContainerError::ConstructionFailed {
            service_id: id.to_string(),
            source,
        })?;
        log::debug!("Constructed service '{}'", id);

        let mut built = self.built.lock().map_err(|_| ContainerError::Poisoned)?;
        Ok(Arc::clone(built.entry(id.to_string()).or_insert(instance)))
    }

    /// Whether a factory-backed service has been built yet
    pub fn is_built(&self, id: &str) -> bool {
        self.instances.contains_key(id)
            || self.built.lock().map(|built| built.contains_key(id)).unwrap_or(false)
    }

    /// All registered ids, sorted
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .instances
            .keys()
            .chain(self.factories.keys())
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl ServiceContainer for ServiceRegistry {
    fn has(&self, id: &str) -> bool {
        self.contains(id)
    }

    fn get(&self, id: &str) -> Result<Arc<dyn Subscriber>, BoxError> {
        self.resolve(id).map_err(Into::into)
    }
}
