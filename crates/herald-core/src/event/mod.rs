//! # Herald Events
//!
//! [`Event`] is the value handed to every listener during a dispatch pass:
//! an immutable name, a mutable bag of parameters and a one-way
//! propagation-stop flag.
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DispatcherError, Result};

/// Shared, type-erased event parameter.
///
/// Parameters are stored behind an `Arc` so that the value read back is the
/// very value that was stored.
pub type ParameterValue = Arc<dyn Any + Send + Sync>;

/// Named event carrying parameters between listeners
pub struct Event {
    name: String,
    parameters: HashMap<String, ParameterValue>,
    propagation_stopped: bool,
}

// Manual Debug implementation, parameter values are opaque
impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.parameters.keys().collect();
        names.sort();
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("parameters", &names)
            .field("propagation_stopped", &self.propagation_stopped)
            .finish()
    }
}

impl Event {
    /// Create an event without parameters
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_parameters(name, HashMap::new())
    }

    /// Create an event with an initial parameter set
    pub fn with_parameters(
        name: impl Into<String>,
        parameters: HashMap<String, ParameterValue>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DispatcherError::EmptyEventName);
        }
        Ok(Self {
            name,
            parameters,
            propagation_stopped: false,
        })
    }

    /// Builder-style parameter setter
    pub fn with_parameter<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.set_parameter(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops the event's propagation; no further listener will receive it.
    ///
    /// Once stopped, an event stays stopped.
    pub fn stop_propagation(&mut self) -> &mut Self {
        self.propagation_stopped = true;
        self
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Get a previously set parameter
    pub fn parameter(&self, name: &str) -> Result<&ParameterValue> {
        self.parameters
            .get(name)
            .ok_or_else(|| DispatcherError::ParameterNotFound { name: name.to_string() })
    }

    /// Get a previously set parameter downcast to `T`
    pub fn parameter_as<T: Any>(&self, name: &str) -> Result<&T> {
        self.parameter(name)?
            .downcast_ref::<T>()
            .ok_or_else(|| DispatcherError::ParameterTypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Store a value, overwriting any previous value under the same name
    pub fn set_parameter<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.parameters.insert(name.into(), Arc::new(value));
    }

    /// Store an already shared value without re-wrapping it
    pub fn set_shared_parameter(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.parameters.insert(name.into(), value);
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Names of all parameters currently set, in no particular order
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }
}
