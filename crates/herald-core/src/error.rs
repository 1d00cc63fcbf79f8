//! # Herald Dispatcher Errors
//!
//! Defines [`DispatcherError`], the error type for every contract violation
//! the dispatcher can signal: malformed or unresolvable listener references,
//! invalid priorities, missing event parameters and failures raised while a
//! dispatch pass is running.
use std::result::Result as StdResult;

use thiserror::Error;

/// Boxed error returned by listener bodies and service containers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type of every listener invocation
pub type ListenerResult = StdResult<(), BoxError>;

#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error("Invalid listener '{listener}': expected a target and a method joined with '::'")]
    InvalidListenerFormat { listener: String },

    #[error("Invalid listener target '{target}::{method}': {reason}")]
    InvalidListenerTarget {
        target: String,
        method: String,
        reason: String,
    },

    #[error("Given service id does not exist: {service_id}")]
    UnknownServiceIdentifier { service_id: String },

    #[error("The priority provided must be a non-negative integer, got '{value}'")]
    InvalidPriority { value: String },

    #[error("Parameter '{name}' has not been set in this event")]
    ParameterNotFound { name: String },

    #[error("Parameter '{name}' is not of the requested type {expected}")]
    ParameterTypeMismatch { name: String, expected: &'static str },

    #[error("Event name must not be empty")]
    EmptyEventName,

    #[error("Failed to resolve service '{service_id}': {source}")]
    ServiceResolutionFailed {
        service_id: String,
        #[source]
        source: BoxError,
    },

    #[error("Listener {listener} failed while handling '{event}': {source}")]
    ListenerFailed {
        event: String,
        listener: String,
        #[source]
        source: BoxError,
    },

    #[error("A process-wide {variant} has already been installed")]
    GlobalAlreadyInstalled { variant: &'static str },

    #[error("Attempted to operate on a poisoned dispatcher component: {component}")]
    DispatcherPoisoned { component: String },
}

/// Shorthand for Result with the dispatcher error type
pub type Result<T> = StdResult<T, DispatcherError>;

impl DispatcherError {
    /// Returns a short stable label for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatcherError::InvalidListenerFormat { .. } => "invalid_listener_format",
            DispatcherError::InvalidListenerTarget { .. } => "invalid_listener_target",
            DispatcherError::UnknownServiceIdentifier { .. } => "unknown_service_identifier",
            DispatcherError::InvalidPriority { .. } => "invalid_priority",
            DispatcherError::ParameterNotFound { .. } => "parameter_not_found",
            DispatcherError::ParameterTypeMismatch { .. } => "parameter_type_mismatch",
            DispatcherError::EmptyEventName => "empty_event_name",
            DispatcherError::ServiceResolutionFailed { .. } => "service_resolution_failed",
            DispatcherError::ListenerFailed { .. } => "listener_failed",
            DispatcherError::GlobalAlreadyInstalled { .. } => "global_already_installed",
            DispatcherError::DispatcherPoisoned { .. } => "dispatcher_poisoned",
        }
    }

    /// True for errors raised while registering a listener.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            DispatcherError::InvalidListenerFormat { .. }
                | DispatcherError::InvalidListenerTarget { .. }
                | DispatcherError::UnknownServiceIdentifier { .. }
                | DispatcherError::InvalidPriority { .. }
                | DispatcherError::EmptyEventName
        )
    }

    pub(crate) fn invalid_target(
        target: impl Into<String>,
        method: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DispatcherError::InvalidListenerTarget {
            target: target.into(),
            method: method.into(),
            reason: reason.into(),
        }
    }
}
