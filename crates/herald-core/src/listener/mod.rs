//! # Herald Listener References
//!
//! Registration accepts a listener in any of several shapes ([`ListenerSpec`]).
//! [`ListenerReference::resolve`] validates the input once, at registration
//! time, and collapses it into one of four invocation strategies so that
//! dispatch is a single exhaustive match.
pub mod subscriber;

use std::fmt;
use std::sync::Arc;

use crate::constants::LISTENER_SEPARATOR;
use crate::dispatcher::ServiceContainer;
use crate::error::{DispatcherError, ListenerResult, Result};
use crate::event::Event;

pub use subscriber::{ClassFactory, ClassRegistry, Subscriber, SubscriberClass};

/// A closure listener
pub type InlineListener = Arc<dyn Fn(&mut Event) -> ListenerResult + Send + Sync>;

/// Listener as given by the registrant, before validation
pub enum ListenerSpec {
    /// `"Identifier::method"`
    Text(String),
    /// Class name or service id plus a method name
    Named { target: String, method: String },
    /// Already constructed object plus a method name
    Bound { object: Arc<dyn Subscriber>, method: String },
    Inline(InlineListener),
}

impl ListenerSpec {
    pub fn inline<F>(listener: F) -> Self
    where
        F: Fn(&mut Event) -> ListenerResult + Send + Sync + 'static,
    {
        ListenerSpec::Inline(Arc::new(listener))
    }

    pub fn bound<S: Subscriber + 'static>(object: Arc<S>, method: impl Into<String>) -> Self {
        ListenerSpec::Bound { object, method: method.into() }
    }

    pub fn named(target: impl Into<String>, method: impl Into<String>) -> Self {
        ListenerSpec::Named { target: target.into(), method: method.into() }
    }
}

impl fmt::Debug for ListenerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerSpec::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ListenerSpec::Named { target, method } => f
                .debug_struct("Named")
                .field("target", target)
                .field("method", method)
                .finish(),
            ListenerSpec::Bound { object, method } => f
                .debug_struct("Bound")
                .field("object", &object.subscriber_name())
                .field("method", method)
                .finish(),
            ListenerSpec::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl From<&str> for ListenerSpec {
    fn from(text: &str) -> Self {
        ListenerSpec::Text(text.to_string())
    }
}

impl From<String> for ListenerSpec {
    fn from(text: String) -> Self {
        ListenerSpec::Text(text)
    }
}

impl From<(&str, &str)> for ListenerSpec {
    fn from((target, method): (&str, &str)) -> Self {
        ListenerSpec::named(target, method)
    }
}

impl From<(String, String)> for ListenerSpec {
    fn from((target, method): (String, String)) -> Self {
        ListenerSpec::Named { target, method }
    }
}

impl From<(Arc<dyn Subscriber>, &str)> for ListenerSpec {
    fn from((object, method): (Arc<dyn Subscriber>, &str)) -> Self {
        ListenerSpec::Bound { object, method: method.to_string() }
    }
}

impl<S: Subscriber + 'static> From<(Arc<S>, &str)> for ListenerSpec {
    fn from((object, method): (Arc<S>, &str)) -> Self {
        ListenerSpec::bound(object, method)
    }
}

/// Which invocation strategy a reference uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Inline,
    BoundMethod,
    ClassMethod,
    ServiceMethod,
}

/// Normalized, validated listener as stored in the registry
#[derive(Clone)]
pub enum ListenerReference {
    Inline(InlineListener),
    BoundMethod {
        object: Arc<dyn Subscriber>,
        method: String,
    },
    /// Instantiated through `factory` on every call, never cached
    ClassMethod {
        class: String,
        method: String,
        factory: ClassFactory,
    },
    /// Resolved through the service container on every call
    ServiceMethod {
        service_id: String,
        method: String,
    },
}

impl fmt::Debug for ListenerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerReference({:?}, {})", self.kind(), self.describe())
    }
}

impl ListenerReference {
    /// Validate a raw listener and pick its invocation strategy.
    ///
    /// `services` is `None` under the base dispatcher; a name that is not a
    /// known class is then rejected instead of being treated as a service id.
    pub fn resolve(
        spec: ListenerSpec,
        classes: &ClassRegistry,
        services: Option<&dyn ServiceContainer>,
    ) -> Result<Self> {
        match spec {
            ListenerSpec::Inline(listener) => Ok(ListenerReference::Inline(listener)),
            ListenerSpec::Text(text) => {
                let (target, method) = split_listener(&text)?;
                Self::resolve_named(target, method, classes, services)
            }
            ListenerSpec::Named { target, method } => {
                Self::resolve_named(target, method, classes, services)
            }
            ListenerSpec::Bound { object, method } => {
                if !object.has_method(&method) {
                    return Err(DispatcherError::invalid_target(
                        object.subscriber_name(),
                        method,
                        "method does not exist on the given object",
                    ));
                }
                Ok(ListenerReference::BoundMethod { object, method })
            }
        }
    }

    fn resolve_named(
        target: String,
        method: String,
        classes: &ClassRegistry,
        services: Option<&dyn ServiceContainer>,
    ) -> Result<Self> {
        if let Some(factory) = classes.factory(&target) {
            if !classes.class_has_method(&target, &method) {
                return Err(DispatcherError::invalid_target(
                    target,
                    method,
                    "method does not exist on the class",
                ));
            }
            return Ok(ListenerReference::ClassMethod { class: target, method, factory });
        }

        match services {
            None => Err(DispatcherError::invalid_target(
                target,
                method,
                "no class is registered under this name",
            )),
            // Method existence is checked at call time, the service is not built here
            Some(container) if container.has(&target) => {
                Ok(ListenerReference::ServiceMethod { service_id: target, method })
            }
            Some(_) => Err(DispatcherError::UnknownServiceIdentifier { service_id: target }),
        }
    }

    pub fn kind(&self) -> ListenerKind {
        match self {
            ListenerReference::Inline(_) => ListenerKind::Inline,
            ListenerReference::BoundMethod { .. } => ListenerKind::BoundMethod,
            ListenerReference::ClassMethod { .. } => ListenerKind::ClassMethod,
            ListenerReference::ServiceMethod { .. } => ListenerKind::ServiceMethod,
        }
    }

    /// Short label such as `Mailer::on_created` or `@mailer::on_created`
    pub fn describe(&self) -> String {
        match self {
            ListenerReference::Inline(_) => "<inline>".to_string(),
            ListenerReference::BoundMethod { object, method } => {
                format!("{}{}{}", object.subscriber_name(), LISTENER_SEPARATOR, method)
            }
            ListenerReference::ClassMethod { class, method, .. } => {
                format!("{}{}{}", class, LISTENER_SEPARATOR, method)
            }
            ListenerReference::ServiceMethod { service_id, method } => {
                format!("@{}{}{}", service_id, LISTENER_SEPARATOR, method)
            }
        }
    }
}

/// Split `"Identifier::method"` into exactly two non-empty parts
fn split_listener(text: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = text.split(LISTENER_SEPARATOR).collect();
    match parts.as_slice() {
        [target, method] if !target.is_empty() && !method.is_empty() => {
            Ok((target.to_string(), method.to_string()))
        }
        _ => Err(DispatcherError::InvalidListenerFormat { listener: text.to_string() }),
    }
}

#[cfg(test)]
mod tests;
