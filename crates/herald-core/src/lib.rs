//! # Herald Core
//!
//! A synchronous, in-process event dispatcher. Components register listeners
//! against event names; [`EventDispatcher::dispatch`] invokes every listener
//! registered for the event's name in ascending priority order until one of
//! them stops propagation.
//!
//! Listeners can be given in four shapes, all normalized at registration time
//! into a [`ListenerReference`]:
//!
//! - an inline closure,
//! - an already constructed [`Subscriber`] plus a method name,
//! - a [`SubscriberClass`] name plus a method name (fresh instance per call),
//! - a service identifier plus a method name, resolved through an injected
//!   [`ServiceContainer`] (only under [`ServiceResolvingDispatcher`]).
pub mod config;
pub mod constants;
pub mod container;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod listener;
pub mod registry;

pub use config::{ConfigError, ConfigFormat, ListenerManifest, ManifestEntry};
pub use container::ServiceRegistry;
pub use dispatcher::{
    Dispatcher, EventDispatcher, ServiceContainer, ServiceResolvingDispatcher, SharedDispatcher,
};
pub use error::{BoxError, DispatcherError, ListenerResult, Result};
pub use event::{Event, ParameterValue};
pub use listener::{
    ClassRegistry, ListenerKind, ListenerReference, ListenerSpec, Subscriber, SubscriberClass,
};
pub use registry::{ListenerRegistry, Priority};

#[cfg(test)]
mod tests;
