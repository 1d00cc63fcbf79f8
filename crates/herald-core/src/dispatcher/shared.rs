use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use lazy_static::lazy_static;

use crate::dispatcher::{Dispatcher, EventDispatcher, ServiceResolvingDispatcher};
use crate::error::{DispatcherError, Result};
use crate::event::Event;
use crate::listener::ListenerSpec;

lazy_static! {
    /// One slot per dispatcher type, keyed by its `TypeId`
    static ref GLOBAL_DISPATCHERS: Mutex<HashMap<TypeId, Box<dyn Any + Send>>> =
        Mutex::new(HashMap::new());
}

/// Thread-safe handle to a dispatcher.
///
/// Dispatching takes a shared read lock, so a listener may dispatch further
/// events through the same handle. Registration takes the write lock; a
/// listener that registers through the handle it is being dispatched from
/// will deadlock.
pub struct SharedDispatcher<D> {
    dispatcher: Arc<RwLock<D>>,
}

impl<D> Clone for SharedDispatcher<D> {
    fn clone(&self) -> Self {
        Self { dispatcher: Arc::clone(&self.dispatcher) }
    }
}

impl<D> fmt::Debug for SharedDispatcher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDispatcher")
            .field("variant", &type_name::<D>())
            .finish_non_exhaustive()
    }
}

impl<D> SharedDispatcher<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher: Arc::new(RwLock::new(dispatcher)) }
    }

    /// True when both handles point at the same dispatcher
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.dispatcher, &other.dispatcher)
    }

    fn poisoned() -> DispatcherError {
        DispatcherError::DispatcherPoisoned { component: type_name::<D>().to_string() }
    }

    /// Run `f` with shared access to the dispatcher
    pub fn with<R>(&self, f: impl FnOnce(&D) -> R) -> Result<R> {
        let guard = self.dispatcher.read().map_err(|_| Self::poisoned())?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access to the dispatcher
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut D) -> R) -> Result<R> {
        let mut guard = self.dispatcher.write().map_err(|_| Self::poisoned())?;
        Ok(f(&mut guard))
    }
}

impl<D: EventDispatcher> SharedDispatcher<D> {
    pub fn register_listener<L: Into<ListenerSpec>>(
        &self,
        event_name: &str,
        listener: L,
        priority: i64,
    ) -> Result<()> {
        self.with_mut(|dispatcher| dispatcher.register_listener(event_name, listener, priority))?
    }

    pub fn dispatch(&self, event: &mut Event) -> Result<()> {
        self.with(|dispatcher| dispatcher.dispatch(event))?
    }

    pub fn has_listeners(&self, event_name: &str) -> Result<bool> {
        self.with(|dispatcher| dispatcher.has_listeners(event_name))
    }
}

fn global_slots() -> Result<MutexGuard<'static, HashMap<TypeId, Box<dyn Any + Send>>>> {
    GLOBAL_DISPATCHERS.lock().map_err(|_| DispatcherError::DispatcherPoisoned {
        component: "global dispatcher slots".to_string(),
    })
}

/// Install `dispatcher` as the process-wide instance of its type.
///
/// Fails with `GlobalAlreadyInstalled` if an instance of `D` already exists.
pub fn install<D: Send + Sync + 'static>(dispatcher: D) -> Result<SharedDispatcher<D>> {
    let mut slots = global_slots()?;
    let key = TypeId::of::<D>();
    if slots.contains_key(&key) {
        return Err(DispatcherError::GlobalAlreadyInstalled { variant: type_name::<D>() });
    }

    let shared = SharedDispatcher::new(dispatcher);
    slots.insert(key, Box::new(shared.clone()));
    log::debug!("Installed process-wide {}", type_name::<D>());
    Ok(shared)
}

/// The process-wide instance of `D`, if one has been installed
pub fn instance<D: Send + Sync + 'static>() -> Result<Option<SharedDispatcher<D>>> {
    let slots = global_slots()?;
    Ok(slots
        .get(&TypeId::of::<D>())
        .and_then(|slot| slot.downcast_ref::<SharedDispatcher<D>>())
        .cloned())
}

/// The process-wide instance of `D`, created with `D::default()` on first use
pub fn get_or_init<D: Default + Send + Sync + 'static>() -> Result<SharedDispatcher<D>> {
    let mut slots = global_slots()?;
    let slot = slots
        .entry(TypeId::of::<D>())
        .or_insert_with(|| Box::new(SharedDispatcher::new(D::default())));
    slot.downcast_ref::<SharedDispatcher<D>>()
        .cloned()
        .ok_or_else(|| DispatcherError::DispatcherPoisoned {
            component: format!("global slot for {}", type_name::<D>()),
        })
}

impl Dispatcher {
    /// Process-wide base dispatcher, independent from other variants' instances
    pub fn instance() -> Result<SharedDispatcher<Dispatcher>> {
        get_or_init::<Dispatcher>()
    }
}

impl ServiceResolvingDispatcher {
    /// Process-wide service-resolving dispatcher, independent from the base instance
    pub fn instance() -> Result<SharedDispatcher<ServiceResolvingDispatcher>> {
        get_or_init::<ServiceResolvingDispatcher>()
    }
}
