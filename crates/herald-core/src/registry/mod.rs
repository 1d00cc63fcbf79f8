//! # Herald Listener Registry
//!
//! Per-dispatcher storage of validated listeners, bucketed by event name and
//! [`Priority`]. Buckets are created on first registration and never pruned.
mod priority;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::listener::ListenerReference;

pub use priority::Priority;

/// Registry mapping event names to priority-ordered listeners
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<String, BTreeMap<Priority, Vec<ListenerReference>>>,
}

// Manual Debug implementation showing listener counts per event
impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .listeners
            .keys()
            .map(|name| (name.as_str(), self.len(name)))
            .collect();
        f.debug_struct("ListenerRegistry").field("listeners", &counts).finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self { listeners: HashMap::new() }
    }

    /// Append a listener to the `(event_name, priority)` bucket
    pub fn register(&mut self, event_name: &str, reference: ListenerReference, priority: Priority) {
        self.listeners
            .entry(event_name.to_string())
            .or_default()
            .entry(priority)
            .or_default()
            .push(reference);
    }

    /// Listeners for `event_name`, ascending by priority, registration order within a priority
    pub fn get(&self, event_name: &str) -> Vec<&ListenerReference> {
        self.listeners
            .get(event_name)
            .map(|buckets| buckets.values().flatten().collect())
            .unwrap_or_default()
    }

    pub fn has(&self, event_name: &str) -> bool {
        self.len(event_name) > 0
    }

    /// Number of listeners registered for `event_name`
    pub fn len(&self, event_name: &str) -> usize {
        self.listeners
            .get(event_name)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Names of all events with at least one listener, sorted
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .listeners
            .iter()
            .filter(|(_, buckets)| buckets.values().any(|bucket| !bucket.is_empty()))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests;
