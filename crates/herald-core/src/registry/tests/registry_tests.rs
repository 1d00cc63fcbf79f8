use std::sync::Arc;

use crate::event::Event;
use crate::listener::ListenerReference;
use crate::registry::{ListenerRegistry, Priority};

/// Inline reference that records `tag` into the event's "calls" parameter
fn tagged(tag: &'static str) -> ListenerReference {
    ListenerReference::Inline(Arc::new(move |event: &mut Event| {
        let mut calls = event
            .parameter_as::<Vec<&'static str>>("calls")
            .cloned()
            .unwrap_or_default();
        calls.push(tag);
        event.set_parameter("calls", calls);
        Ok(())
    }))
}

fn run(registry: &ListenerRegistry, name: &str) -> Vec<&'static str> {
    let mut event = Event::new(name).unwrap();
    for reference in registry.get(name) {
        if let ListenerReference::Inline(listener) = reference {
            listener(&mut event).unwrap();
        }
    }
    event.parameter_as::<Vec<&'static str>>("calls").cloned().unwrap_or_default()
}

#[test]
fn test_get_unknown_event_is_empty() {
    let registry = ListenerRegistry::new();
    assert!(registry.get("nothing.here").is_empty());
    assert!(!registry.has("nothing.here"));
    assert_eq!(registry.len("nothing.here"), 0);
}

#[test]
fn test_get_flattens_by_ascending_priority() {
    let mut registry = ListenerRegistry::new();
    registry.register("order", tagged("p255"), Priority::new(255));
    registry.register("order", tagged("p30"), Priority::new(30));
    registry.register("order", tagged("p45"), Priority::new(45));
    registry.register("order", tagged("p0"), Priority::new(0));

    assert_eq!(run(&registry, "order"), vec!["p0", "p30", "p45", "p255"]);
    assert_eq!(registry.len("order"), 4);
}

#[test]
fn test_same_priority_keeps_registration_order() {
    let mut registry = ListenerRegistry::new();
    registry.register("tie", tagged("first"), Priority::new(10));
    registry.register("tie", tagged("second"), Priority::new(10));
    registry.register("tie", tagged("early"), Priority::new(1));
    registry.register("tie", tagged("third"), Priority::new(10));

    assert_eq!(run(&registry, "tie"), vec!["early", "first", "second", "third"]);
}

#[test]
fn test_events_are_isolated() {
    let mut registry = ListenerRegistry::new();
    registry.register("a", tagged("a1"), Priority::default());
    registry.register("b", tagged("b1"), Priority::default());

    assert!(registry.has("a"));
    assert!(registry.has("b"));
    assert_eq!(run(&registry, "a"), vec!["a1"]);
    assert_eq!(registry.event_names(), vec!["a", "b"]);
}
