use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::tempdir;

use crate::config::ListenerManifest;
use crate::container::ServiceRegistry;
use crate::dispatcher::{EventDispatcher, ServiceResolvingDispatcher, SharedDispatcher};
use crate::error::{DispatcherError, ListenerResult};
use crate::event::Event;
use crate::listener::{ListenerSpec, Subscriber};
use crate::tests::fixtures::{clear_calls, fixture_classes, record, take_calls};

/// Service that tallies order totals into the event
#[derive(Debug, Default)]
struct Ledger {
    entries: AtomicUsize,
}

impl Subscriber for Ledger {
    fn methods(&self) -> &[&'static str] {
        &["on_order"]
    }

    fn invoke(&self, method: &str, event: &mut Event) -> ListenerResult {
        match method {
            "on_order" => {
                let total = *event.parameter_as::<u64>("total")?;
                self.entries.fetch_add(1, Ordering::SeqCst);
                event.set_parameter("ledger_total", total * 2);
                record("ledger");
                Ok(())
            }
            other => Err(format!("no such method: {}", other).into()),
        }
    }
}

const MANIFEST: &str = r#"
[[listeners]]
event = "order.placed"
listener = "OrderListener::on_given_event"
priority = 100

[[listeners]]
event = "order.placed"
target = "ledger"
method = "on_order"
priority = 10

[[listeners]]
event = "order.cancelled"
listener = "ControlListener::halt"

[[listeners]]
event = "order.cancelled"
listener = "ledger::on_order"
priority = 1
"#;

fn build_dispatcher(ledger: Arc<Ledger>) -> ServiceResolvingDispatcher {
    let mut services = ServiceRegistry::new();
    services.register_instance("ledger", ledger);
    ServiceResolvingDispatcher::with_classes(fixture_classes(), Arc::new(services))
}

#[cfg(feature = "toml-config")]
#[test]
fn test_manifest_driven_dispatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("listeners.toml");
    fs::write(&path, MANIFEST).unwrap();

    let ledger = Arc::new(Ledger::default());
    let mut dispatcher = build_dispatcher(Arc::clone(&ledger));
    let manifest = ListenerManifest::load(&path).unwrap();
    assert_eq!(manifest.apply(&mut dispatcher).unwrap(), 4);

    dispatcher
        .register_listener(
            "order.placed",
            ListenerSpec::inline(|event| {
                let doubled = *event.parameter_as::<u64>("ledger_total")?;
                event.set_parameter("audited", doubled == 84);
                record("audit");
                Ok(())
            }),
            50,
        )
        .unwrap();

    clear_calls();
    let mut placed = Event::new("order.placed").unwrap().with_parameter("total", 42u64);
    dispatcher.dispatch(&mut placed).unwrap();
    assert_eq!(take_calls(), vec!["ledger", "audit", "on_given_event"]);
    assert!(*placed.parameter_as::<bool>("audited").unwrap());
    assert!(!placed.is_propagation_stopped());

    // halt sits at priority 0 and stops the ledger listener behind it
    let mut cancelled = Event::new("order.cancelled").unwrap().with_parameter("total", 1u64);
    dispatcher.dispatch(&mut cancelled).unwrap();
    assert_eq!(take_calls(), vec!["halt"]);
    assert!(cancelled.is_propagation_stopped());

    assert_eq!(ledger.entries.load(Ordering::SeqCst), 1);
}

#[test]
fn test_listener_failure_surfaces_with_context() {
    let ledger = Arc::new(Ledger::default());
    let shared = SharedDispatcher::new(build_dispatcher(Arc::clone(&ledger)));
    shared.register_listener("order.placed", ("ledger", "on_order"), 0).unwrap();
    shared
        .register_listener("order.placed", "OrderListener::on_given_event", 1)
        .unwrap();

    clear_calls();
    // No "total" parameter, so the ledger fails and the class listener never runs
    let err = shared
        .dispatch(&mut Event::new("order.placed").unwrap())
        .unwrap_err();
    match err {
        DispatcherError::ListenerFailed { event, listener, source } => {
            assert_eq!(event, "order.placed");
            assert_eq!(listener, "@ledger::on_order");
            assert!(source.to_string().contains("total"));
        }
        other => panic!("Expected ListenerFailed, got {:?}", other),
    }
    assert!(take_calls().is_empty());
    assert_eq!(ledger.entries.load(Ordering::SeqCst), 0);
}
