use std::sync::Arc;

use crate::dispatcher::ServiceContainer;
use crate::error::DispatcherError;
use crate::listener::{ClassRegistry, ListenerKind, ListenerReference, ListenerSpec, Subscriber};
use crate::tests::fixtures::{OrderListener, StubContainer, fixture_classes};

fn resolve_base(spec: impl Into<ListenerSpec>) -> Result<ListenerReference, DispatcherError> {
    ListenerReference::resolve(spec.into(), &fixture_classes(), None)
}

fn resolve_with(
    spec: impl Into<ListenerSpec>,
    container: &StubContainer,
) -> Result<ListenerReference, DispatcherError> {
    let services: &dyn ServiceContainer = container;
    ListenerReference::resolve(spec.into(), &fixture_classes(), Some(services))
}

#[test]
fn test_inline_accepted_without_validation() {
    let reference = resolve_base(ListenerSpec::inline(|_event| Ok(()))).unwrap();
    assert_eq!(reference.kind(), ListenerKind::Inline);
    assert_eq!(reference.describe(), "<inline>");
}

#[test]
fn test_text_listener_resolves_to_class_method() {
    let reference = resolve_base("OrderListener::on_given_event").unwrap();
    assert_eq!(reference.kind(), ListenerKind::ClassMethod);
    assert_eq!(reference.describe(), "OrderListener::on_given_event");
}

#[test]
fn test_pair_listener_resolves_to_class_method() {
    let reference = resolve_base(("OrderListener", "on_yet_another_event")).unwrap();
    assert_eq!(reference.kind(), ListenerKind::ClassMethod);
}

#[test]
fn test_malformed_text_listeners_rejected() {
    for text in [
        "OrderListener-on_given_event",
        "OrderListener::on_given_event::extra",
        "::on_given_event",
        "OrderListener::",
        "",
    ] {
        match resolve_base(text) {
            Err(DispatcherError::InvalidListenerFormat { listener }) => assert_eq!(listener, text),
            other => panic!("Expected InvalidListenerFormat for '{}', got {:?}", text, other),
        }
    }
}

#[test]
fn test_unknown_class_rejected_by_base_resolution() {
    let err = resolve_base("NonexistentClass::method").unwrap_err();
    match err {
        DispatcherError::InvalidListenerTarget { target, method, .. } => {
            assert_eq!(target, "NonexistentClass");
            assert_eq!(method, "method");
        }
        other => panic!("Expected InvalidListenerTarget, got {:?}", other),
    }
}

#[test]
fn test_missing_class_method_rejected() {
    let err = resolve_base(("OrderListener", "on_yet_another_event_non_existing")).unwrap_err();
    assert!(matches!(err, DispatcherError::InvalidListenerTarget { .. }));
}

#[test]
fn test_bound_object_method_checked() {
    let object = Arc::new(OrderListener);

    let reference = resolve_base((object.clone(), "on_another_event")).unwrap();
    assert_eq!(reference.kind(), ListenerKind::BoundMethod);
    assert!(reference.describe().ends_with("OrderListener::on_another_event"));

    let err = resolve_base((object, "on_another_event_non_existing")).unwrap_err();
    assert!(matches!(err, DispatcherError::InvalidListenerTarget { .. }));
}

#[test]
fn test_bound_trait_object_accepted() {
    let object: Arc<dyn Subscriber> = Arc::new(OrderListener);
    let reference = resolve_base((object, "on_given_event")).unwrap();
    assert_eq!(reference.kind(), ListenerKind::BoundMethod);
}

#[test]
fn test_service_id_checked_against_container_only() {
    let container = StubContainer::with_listener_service();

    let reference = resolve_with(("listener_service", "on_event"), &container).unwrap();
    assert_eq!(reference.kind(), ListenerKind::ServiceMethod);
    assert_eq!(reference.describe(), "@listener_service::on_event");

    // Method existence is not checked and the service is not looked up
    let reference = resolve_with("listener_service::no_such_method", &container).unwrap();
    assert_eq!(reference.kind(), ListenerKind::ServiceMethod);
    assert_eq!(container.lookups(), 0);
}

#[test]
fn test_unknown_service_id_rejected() {
    let container = StubContainer::with_listener_service();
    match resolve_with("NonexistentClass::method", &container) {
        Err(DispatcherError::UnknownServiceIdentifier { service_id }) => {
            assert_eq!(service_id, "NonexistentClass")
        }
        other => panic!("Expected UnknownServiceIdentifier, got {:?}", other),
    }
}

#[test]
fn test_class_name_wins_over_service_id() {
    let mut container = StubContainer::with_listener_service();
    container.insert("OrderListener", Arc::new(OrderListener));

    let reference = resolve_with(("OrderListener", "on_given_event"), &container).unwrap();
    assert_eq!(reference.kind(), ListenerKind::ClassMethod);

    // Class validation still applies even though a service shares the name
    let err = resolve_with(("OrderListener", "missing"), &container).unwrap_err();
    assert!(matches!(err, DispatcherError::InvalidListenerTarget { .. }));
}

#[test]
fn test_empty_class_registry_rejects_names() {
    let classes = ClassRegistry::new();
    let err = ListenerReference::resolve("OrderListener::on_given_event".into(), &classes, None)
        .unwrap_err();
    assert!(err.is_registration_error());
}
