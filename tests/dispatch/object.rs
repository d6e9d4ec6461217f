//! Object checkpoint: hooks that run once the target object is fetched.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use warrant::{Action, Error, Method};

use super::support::{Harness, NoteSerializer, notes};

#[test]
fn retrieve_checks_read_then_action() {
    let harness = Harness::new(Method::GET, "retrieve");
    let view = harness.view();

    let note = view.get_object_from(notes(), |n| n.id == 1).unwrap();

    assert_eq!(note.id, 1);
    assert_eq!(
        harness.log().calls(),
        ["can_read_object", "can_retrieve_object"]
    );
}

/// Safe methods never reach `can_write_object`, even when it would deny.
#[test]
fn safe_methods_never_call_can_write_object() {
    for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
        let harness = Harness::new(method, "retrieve").deny("can_write_object");
        harness
            .view()
            .get_object_from(notes(), |n| n.id == 3)
            .unwrap();
        assert_eq!(harness.log().count("can_write_object"), 0);
    }
}

#[test]
fn write_object_denial_aborts_before_action_hook() {
    let harness = Harness::new(Method::DELETE, "destroy").deny("can_write_object");

    let err = harness
        .view()
        .get_object_from(notes(), |n| n.id == 3)
        .unwrap_err();

    assert!(matches!(err, Error::Forbidden(ref hook) if hook == "can_write_object"));
    assert_eq!(
        harness.log().calls(),
        ["can_read_object", "can_write_object"]
    );
}

/// `partial_update` is checked with `can_update_object`, unvalidated.
#[test]
fn partial_update_uses_update_object_hook() {
    let harness = Harness::new(Method::PATCH, "partial_update");
    let view = harness.view();

    view.get_object_from(notes(), |n| n.id == 1).unwrap();

    assert_eq!(
        harness.log().calls(),
        [
            "can_read_object",
            "can_write_object",
            "can_update_object(false)"
        ]
    );
}

#[test]
fn custom_spelling_of_update_uses_update_object_hook() {
    let harness = Harness::new(Method::PUT, "")
        .action(Action::Custom("update".into()))
        .deny("can_update_object(false)");

    let err = harness
        .view()
        .get_object_from(notes(), |n| n.id == 1)
        .unwrap_err();

    assert!(err.is_denial());
    assert_eq!(harness.log().count("can_update_object(false)"), 1);
}

#[test]
fn custom_action_uses_custom_object_hook() {
    let harness = Harness::new(Method::POST, "archive").deny("can_archive_object");

    let err = harness
        .view()
        .get_object_from(notes(), |n| n.id == 1)
        .unwrap_err();

    assert!(err.is_denial());
    assert_eq!(harness.log().count("can_archive_object"), 1);
}

/// The pre-validation update check denies before the
/// serializer ever validates.
#[test]
fn unvalidated_update_denial_skips_validation() {
    let harness = Harness::new(Method::PUT, "update").deny("can_update_object(false)");
    let validations = Arc::new(AtomicUsize::new(0));

    let err = harness
        .view()
        .update(
            notes(),
            |n| n.id == 1,
            |note| NoteSerializer::bind(note, "renamed", &validations),
        )
        .unwrap_err();

    assert!(err.is_denial());
    assert_eq!(validations.load(Ordering::SeqCst), 0);
    assert_eq!(harness.log().count("can_update_object(true)"), 0);
}

/// The object checkpoint is skipped entirely when the global one denies.
#[test]
fn global_denial_prevents_object_lookup() {
    let harness = Harness::new(Method::DELETE, "destroy").deny("can_destroy");
    let mut deleted = false;

    let result = harness
        .view()
        .destroy(notes(), |n| n.id == 1, |_| {
            deleted = true;
            Ok(())
        });

    assert!(result.is_err());
    assert!(!deleted);
    assert_eq!(harness.log().count("can_read_object"), 0);
}
