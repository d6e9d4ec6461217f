//! Full request flows: policy caching and the post-validation recheck.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use warrant::{Config, Dispatch, Error, Method, Permission, Policy, Result, Serializer, View};

use super::support::{Harness, Note, NotePolicy, NoteSerializer, notes};

/// One policy per view, however many checkpoints consult it.
#[test]
fn policy_is_built_once_per_request() {
    let harness = Harness::new(Method::PATCH, "partial_update");
    let view = harness.view();
    let validations = Arc::new(AtomicUsize::new(0));

    assert!(std::ptr::eq(view.policy().unwrap(), view.policy().unwrap()));

    view.update(notes(), |n| n.id == 1, |note| {
        NoteSerializer::bind(note, "renamed", &validations)
    })
    .unwrap();
    view.get_serializer_class().unwrap();

    assert_eq!(harness.log().builds(), 1);
}

/// A fresh view (a new request) gets a fresh policy.
#[test]
fn policies_are_not_shared_between_requests() {
    let harness = Harness::new(Method::GET, "list");

    let first = harness.view();
    let second = harness.view();
    first.check_permissions().unwrap();
    second.check_permissions().unwrap();

    assert_eq!(harness.log().builds(), 2);
    assert!(!std::ptr::eq(
        first.policy().unwrap(),
        second.policy().unwrap()
    ));
}

/// `can_update_object` runs twice: as fetched, then with validated input
/// applied but not yet saved.
#[test]
fn update_object_hook_runs_before_and_after_validation() {
    let harness = Harness::new(Method::PUT, "update");
    let validations = Arc::new(AtomicUsize::new(0));

    let saved = harness
        .view()
        .update(notes(), |n| n.id == 1, |note| {
            NoteSerializer::bind(note, "renamed", &validations)
        })
        .unwrap();

    assert_eq!(saved.title, "renamed");
    assert_eq!(validations.load(Ordering::SeqCst), 1);
    assert_eq!(
        harness.log().calls(),
        [
            "can_access",
            "can_write",
            "can_update",
            "can_read_object",
            "can_write_object",
            "can_update_object(false)",
            "can_update_object(true)",
        ]
    );
    assert_eq!(harness.log().update_titles(), ["note 1", "renamed"]);
}

/// A denial after validation stops the save.
#[test]
fn validated_update_denial_blocks_save() {
    let harness = Harness::new(Method::PATCH, "partial_update").deny("can_update_object(true)");
    let validations = Arc::new(AtomicUsize::new(0));

    let err = harness
        .view()
        .update(notes(), |n| n.id == 2, |note| {
            NoteSerializer::bind(note, "renamed", &validations)
        })
        .unwrap_err();

    assert!(err.is_denial());
    assert_eq!(validations.load(Ordering::SeqCst), 1);
}

/// Invalid input is a bad request and never reaches the validated check.
#[test]
fn invalid_update_skips_validated_check() {
    let harness = Harness::new(Method::PUT, "update");
    let validations = Arc::new(AtomicUsize::new(0));

    let err = harness
        .view()
        .update(notes(), |n| n.id == 1, |note| {
            NoteSerializer::bind(note, "  ", &validations)
        })
        .unwrap_err();

    assert!(!err.is_denial());
    assert_eq!(harness.log().count("can_update_object(false)"), 1);
    assert_eq!(harness.log().count("can_update_object(true)"), 0);
}

#[test]
fn create_checks_validated_serializer() {
    let harness = Harness::new(Method::POST, "create");
    let validations = Arc::new(AtomicUsize::new(0));

    let note = harness
        .view()
        .create(NoteSerializer::create("groceries", &validations))
        .unwrap();

    assert_eq!(note.title, "groceries");
    assert_eq!(
        harness.log().calls(),
        ["can_access", "can_write", "can_create", "can_create_object"]
    );
}

#[test]
fn create_object_denial_blocks_save() {
    let harness = Harness::new(Method::POST, "create").deny("can_create_object");
    let validations = Arc::new(AtomicUsize::new(0));

    let err = harness
        .view()
        .create(NoteSerializer::create("groceries", &validations))
        .unwrap_err();

    assert!(err.is_denial());
    assert_eq!(validations.load(Ordering::SeqCst), 1);
}

/// With the recheck off, only the unvalidated object hooks run.
#[test]
fn recheck_can_be_disabled() {
    let config = Config {
        dispatch: Dispatch {
            recheck_after_validation: false,
            ..Dispatch::default()
        },
    };
    let validations = Arc::new(AtomicUsize::new(0));

    let update = Harness::new(Method::PUT, "update")
        .config(config.clone())
        .deny("can_update_object(true)");
    update
        .view()
        .update(notes(), |n| n.id == 1, |note| {
            NoteSerializer::bind(note, "renamed", &validations)
        })
        .unwrap();
    assert_eq!(update.log().count("can_update_object(false)"), 1);
    assert_eq!(update.log().count("can_update_object(true)"), 0);

    let create = Harness::new(Method::POST, "create")
        .config(config)
        .deny("can_create_object");
    create
        .view()
        .create(NoteSerializer::create("groceries", &validations))
        .unwrap();
    assert_eq!(create.log().count("can_create_object"), 0);
}

/// Host permissions take part in the validated pass, ahead of the policy.
#[test]
fn host_permissions_check_validated_update() {
    struct ReservedTitles;

    impl Permission<NotePolicy> for ReservedTitles {
        fn has_validated_object_permission(&self, _view: &View<NotePolicy>, note: &Note) -> Result<()> {
            if note.title == "draft" {
                Err(Error::forbidden("title is reserved"))
            } else {
                Ok(())
            }
        }
    }

    let harness = Harness::new(Method::PUT, "update");
    let validations = Arc::new(AtomicUsize::new(0));

    let err = harness
        .view()
        .permission(ReservedTitles)
        .update(notes(), |n| n.id == 1, |note| {
            NoteSerializer::bind(note, "draft", &validations)
        })
        .unwrap_err();

    assert!(matches!(err, Error::Forbidden(ref reason) if reason == "title is reserved"));
    assert_eq!(harness.log().count("can_update_object(false)"), 1);
    assert_eq!(harness.log().count("can_update_object(true)"), 0);
}

#[test]
fn host_permissions_check_validated_create() {
    struct Counting(Arc<AtomicUsize>);

    impl<P: Policy> Permission<P> for Counting {
        fn has_create_permission(
            &self,
            _view: &View<P>,
            serializer: &dyn Serializer<Object = P::Object>,
        ) -> Result<()> {
            assert!(serializer.instance().is_none());
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let seen = Arc::new(AtomicUsize::new(0));
    let validations = Arc::new(AtomicUsize::new(0));
    let harness = Harness::new(Method::POST, "create");

    harness
        .view()
        .permission(Counting(Arc::clone(&seen)))
        .create(NoteSerializer::create("groceries", &validations))
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(harness.log().count("can_create_object"), 1);

    let disabled = Config {
        dispatch: Dispatch {
            recheck_after_validation: false,
            ..Dispatch::default()
        },
    };
    Harness::new(Method::POST, "create")
        .config(disabled)
        .view()
        .permission(Counting(Arc::clone(&seen)))
        .create(NoteSerializer::create("groceries", &validations))
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn serializer_class_comes_from_policy() {
    let harness = Harness::new(Method::GET, "retrieve");
    assert_eq!(
        harness.view().get_serializer_class().unwrap(),
        Some("NoteSerializer")
    );
}
