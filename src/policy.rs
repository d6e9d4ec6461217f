//! The policy contract: named authorization hooks with allow-all defaults.
//!
//! A policy is built once per request by the view that owns it and answers
//! narrowly-named questions (`can_write`, `can_update_object`, ...). Every
//! hook defaults to `Ok(())`, so a hook that is not overridden never denies.
//! Denial is signalled by returning an error, usually
//! [`Error::forbidden`](crate::Error::forbidden); the return value of an
//! allowing hook carries no information.
//!
//! # Example
//!
//! ```ignore
//! use warrant::{Error, Policy, Predicate, Result, Scope};
//!
//! struct NotePolicy {
//!     scope: Scope,
//! }
//!
//! impl Policy for NotePolicy {
//!     type Object = Note;
//!     type Filter = Predicate<Note>;
//!
//!     fn can_write(&self) -> Result<()> {
//!         self.scope.request.require_user().map(|_| ())
//!     }
//!
//!     fn can_write_object(&self, note: &Note) -> Result<()> {
//!         match self.scope.user() {
//!             Some(user) if user == note.owner => Ok(()),
//!             _ => Err(Error::forbidden("only the owner may edit a note")),
//!         }
//!     }
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use crate::Result;
use crate::action::Action;
use crate::request::Request;
use crate::serializer::Serializer;

/// The view a policy was created for.
#[derive(Debug, Clone)]
pub struct ViewInfo {
    /// Name of the view, used in diagnostics.
    pub name: &'static str,
    /// The action as reported by the host, before normalization.
    pub action: Action,
}

/// What a policy is constructed from. Fixed for the policy's lifetime.
#[derive(Debug, Clone)]
pub struct Scope {
    pub request: Arc<Request>,
    pub view: ViewInfo,
}

impl Scope {
    /// The authenticated user of the request, if any.
    pub fn user(&self) -> Option<&str> {
        self.request.user()
    }

    pub fn action(&self) -> &Action {
        &self.view.action
    }
}

/// Authorization hooks consulted by [`PolicyPermission`](crate::PolicyPermission)
/// and the view lifecycle.
pub trait Policy: Send + Sync + 'static {
    /// The resource a single-object check receives.
    type Object;

    /// Predicate type returned from [`filter_queryset`](Policy::filter_queryset).
    type Filter;

    // Global hooks, run before any object is fetched.

    /// Called on every request.
    fn can_access(&self) -> Result<()> {
        Ok(())
    }

    /// Called on safe methods (on every request with `GlobalRead::Always`).
    fn can_read(&self) -> Result<()> {
        Ok(())
    }

    /// Called on unsafe methods only.
    fn can_write(&self) -> Result<()> {
        Ok(())
    }

    fn can_list(&self) -> Result<()> {
        Ok(())
    }

    fn can_retrieve(&self) -> Result<()> {
        Ok(())
    }

    fn can_create(&self) -> Result<()> {
        Ok(())
    }

    /// Called for both `update` and `partial_update`.
    fn can_update(&self) -> Result<()> {
        Ok(())
    }

    fn can_destroy(&self) -> Result<()> {
        Ok(())
    }

    /// Called for application-defined actions, with the action name.
    /// A view without an action reports `"unknown"`.
    fn can_custom(&self, _action: &str) -> Result<()> {
        Ok(())
    }

    // Object hooks, run after the object is fetched.

    /// Called for every fetched object.
    fn can_read_object(&self, _obj: &Self::Object) -> Result<()> {
        Ok(())
    }

    /// Called for fetched objects on unsafe methods only.
    fn can_write_object(&self, _obj: &Self::Object) -> Result<()> {
        Ok(())
    }

    fn can_retrieve_object(&self, _obj: &Self::Object) -> Result<()> {
        Ok(())
    }

    /// Called twice per update: with `validated == false` for the object as
    /// fetched, and with `validated == true` for the object after input
    /// validation has been applied to it but before it is persisted.
    fn can_update_object(&self, _obj: &Self::Object, _validated: bool) -> Result<()> {
        Ok(())
    }

    fn can_destroy_object(&self, _obj: &Self::Object) -> Result<()> {
        Ok(())
    }

    fn can_custom_object(&self, _action: &str, _obj: &Self::Object) -> Result<()> {
        Ok(())
    }

    /// Called with a validated create serializer. No instance exists yet.
    fn can_create_object(&self, _serializer: &dyn Serializer<Object = Self::Object>) -> Result<()> {
        Ok(())
    }

    // Non-authorization hooks.

    /// Mandatory filters for any collection this view reads.
    /// Empty means unrestricted.
    fn filter_queryset(&self) -> Vec<Self::Filter> {
        Vec::new()
    }

    /// Serializer to use when the view does not name one.
    fn serializer_class(&self) -> Option<&'static str> {
        None
    }
}

/// A policy that overrides nothing and therefore allows everything.
pub struct BasePolicy<O, F = ()> {
    scope: Scope,
    _marker: PhantomData<fn() -> (O, F)>,
}

impl<O, F> BasePolicy<O, F> {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            _marker: PhantomData,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl<O: 'static, F: 'static> Policy for BasePolicy<O, F> {
    type Object = O;
    type Filter = F;
}
