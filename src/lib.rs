//! Warrant - convention-based policy dispatch for request handlers.
//!
//! Warrant sits between a request-handling framework and application
//! policy objects. It checks requests at two points and routes each one to
//! narrowly-named hooks on the policy:
//!
//! - **Policy**: per-request object with allow-by-default hooks (`can_read`, `can_write_object`, ...)
//! - **Permission**: the dispatcher that decides which hooks run, in which order
//! - **View**: per-request context that builds and caches the policy
//! - **Filter**: applies the policy's mandatory queryset filters
//! - **Config**: Layered configuration (file → env → CLI)
//!
//! A hook denies by returning an error. Hooks that are not overridden allow.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warrant::{Action, Error, Policy, Request, Result, Scope, View};
//!
//! struct NotePolicy {
//!     scope: Scope,
//! }
//!
//! impl Policy for NotePolicy {
//!     type Object = Note;
//!     type Filter = warrant::Predicate<Note>;
//!
//!     fn can_write(&self) -> Result<()> {
//!         self.scope.request.require_user().map(|_| ())
//!     }
//!
//!     fn can_update_object(&self, note: &Note, validated: bool) -> Result<()> {
//!         if validated && note.title.is_empty() {
//!             return Err(Error::forbidden("notes need a title"));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let request = Arc::new(Request::new(warrant::Method::PATCH).with_user("alice"));
//! let view = View::new(request, Action::PartialUpdate)
//!     .policy_class(|scope| NotePolicy { scope });
//!
//! let saved = view.update(notes, |n| n.id == 7, |note| NoteSerializer::bind(note, input))?;
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod filter;
pub mod permission;
pub mod policy;
pub mod request;
pub mod serializer;
pub mod view;
pub mod viewset;

// Re-export main types at crate root
pub use action::Action;
pub use config::{Config, ConfigLoader, Dispatch, GlobalRead};
pub use error::{Error, Result};
pub use filter::{PolicyFilter, Predicate, Queryset};
pub use permission::{Permission, PolicyPermission};
pub use policy::{BasePolicy, Policy, Scope, ViewInfo};
pub use request::{Request, SAFE_METHODS, is_safe_method};
pub use serializer::Serializer;
pub use view::View;

// Re-export commonly used dependencies for convenience
pub use hyper::Method;
