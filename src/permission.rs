//! Permission objects and the policy dispatcher.
//!
//! The host runs every [`Permission`] of a view at two checkpoints: once
//! before anything is fetched ([`has_permission`](Permission::has_permission))
//! and once per fetched object
//! ([`has_object_permission`](Permission::has_object_permission)).
//! [`PolicyPermission`] turns those checkpoints into an ordered series of
//! policy hook calls:
//!
//! | Checkpoint | Order |
//! |---|---|
//! | global | `can_access`, `can_read` (safe) or `can_write` (unsafe), `can_<action>` |
//! | object | `can_read_object`, `can_write_object` (unsafe), `can_<action>_object` |
//!
//! The first hook that returns an error ends the checkpoint and the error is
//! returned as-is. `partial_update` uses the `update` hooks.
//!
//! Create and update flows add a validated pass after the serializer has
//! validated its input: [`has_create_permission`](Permission::has_create_permission)
//! maps to `can_create_object` and
//! [`has_validated_object_permission`](Permission::has_validated_object_permission)
//! to `can_update_object(obj, true)`.

use crate::Result;
use crate::action::Action;
use crate::config::{Dispatch, GlobalRead};
use crate::policy::Policy;
use crate::serializer::Serializer;
use crate::view::View;

/// A permission object consulted by the view at both checkpoints and in the
/// validated pass.
///
/// Every check allows by default.
pub trait Permission<P: Policy>: Send + Sync {
    /// Global check, before any object is located.
    fn has_permission(&self, _view: &View<P>) -> Result<()> {
        Ok(())
    }

    /// Object check, after the object is fetched and before it is changed.
    fn has_object_permission(&self, _view: &View<P>, _obj: &P::Object) -> Result<()> {
        Ok(())
    }

    /// Create check, after validation and before save.
    fn has_create_permission(
        &self,
        _view: &View<P>,
        _serializer: &dyn Serializer<Object = P::Object>,
    ) -> Result<()> {
        Ok(())
    }

    /// Update check on the validated, unsaved instance.
    fn has_validated_object_permission(&self, _view: &View<P>, _obj: &P::Object) -> Result<()> {
        Ok(())
    }
}

/// Dispatches both checkpoints to the view's policy hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyPermission {
    global_read: GlobalRead,
}

impl PolicyPermission {
    pub fn new(dispatch: &Dispatch) -> Self {
        Self {
            global_read: dispatch.global_read,
        }
    }

    pub fn global_read(&self) -> GlobalRead {
        self.global_read
    }
}

fn invoke(hook: &str, action: &Action, call: impl FnOnce() -> Result<()>) -> Result<()> {
    tracing::trace!(hook, action = %action, "calling policy hook");
    call()
}

impl<P: Policy> Permission<P> for PolicyPermission {
    fn has_permission(&self, view: &View<P>) -> Result<()> {
        let policy = view.policy()?;
        let action = view.action().normalize();
        let safe = view.request().is_safe();

        invoke("can_access", &action, || policy.can_access())?;

        if safe || self.global_read == GlobalRead::Always {
            invoke("can_read", &action, || policy.can_read())?;
        }
        if !safe {
            invoke("can_write", &action, || policy.can_write())?;
        }

        invoke(&action.hook_name(), &action, || match &action {
            Action::List => policy.can_list(),
            Action::Retrieve => policy.can_retrieve(),
            Action::Create => policy.can_create(),
            Action::Update | Action::PartialUpdate => policy.can_update(),
            Action::Destroy => policy.can_destroy(),
            Action::Custom(_) | Action::Unknown => policy.can_custom(action.as_str()),
        })
    }

    fn has_object_permission(&self, view: &View<P>, obj: &P::Object) -> Result<()> {
        let policy = view.policy()?;
        let action = view.action().normalize();

        invoke("can_read_object", &action, || policy.can_read_object(obj))?;

        if !view.request().is_safe() {
            invoke("can_write_object", &action, || policy.can_write_object(obj))?;
        }

        let hook = action.object_hook_name();
        match &action {
            Action::Retrieve => invoke(&hook, &action, || policy.can_retrieve_object(obj)),
            Action::Update | Action::PartialUpdate => {
                invoke(&hook, &action, || policy.can_update_object(obj, false))
            }
            Action::Destroy => invoke(&hook, &action, || policy.can_destroy_object(obj)),
            Action::Custom(_) | Action::Unknown => invoke(&hook, &action, || {
                policy.can_custom_object(action.as_str(), obj)
            }),
            // Nothing has been fetched for these; create is checked after validation.
            Action::List | Action::Create => Ok(()),
        }
    }

    fn has_create_permission(
        &self,
        view: &View<P>,
        serializer: &dyn Serializer<Object = P::Object>,
    ) -> Result<()> {
        let policy = view.policy()?;
        invoke("can_create_object", view.action(), || {
            policy.can_create_object(serializer)
        })
    }

    fn has_validated_object_permission(&self, view: &View<P>, obj: &P::Object) -> Result<()> {
        let policy = view.policy()?;
        invoke("can_update_object", view.action(), || {
            policy.can_update_object(obj, true)
        })
    }
}
