//! Per-request view context that owns the policy.
//!
//! A [`View`] is built by the host for a single request. It knows the
//! request, the logical action and how to build its policy. The policy is
//! created lazily on first use and the same instance is returned for the
//! rest of the request.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::action::Action;
use crate::config::Config;
use crate::permission::{Permission, PolicyPermission};
use crate::policy::{Policy, Scope, ViewInfo};
use crate::request::Request;
use crate::{Error, Result};

/// Builds a policy for one request.
pub type PolicyClass<P> = Box<dyn Fn(Scope) -> P + Send + Sync>;

/// A view bound to one request.
pub struct View<P: Policy> {
    name: &'static str,
    request: Arc<Request>,
    action: Action,
    policy_class: Option<PolicyClass<P>>,
    policy: OnceCell<P>,
    serializer_class: Option<&'static str>,
    resolved_serializer: OnceCell<Option<&'static str>>,
    permissions: Vec<Box<dyn Permission<P>>>,
    dispatcher: PolicyPermission,
    recheck_after_validation: bool,
}

impl<P: Policy> View<P> {
    /// Create a view for `request` performing `action`, with default config.
    pub fn new(request: Arc<Request>, action: Action) -> Self {
        let config = Config::default();
        Self {
            name: "view",
            request,
            action,
            policy_class: None,
            policy: OnceCell::new(),
            serializer_class: None,
            resolved_serializer: OnceCell::new(),
            permissions: Vec::new(),
            dispatcher: PolicyPermission::new(&config.dispatch),
            recheck_after_validation: config.dispatch.recheck_after_validation,
        }
    }

    /// Name used in diagnostics.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Set the factory that builds this view's policy.
    pub fn policy_class<F>(mut self, class: F) -> Self
    where
        F: Fn(Scope) -> P + Send + Sync + 'static,
    {
        self.policy_class = Some(Box::new(class));
        self
    }

    /// Use a ready-made policy instead of building one.
    pub fn with_policy(mut self, policy: P) -> Self {
        self.policy = OnceCell::with_value(policy);
        self
    }

    /// Name the serializer explicitly; the policy is then not consulted.
    pub fn serializer_class(mut self, serializer: &'static str) -> Self {
        self.serializer_class = Some(serializer);
        self
    }

    /// Add a host permission object. The policy dispatcher always runs last.
    pub fn permission(mut self, permission: impl Permission<P> + 'static) -> Self {
        self.permissions.push(Box::new(permission));
        self
    }

    /// Apply dispatch settings.
    pub fn config(mut self, config: &Config) -> Self {
        self.dispatcher = PolicyPermission::new(&config.dispatch);
        self.recheck_after_validation = config.dispatch.recheck_after_validation;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The action as reported by the host, before normalization.
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub(crate) fn recheck_after_validation(&self) -> bool {
        self.recheck_after_validation
    }

    /// What a policy for this view is built from.
    pub fn scope(&self) -> Scope {
        Scope {
            request: Arc::clone(&self.request),
            view: ViewInfo {
                name: self.name,
                action: self.action.clone(),
            },
        }
    }

    /// The policy for this request, built on first access.
    ///
    /// Fails with [`Error::ImproperlyConfigured`] when the view has neither a
    /// policy class nor an injected policy.
    pub fn policy(&self) -> Result<&P> {
        self.policy.get_or_try_init(|| {
            let class = self.policy_class.as_ref().ok_or_else(|| {
                Error::ImproperlyConfigured(format!(
                    "view \"{}\" has no policy class; set one with `View::policy_class` \
                     or provide an instance with `View::with_policy`",
                    self.name
                ))
            })?;
            tracing::debug!(view = self.name, action = %self.action, "building policy");
            Ok::<_, Error>(class(self.scope()))
        })
    }

    /// Permission objects in the order they are checked.
    pub fn permissions(&self) -> impl Iterator<Item = &dyn Permission<P>> + '_ {
        self.permissions
            .iter()
            .map(|permission| permission.as_ref() as &dyn Permission<P>)
            .chain(std::iter::once(&self.dispatcher as &dyn Permission<P>))
    }

    /// The serializer to use: the view's own choice, else the policy's.
    ///
    /// Resolved once and cached on the view.
    pub fn get_serializer_class(&self) -> Result<Option<&'static str>> {
        self.resolved_serializer
            .get_or_try_init(|| -> Result<Option<&'static str>> {
                match self.serializer_class {
                    Some(serializer) => Ok(Some(serializer)),
                    None => Ok(self.policy()?.serializer_class()),
                }
            })
            .copied()
    }
}
