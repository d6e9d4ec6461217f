//! Queryset filtering driven by the policy.
//!
//! The policy is the single source of truth for which rows a request may
//! see. [`PolicyFilter`] asks it for mandatory predicates and applies all
//! of them before the view looks at any object.

use std::fmt;

use crate::Result;
use crate::policy::Policy;
use crate::view::View;

/// A collection the view reads objects from.
pub trait Queryset: Sized {
    type Item;
    type Filter;

    /// Keep only items matching every filter.
    fn filter(self, filters: Vec<Self::Filter>) -> Self;

    /// First item matching `lookup`.
    fn get<L>(self, lookup: L) -> Option<Self::Item>
    where
        L: Fn(&Self::Item) -> bool;
}

/// A boxed row predicate for in-memory querysets.
pub struct Predicate<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Predicate<T> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(predicate))
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

impl<T> Queryset for Vec<T> {
    type Item = T;
    type Filter = Predicate<T>;

    fn filter(mut self, filters: Vec<Predicate<T>>) -> Self {
        self.retain(|item| filters.iter().all(|filter| filter.matches(item)));
        self
    }

    fn get<L>(self, lookup: L) -> Option<T>
    where
        L: Fn(&T) -> bool,
    {
        self.into_iter().find(|item| lookup(item))
    }
}

/// Filter backend that narrows a queryset with the view's policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyFilter;

impl PolicyFilter {
    /// Apply the policy's mandatory filters to `queryset`.
    ///
    /// A view that cannot produce a policy is a configuration error, not a
    /// denial. A policy with no filters leaves the queryset untouched.
    pub fn filter_queryset<P, Q>(&self, view: &View<P>, queryset: Q) -> Result<Q>
    where
        P: Policy,
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
    {
        let policy = view.policy()?;
        let filters = policy.filter_queryset();
        if filters.is_empty() {
            return Ok(queryset);
        }

        tracing::debug!(view = view.name(), filters = filters.len(), "filtering queryset");
        Ok(queryset.filter(filters))
    }
}
