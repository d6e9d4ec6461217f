//! Request lifecycle on a [`View`]: checkpoints, object lookup and the
//! create/update/destroy flows.
//!
//! The flows mirror a typical model viewset:
//!
//! - `list`: global check, then the policy filters the queryset.
//! - `retrieve` / `destroy`: global check, filtered lookup, object check.
//! - `create`: global check, validation, `can_create_object`, save.
//! - `update`: global check, filtered lookup, object check (with
//!   `can_update_object(obj, false)`), validation,
//!   `can_update_object(obj, true)`, save.
//!
//! The validated pass asks every permission in the same order as the
//! checkpoints, host permissions first. It is skipped when
//! `Dispatch::recheck_after_validation` is off.

use crate::filter::{PolicyFilter, Queryset};
use crate::policy::Policy;
use crate::request::Request;
use crate::serializer::Serializer;
use crate::view::View;
use crate::{Error, Result};

impl<P: Policy> View<P> {
    /// Run the global checkpoint of every permission, in order.
    pub fn check_permissions(&self) -> Result<()> {
        for permission in self.permissions() {
            permission.has_permission(self)?;
        }
        Ok(())
    }

    /// Run the object checkpoint of every permission, in order.
    pub fn check_object_permissions(&self, obj: &P::Object) -> Result<()> {
        for permission in self.permissions() {
            permission.has_object_permission(self, obj)?;
        }
        Ok(())
    }

    /// Narrow `queryset` with the policy's mandatory filters.
    pub fn filter_queryset<Q>(&self, queryset: Q) -> Result<Q>
    where
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
    {
        PolicyFilter.filter_queryset(self, queryset)
    }

    /// Fetch an object with `fetch` and run the object checkpoint on it.
    pub fn get_object<F>(&self, fetch: F) -> Result<P::Object>
    where
        F: FnOnce(&Request) -> Result<P::Object>,
    {
        let obj = fetch(self.request())?;
        self.check_object_permissions(&obj)?;
        Ok(obj)
    }

    /// Look an object up in the filtered queryset and run the object
    /// checkpoint on it. Objects hidden by the policy filters are `NotFound`.
    pub fn get_object_from<Q, L>(&self, queryset: Q, lookup: L) -> Result<P::Object>
    where
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
        L: Fn(&P::Object) -> bool,
    {
        let queryset = self.filter_queryset(queryset)?;
        let obj = Queryset::get(queryset, lookup)
            .ok_or_else(|| Error::NotFound(format!("no matching object for {}", self.name())))?;
        self.check_object_permissions(&obj)?;
        Ok(obj)
    }

    /// Run the validated create check of every permission, then save.
    pub fn perform_create<S>(&self, serializer: S) -> Result<P::Object>
    where
        S: Serializer<Object = P::Object>,
    {
        if self.recheck_after_validation() {
            for permission in self.permissions() {
                permission.has_create_permission(self, &serializer)?;
            }
        }
        serializer.save()
    }

    /// Run the validated object check of every permission on the not yet
    /// persisted instance, then save.
    pub fn perform_update<S>(&self, serializer: S) -> Result<P::Object>
    where
        S: Serializer<Object = P::Object>,
    {
        if self.recheck_after_validation() {
            let instance = serializer.instance().ok_or_else(|| {
                Error::Internal(format!("update serializer for {} has no instance", self.name()))
            })?;
            for permission in self.permissions() {
                permission.has_validated_object_permission(self, instance)?;
            }
        }
        serializer.save()
    }

    pub fn list<Q>(&self, queryset: Q) -> Result<Q>
    where
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
    {
        self.check_permissions()?;
        self.filter_queryset(queryset)
    }

    pub fn retrieve<Q, L>(&self, queryset: Q, lookup: L) -> Result<P::Object>
    where
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
        L: Fn(&P::Object) -> bool,
    {
        self.check_permissions()?;
        self.get_object_from(queryset, lookup)
    }

    pub fn create<S>(&self, mut serializer: S) -> Result<P::Object>
    where
        S: Serializer<Object = P::Object>,
    {
        self.check_permissions()?;
        serializer.validate()?;
        self.perform_create(serializer)
    }

    /// Update flow. `bind` pairs the fetched object with the request input;
    /// the object checkpoint runs before the input is validated.
    pub fn update<Q, L, S, B>(&self, queryset: Q, lookup: L, bind: B) -> Result<P::Object>
    where
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
        L: Fn(&P::Object) -> bool,
        S: Serializer<Object = P::Object>,
        B: FnOnce(P::Object) -> S,
    {
        self.check_permissions()?;
        let obj = self.get_object_from(queryset, lookup)?;
        let mut serializer = bind(obj);
        serializer.validate()?;
        self.perform_update(serializer)
    }

    pub fn destroy<Q, L, D>(&self, queryset: Q, lookup: L, delete: D) -> Result<()>
    where
        Q: Queryset<Item = P::Object, Filter = P::Filter>,
        L: Fn(&P::Object) -> bool,
        D: FnOnce(P::Object) -> Result<()>,
    {
        self.check_permissions()?;
        let obj = self.get_object_from(queryset, lookup)?;
        delete(obj)
    }
}
