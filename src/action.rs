//! Logical action names and hook-name derivation.
//!
//! The host names the operation a view is performing (`"list"`,
//! `"partial_update"`, `"archive"`, ...). Hooks are looked up by the
//! *normalized* name, where a partial update is just an update.

use std::fmt;

/// The logical operation a view is performing for the current request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    /// Application-defined action such as `"archive"`.
    Custom(String),
    /// The view carries no action.
    Unknown,
}

/// Name used for hook lookup when the view has no action.
pub const UNKNOWN: &str = "unknown";

impl Action {
    /// Parse the host's action attribute.
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            None | Some("") | Some(UNKNOWN) => Action::Unknown,
            Some("list") => Action::List,
            Some("retrieve") => Action::Retrieve,
            Some("create") => Action::Create,
            Some("update") => Action::Update,
            Some("partial_update") => Action::PartialUpdate,
            Some("destroy") => Action::Destroy,
            Some(other) => Action::Custom(other.to_string()),
        }
    }

    /// Collapse aliases that share hooks.
    ///
    /// A `Custom` name that spells a standard action (or nothing) is
    /// re-parsed first, so `Custom("partial_update")` still maps to `Update`.
    pub fn normalize(&self) -> Action {
        let parsed = match self {
            Action::Custom(name) => Action::parse(Some(name.as_str())),
            other => other.clone(),
        };
        match parsed {
            Action::PartialUpdate => Action::Update,
            other => other,
        }
    }

    /// The raw action name, before normalization.
    pub fn as_str(&self) -> &str {
        match self {
            Action::List => "list",
            Action::Retrieve => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
            Action::Custom(name) => name,
            Action::Unknown => UNKNOWN,
        }
    }

    /// Global hook name, e.g. `can_update` for a partial update.
    pub fn hook_name(&self) -> String {
        format!("can_{}", self.normalize().as_str())
    }

    /// Object hook name, e.g. `can_update_object` for a partial update.
    pub fn object_hook_name(&self) -> String {
        format!("can_{}_object", self.normalize().as_str())
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Action::parse(Some(name))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
