//! Serializer seam.
//!
//! Validation and persistence belong to the host; the view lifecycle only
//! needs to validate, look at the bound instance and save.

use crate::Result;

/// Input validation and persistence for one object.
pub trait Serializer {
    type Object;

    /// Validate the input. For an update serializer, a successful call
    /// applies the validated fields to the bound instance in memory.
    fn validate(&mut self) -> Result<()>;

    /// The bound instance. `None` for a create serializer.
    fn instance(&self) -> Option<&Self::Object>;

    /// Persist and return the saved object.
    fn save(self) -> Result<Self::Object>
    where
        Self: Sized;
}
