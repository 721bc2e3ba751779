//! Payload validation.
//!
//! Payload types implement [`Validate`] by hand and report failures as a
//! field → message map, which handlers return as the `details` of a 400
//! response.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A payload that can check its own field constraints.
///
/// # Example
///
/// ```rust
/// use restpack_extract::{Validate, ValidationErrors};
///
/// struct Rename {
///     name: String,
/// }
///
/// impl Validate for Rename {
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         let mut errors = ValidationErrors::new();
///         if self.name.is_empty() {
///             errors.required("name");
///         }
///         errors.into_result()
///     }
/// }
///
/// let err = Rename { name: String::new() }.validate().unwrap_err();
/// assert_eq!(err.get("name"), Some("'name' is required"));
/// ```
pub trait Validate {
    /// Returns every violated constraint, or `Ok(())`.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`. The first message per field is kept.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Records a missing required field.
    pub fn required(&mut self, field: &str) {
        self.add(field, format!("'{field}' is required"));
    }

    /// Records a value below its minimum.
    pub fn below_min(&mut self, field: &str) {
        self.add(field, format!("'{field}' is less than the required minimum"));
    }

    /// Records a value above its maximum.
    pub fn above_max(&mut self, field: &str) {
        self.add(field, format!("'{field}' is greater than the required maximum"));
    }

    /// Returns the message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns true if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Converts to a JSON object for use as error `details`.
    #[must_use]
    pub fn to_details(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, message) in self.fields.values().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
