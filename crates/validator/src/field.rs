//! Field identifiers and per-field validation status.
//!
//! Every rule registered with a [`ValidationEngine`](crate::ValidationEngine)
//! is keyed by a [`FieldId`]. Ids are checked once at registration time so the
//! rest of the engine can treat them as opaque, well-formed keys.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Id reserved for the form-level flag in a [`Validations`](crate::Validations)
/// snapshot. A field with this id would produce a second `formValid` key.
pub const RESERVED_FORM_ID: &str = "form";

/// Suffix appended to a field id to build its snapshot key.
pub const VALIDITY_SUFFIX: &str = "Valid";

// ============================================================================
// FIELD ID
// ============================================================================

/// Identifier of a validated field, unique within one engine.
///
/// A valid id is non-empty, contains no whitespace or control characters,
/// and is not the reserved id `form`.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::FieldId;
///
/// let id = FieldId::new("passwordRequired").unwrap();
/// assert_eq!(id.validity_key(), "passwordRequiredValid");
/// assert!(FieldId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldId(String);

impl FieldId {
    /// Creates a field id, rejecting empty or malformed names.
    pub fn new(id: impl Into<String>) -> Result<Self, EngineError> {
        let id = id.into();
        if let Some(reason) = Self::problem(&id) {
            return Err(EngineError::Configuration { id, reason });
        }
        Ok(Self(id))
    }

    fn problem(id: &str) -> Option<&'static str> {
        if id.is_empty() {
            Some("field id must not be empty")
        } else if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("field id must not contain whitespace or control characters")
        } else if id == RESERVED_FORM_ID {
            Some("`form` is reserved for the form-level flag")
        } else {
            None
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key this field uses in a serialized snapshot, e.g. `nameValid`.
    #[must_use]
    pub fn validity_key(&self) -> String {
        format!("{}{VALIDITY_SUFFIX}", self.0)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldId {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldId {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.0
    }
}

impl PartialEq<str> for FieldId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// FIELD STATUS
// ============================================================================

/// Validity of a single field.
///
/// `display_valid` is what the presentation layer should render. It stays
/// `true` until the whole form has been validated once, so a user is not
/// shown errors for fields they have not reached yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatus {
    /// Result of the most recent rule evaluation.
    pub really_valid: bool,
    /// Validity exposed for rendering.
    pub display_valid: bool,
}

impl FieldStatus {
    /// Status of a field that has never been evaluated.
    pub const PRISTINE: Self = Self {
        really_valid: false,
        display_valid: true,
    };

    /// Status after an evaluation, masked while the form is still pristine.
    #[must_use]
    pub fn evaluated(really_valid: bool, form_has_been_validated: bool) -> Self {
        Self {
            really_valid,
            display_valid: !form_has_been_validated || really_valid,
        }
    }
}

impl Default for FieldStatus {
    fn default() -> Self {
        Self::PRISTINE
    }
}
