//! The validations snapshot handed back to the presentation layer.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::field::FieldId;

/// Key of the form-level flag in a serialized snapshot.
pub const FORM_VALID_KEY: &str = "formValid";

/// Point-in-time copy of the engine's displayed validity.
///
/// Holds `form_valid` plus one display flag per registered field, in
/// registration order. The snapshot is detached from the engine: later
/// validation passes do not change it.
///
/// Serializes to the flat object the presentation layer merges into its own
/// state:
///
/// ```json
/// { "formValid": false, "nameValid": false, "emailValid": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validations {
    form_valid: bool,
    fields: IndexMap<FieldId, bool>,
}

impl Validations {
    pub(crate) fn new(form_valid: bool, fields: IndexMap<FieldId, bool>) -> Self {
        Self { form_valid, fields }
    }

    /// Whether the form as a whole is valid.
    #[must_use]
    pub fn form_valid(&self) -> bool {
        self.form_valid
    }

    /// Display validity of `field`, or `None` if it was not registered.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<bool> {
        self.fields.get(field).copied()
    }

    /// Iterates over `(field, display_valid)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, bool)> + '_ {
        self.fields.iter().map(|(id, valid)| (id, *valid))
    }

    /// Fields currently displayed as invalid, in registration order.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &FieldId> + '_ {
        self.iter().filter(|(_, valid)| !valid).map(|(id, _)| id)
    }

    /// Number of fields in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Validations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(FORM_VALID_KEY, &self.form_valid)?;
        for (id, valid) in &self.fields {
            map.serialize_entry(&id.validity_key(), valid)?;
        }
        map.end()
    }
}
