//! Engine configuration and lifecycle callbacks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::FieldId;

// ============================================================================
// CONFIG
// ============================================================================

/// What to do when a rule is registered under an id that already has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`EngineError::DuplicateRule`](crate::EngineError::DuplicateRule).
    #[default]
    Reject,
    /// Swap the rule in place and reset the field to its pristine status.
    ///
    /// The field keeps its position in evaluation order.
    Replace,
}

/// Serializable engine settings.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::{DuplicatePolicy, EngineConfig};
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "duplicate_policy": "replace" }"#).unwrap();
/// assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
///
/// let defaults: EngineConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(defaults, EngineConfig::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Collision handling for `add_rule`, `add_rules` and construction.
    pub duplicate_policy: DuplicatePolicy,
}

impl EngineConfig {
    /// Sets the duplicate policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

// ============================================================================
// CALLBACKS
// ============================================================================

type RevalidatedHook = Box<dyn FnMut()>;
type ChangedHook = Box<dyn FnMut(&FieldId)>;

/// Settings plus the two lifecycle callbacks.
///
/// Both callbacks default to no-ops.
#[derive(Default)]
pub struct EngineOptions {
    pub(crate) config: EngineConfig,
    on_field_revalidated: Option<RevalidatedHook>,
    on_validation_changed: Option<ChangedHook>,
}

impl EngineOptions {
    /// Creates options with default settings and no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the settings.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Called after every `validate_field` (narrow or cascaded) and after
    /// `reset_validation`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_on_field_revalidated(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_field_revalidated = Some(Box::new(hook));
        self
    }

    /// Called once for each field whose displayed validity flips during a pass.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_on_validation_changed(mut self, hook: impl FnMut(&FieldId) + 'static) -> Self {
        self.on_validation_changed = Some(Box::new(hook));
        self
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn field_revalidated(&mut self) {
        if let Some(hook) = self.on_field_revalidated.as_mut() {
            hook();
        }
    }

    pub(crate) fn validation_changed(&mut self, field: &FieldId) {
        if let Some(hook) = self.on_validation_changed.as_mut() {
            hook(field);
        }
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hook = |set: bool| if set { "<function>" } else { "<none>" };
        f.debug_struct("EngineOptions")
            .field("config", &self.config)
            .field("on_field_revalidated", &hook(self.on_field_revalidated.is_some()))
            .field("on_validation_changed", &hook(self.on_validation_changed.is_some()))
            .finish()
    }
}
