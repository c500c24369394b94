//! Error types for engine configuration and rule evaluation.

use crate::field::FieldId;

/// Boxed error produced by a fallible rule.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`ValidationEngine`](crate::ValidationEngine) operations.
///
/// None of these are transient: retrying the same call yields the same error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A rule was registered under a malformed field id.
    #[error("invalid field id {id:?}: {reason}")]
    Configuration {
        /// The rejected id, verbatim.
        id: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A rule was registered twice under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    #[error("a rule is already registered for field `{0}`")]
    DuplicateRule(FieldId),

    /// An operation referenced a field with no registered rule.
    #[error("no rule is registered for field `{0}`")]
    UnknownField(String),

    /// A fallible rule failed instead of producing a verdict.
    #[error("rule for field `{field}` failed to evaluate: {source}")]
    RuleEvaluation {
        /// Field whose rule failed.
        field: FieldId,
        /// Error returned by the rule.
        #[source]
        source: BoxError,
    },
}

impl EngineError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::DuplicateRule(_) => "duplicate_rule",
            Self::UnknownField(_) => "unknown_field",
            Self::RuleEvaluation { .. } => "rule_evaluation",
        }
    }

    /// Field id the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Configuration { id, .. } => id,
            Self::DuplicateRule(field) | Self::RuleEvaluation { field, .. } => field.as_str(),
            Self::UnknownField(field) => field,
        }
    }
}
