//! The validation engine: rule registry plus the pristine/validated state machine.
//!
//! # Lifecycle
//!
//! A fresh engine is [`Phase::Pristine`]: every field reports itself as valid
//! so nothing is flagged before the user submits. The first
//! [`validate_form`](ValidationEngine::validate_form) moves it to
//! [`Phase::Validated`], where displayed validity equals the rule outcome.
//! Only [`reset_validation`](ValidationEngine::reset_validation) goes back.
//!
//! While the form is invalid, every
//! [`validate_field`](ValidationEngine::validate_field) re-checks the whole
//! form so errors clear everywhere as soon as they are fixed. While the form
//! is valid, `validate_field` only touches the named field and leaves
//! `form_valid` alone; it can read `true` while an untouched field would now
//! fail, until the next full pass.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::{DuplicatePolicy, EngineConfig, EngineOptions};
use crate::error::EngineError;
use crate::field::{FieldId, FieldStatus};
use crate::rule::{BoxRule, Rule};
use crate::snapshot::Validations;

/// Which side of the error-masking boundary the engine is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No full validation yet; all fields display as valid.
    Pristine,
    /// At least one full validation since construction or reset.
    Validated,
}

struct Registered<S: ?Sized> {
    rule: BoxRule<S>,
    status: FieldStatus,
}

impl<S: ?Sized> Registered<S> {
    fn new(rule: BoxRule<S>) -> Self {
        Self {
            rule,
            status: FieldStatus::PRISTINE,
        }
    }

    /// Stores a new outcome, returning whether the displayed validity flipped.
    fn record(&mut self, really_valid: bool, form_has_been_validated: bool) -> bool {
        let previous = self.status.display_valid;
        self.status = FieldStatus::evaluated(really_valid, form_has_been_validated);
        previous != self.status.display_valid
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Rule-driven validator for a form whose state has type `S`.
///
/// The engine never holds on to the form state: each call borrows it for
/// the duration of the rule evaluations and returns plain booleans or a
/// [`Validations`] snapshot for the caller to merge into its own state.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::ValidationEngine;
///
/// struct Signup {
///     name: String,
/// }
///
/// let mut engine: ValidationEngine<Signup> = ValidationEngine::builder()
///     .rule("name", |s: &Signup| !s.name.is_empty())
///     .build()
///     .unwrap();
///
/// assert!(engine.validations().form_valid());
///
/// let submitted = engine.validate_form(&Signup { name: String::new() }).unwrap();
/// assert_eq!(submitted.field("name"), Some(false));
///
/// // The form is invalid, so this re-checks every field.
/// let fixed = Signup { name: "Ada".into() };
/// assert!(engine.validate_field(&fixed, "name").unwrap());
/// assert!(engine.form_valid());
/// ```
pub struct ValidationEngine<S: ?Sized> {
    fields: IndexMap<FieldId, Registered<S>>,
    form_valid: bool,
    form_has_been_validated: bool,
    options: EngineOptions,
}

impl<S: ?Sized> ValidationEngine<S> {
    /// Creates an engine from `(field, rule)` pairs with default options.
    pub fn new<I, K>(rules: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (K, BoxRule<S>)>,
        K: Into<String>,
    {
        Self::with_options(rules, EngineOptions::default())
    }

    /// Creates an engine from `(field, rule)` pairs and explicit options.
    pub fn with_options<I, K>(rules: I, options: EngineOptions) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (K, BoxRule<S>)>,
        K: Into<String>,
    {
        let mut engine = Self {
            fields: IndexMap::new(),
            form_valid: true,
            form_has_been_validated: false,
            options,
        };
        for (id, rule) in rules {
            engine.insert(FieldId::new(id)?, rule)?;
        }
        debug!(fields = engine.fields.len(), "validation engine created");
        Ok(engine)
    }

    /// Starts a fluent builder.
    pub fn builder() -> ValidationEngineBuilder<S> {
        ValidationEngineBuilder::default()
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Re-validates one field after its input changed.
    ///
    /// If the form is currently invalid this runs a full
    /// [`validate_form`](Self::validate_form) instead. Either way
    /// `on_field_revalidated` fires afterwards. Returns the field's displayed
    /// validity.
    pub fn validate_field(&mut self, state: &S, field: &str) -> Result<bool, EngineError> {
        if self.form_valid {
            let validated = self.form_has_been_validated;
            let Some((_, id, entry)) = self.fields.get_full_mut(field) else {
                return Err(EngineError::UnknownField(field.to_owned()));
            };
            let really_valid = evaluate(id, entry, state)?;
            if entry.record(really_valid, validated) {
                trace!(field = %id, display_valid = entry.status.display_valid, "field validity changed");
                self.options.validation_changed(id);
            }
        } else {
            if !self.fields.contains_key(field) {
                return Err(EngineError::UnknownField(field.to_owned()));
            }
            debug!(%field, "form is invalid, revalidating every field");
            self.validate_form(state)?;
        }

        self.options.field_revalidated();
        self.display_valid(field)
            .ok_or_else(|| EngineError::UnknownField(field.to_owned()))
    }

    /// Evaluates every rule in registration order and returns the new snapshot.
    ///
    /// Afterwards the engine is [`Phase::Validated`], `form_valid` is the
    /// conjunction of all rule outcomes, and `on_validation_changed` has fired
    /// once per field whose displayed validity flipped.
    ///
    /// Every rule is evaluated before any status is written, so a rule error
    /// leaves the engine exactly as it was.
    pub fn validate_form(&mut self, state: &S) -> Result<Validations, EngineError> {
        let outcomes = self
            .fields
            .iter()
            .map(|(id, entry)| evaluate(id, entry, state))
            .collect::<Result<Vec<_>, _>>()?;

        self.form_has_been_validated = true;
        let mut form_valid = true;
        for ((id, entry), really_valid) in self.fields.iter_mut().zip(outcomes) {
            form_valid &= really_valid;
            if entry.record(really_valid, true) {
                trace!(field = %id, display_valid = really_valid, "field validity changed");
                self.options.validation_changed(id);
            }
        }
        self.form_valid = form_valid;

        debug!(form_valid, fields = self.fields.len(), "form validated");
        Ok(self.validations())
    }

    /// Returns the engine to its freshly constructed state.
    ///
    /// Rules are kept. `on_field_revalidated` fires once.
    pub fn reset_validation(&mut self) {
        self.form_valid = true;
        self.form_has_been_validated = false;
        for entry in self.fields.values_mut() {
            entry.status = FieldStatus::PRISTINE;
        }
        debug!("validation reset");
        self.options.field_revalidated();
    }

    // ------------------------------------------------------------------------
    // Rule registry
    // ------------------------------------------------------------------------

    /// Registers a rule after construction.
    ///
    /// Collisions follow the configured [`DuplicatePolicy`].
    pub fn add_rule<R>(&mut self, field: impl Into<String>, rule: R) -> Result<(), EngineError>
    where
        R: Rule<S> + 'static,
    {
        self.insert(FieldId::new(field)?, Box::new(rule))
    }

    /// Registers several rules at once.
    ///
    /// The batch is checked up front: if any id is malformed or, under
    /// [`DuplicatePolicy::Reject`], collides with an existing rule or with
    /// another id in the batch, nothing is registered.
    pub fn add_rules<I, K>(&mut self, rules: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = (K, BoxRule<S>)>,
        K: Into<String>,
    {
        let batch = rules
            .into_iter()
            .map(|(id, rule)| FieldId::new(id).map(|id| (id, rule)))
            .collect::<Result<Vec<_>, _>>()?;

        if self.options.config.duplicate_policy == DuplicatePolicy::Reject {
            let mut seen = HashSet::with_capacity(batch.len());
            for (id, _) in &batch {
                if self.fields.contains_key(id) || !seen.insert(id) {
                    return Err(EngineError::DuplicateRule(id.clone()));
                }
            }
        }

        for (id, rule) in batch {
            self.insert(id, rule)?;
        }
        Ok(())
    }

    /// Removes a rule and its status. Unknown ids are ignored.
    ///
    /// Returns whether a rule was removed.
    pub fn remove_rule(&mut self, field: &str) -> bool {
        let removed = self.fields.shift_remove(field).is_some();
        if removed {
            debug!(%field, "rule removed");
        }
        removed
    }

    fn insert(&mut self, id: FieldId, rule: BoxRule<S>) -> Result<(), EngineError> {
        match self.fields.get_mut(&id) {
            None => {
                trace!(field = %id, "rule registered");
                self.fields.insert(id, Registered::new(rule));
                Ok(())
            }
            Some(entry) => match self.options.config.duplicate_policy {
                DuplicatePolicy::Reject => Err(EngineError::DuplicateRule(id)),
                DuplicatePolicy::Replace => {
                    debug!(field = %id, "rule replaced, status reset");
                    *entry = Registered::new(rule);
                    Ok(())
                }
            },
        }
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Current snapshot, without evaluating any rule.
    #[must_use]
    pub fn validations(&self) -> Validations {
        let fields = self
            .fields
            .iter()
            .map(|(id, entry)| (id.clone(), entry.status.display_valid))
            .collect();
        Validations::new(self.form_valid, fields)
    }

    /// Whether the form is valid as of the last pass.
    #[must_use]
    pub fn form_valid(&self) -> bool {
        self.form_valid
    }

    /// Whether a full validation has run since construction or reset.
    #[must_use]
    pub fn has_been_validated(&self) -> bool {
        self.form_has_been_validated
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.form_has_been_validated {
            Phase::Validated
        } else {
            Phase::Pristine
        }
    }

    /// Both validity flags of `field`, or `None` if it is not registered.
    #[must_use]
    pub fn field_status(&self, field: &str) -> Option<FieldStatus> {
        self.fields.get(field).map(|entry| entry.status)
    }

    /// Displayed validity of `field`, or `None` if it is not registered.
    #[must_use]
    pub fn display_valid(&self, field: &str) -> Option<bool> {
        self.field_status(field).map(|status| status.display_valid)
    }

    /// Registered field ids in evaluation order.
    pub fn field_ids(&self) -> impl Iterator<Item = &FieldId> + '_ {
        self.fields.keys()
    }

    /// Returns true if a rule is registered for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Engine settings.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.options.config()
    }
}

fn evaluate<S: ?Sized>(
    id: &FieldId,
    entry: &Registered<S>,
    state: &S,
) -> Result<bool, EngineError> {
    entry
        .rule
        .evaluate(state)
        .map_err(|source| EngineError::RuleEvaluation {
            field: id.clone(),
            source,
        })
}

impl<S: ?Sized> fmt::Debug for ValidationEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let statuses: IndexMap<&FieldId, FieldStatus> = self
            .fields
            .iter()
            .map(|(id, entry)| (id, entry.status))
            .collect();
        f.debug_struct("ValidationEngine")
            .field("form_valid", &self.form_valid)
            .field("form_has_been_validated", &self.form_has_been_validated)
            .field("fields", &statuses)
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent construction for [`ValidationEngine`].
///
/// Ids are checked in [`build`](Self::build), so the first malformed or
/// duplicate id is reported there.
pub struct ValidationEngineBuilder<S: ?Sized> {
    rules: Vec<(String, BoxRule<S>)>,
    options: EngineOptions,
}

impl<S: ?Sized> Default for ValidationEngineBuilder<S> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            options: EngineOptions::default(),
        }
    }
}

impl<S: ?Sized> ValidationEngineBuilder<S> {
    /// Adds a rule for `field`.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule<R>(mut self, field: impl Into<String>, rule: R) -> Self
    where
        R: Rule<S> + 'static,
    {
        self.rules.push((field.into(), Box::new(rule)));
        self
    }

    /// Replaces the engine settings.
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.options = self.options.with_config(config);
        self
    }

    /// Sets the callback fired after every field revalidation and reset.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_field_revalidated(mut self, hook: impl FnMut() + 'static) -> Self {
        self.options = self.options.with_on_field_revalidated(hook);
        self
    }

    /// Sets the callback fired for each field whose displayed validity flips.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_validation_changed(mut self, hook: impl FnMut(&FieldId) + 'static) -> Self {
        self.options = self.options.with_on_validation_changed(hook);
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Result<ValidationEngine<S>, EngineError> {
        ValidationEngine::with_options(self.rules, self.options)
    }
}

impl<S: ?Sized> fmt::Debug for ValidationEngineBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.rules.iter().map(|(id, _)| id.as_str()).collect();
        f.debug_struct("ValidationEngineBuilder")
            .field("rules", &ids)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Form {
        name: String,
        email: String,
    }

    fn engine() -> ValidationEngine<Form> {
        ValidationEngine::builder()
            .rule("name", |s: &Form| !s.name.is_empty())
            .rule("email", |s: &Form| s.email.contains('@'))
            .build()
            .unwrap()
    }

    #[test]
    fn starts_pristine() {
        let engine = engine();
        assert_eq!(engine.phase(), Phase::Pristine);
        assert!(engine.form_valid());
        assert_eq!(engine.field_status("name"), Some(FieldStatus::PRISTINE));
        let ids: Vec<&str> = engine.field_ids().map(FieldId::as_str).collect();
        assert_eq!(ids, ["name", "email"]);
    }

    #[test]
    fn new_accepts_boxed_pairs() {
        let name: BoxRule<Form> = Box::new(|s: &Form| !s.name.is_empty());
        let email: BoxRule<Form> = Box::new(|s: &Form| !s.email.is_empty());
        let rules = vec![("name", name), ("email", email)];
        let engine = ValidationEngine::new(rules).unwrap();
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn pristine_field_validation_is_masked() {
        let mut engine = engine();
        assert!(engine.validate_field(&Form::default(), "name").unwrap());
        assert_eq!(
            engine.field_status("name"),
            Some(FieldStatus {
                really_valid: false,
                display_valid: true
            })
        );
        assert_eq!(engine.phase(), Phase::Pristine);
    }

    #[test]
    fn validate_form_moves_to_validated() {
        let mut engine = engine();
        let snapshot = engine.validate_form(&Form::default()).unwrap();
        assert_eq!(engine.phase(), Phase::Validated);
        assert!(!snapshot.form_valid());
        assert_eq!(snapshot.field("name"), Some(false));
        assert_eq!(snapshot.field("email"), Some(false));
    }

    #[test]
    fn unknown_field_is_rejected_in_both_paths() {
        let mut engine = engine();
        let err = engine.validate_field(&Form::default(), "age").unwrap_err();
        assert!(matches!(err, EngineError::UnknownField(ref f) if f == "age"));

        engine.validate_form(&Form::default()).unwrap();
        assert!(!engine.form_valid());
        let err = engine.validate_field(&Form::default(), "age").unwrap_err();
        assert!(matches!(err, EngineError::UnknownField(_)));
    }

    #[test]
    fn replace_policy_resets_status_in_place() {
        let mut engine = ValidationEngine::builder()
            .config(EngineConfig::default().with_duplicate_policy(DuplicatePolicy::Replace))
            .rule("name", |s: &Form| !s.name.is_empty())
            .rule("email", |s: &Form| s.email.contains('@'))
            .build()
            .unwrap();
        engine.validate_form(&Form::default()).unwrap();

        engine.add_rule("name", |_: &Form| true).unwrap();
        assert_eq!(engine.field_status("name"), Some(FieldStatus::PRISTINE));
        assert!(!engine.field_status("email").unwrap().display_valid);
        let ids: Vec<&str> = engine.field_ids().map(FieldId::as_str).collect();
        assert_eq!(ids, ["name", "email"]);
    }

    #[test]
    fn debug_lists_statuses() {
        let text = format!("{:?}", engine());
        assert!(text.contains("form_valid: true"));
        assert!(text.contains("\"name\""));
    }
}
