//! Rules: predicates that decide one field's validity from the whole form state.
//!
//! Any `Fn(&S) -> bool` closure is a rule. Rules that can fail to reach a
//! verdict (parsing, lookups) are wrapped with [`fallible`] so their errors
//! reach the caller as [`EngineError::RuleEvaluation`](crate::EngineError::RuleEvaluation).

use std::fmt;

use crate::error::BoxError;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A validation rule over a form state of type `S`.
///
/// Rules must be deterministic and free of side effects: the engine may
/// evaluate the same rule many times against the same snapshot.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::Rule;
///
/// struct Signup {
///     name: String,
/// }
///
/// let name_required = |s: &Signup| !s.name.is_empty();
/// assert!(!name_required.evaluate(&Signup { name: String::new() }).unwrap());
/// ```
pub trait Rule<S: ?Sized> {
    /// Evaluates the rule against `state`.
    fn evaluate(&self, state: &S) -> Result<bool, BoxError>;
}

impl<S, F> Rule<S> for F
where
    S: ?Sized,
    F: Fn(&S) -> bool,
{
    #[inline]
    fn evaluate(&self, state: &S) -> Result<bool, BoxError> {
        Ok(self(state))
    }
}

/// Type-erased rule, as stored by the engine.
pub type BoxRule<S> = Box<dyn Rule<S>>;

// ============================================================================
// FALLIBLE ADAPTER
// ============================================================================

/// Adapter turning a `Fn(&S) -> Result<bool, E>` closure into a [`Rule`].
///
/// Created by [`fallible`].
#[derive(Clone, Copy)]
pub struct Fallible<F> {
    check: F,
}

impl<F> Fallible<F> {
    /// Returns the wrapped closure.
    pub fn into_inner(self) -> F {
        self.check
    }
}

impl<F> fmt::Debug for Fallible<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallible")
            .field("check", &"<function>")
            .finish()
    }
}

impl<S, F, E> Rule<S> for Fallible<F>
where
    S: ?Sized,
    F: Fn(&S) -> Result<bool, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    fn evaluate(&self, state: &S) -> Result<bool, BoxError> {
        (self.check)(state).map_err(Into::into)
    }
}

/// Wraps a closure that may fail to decide validity.
///
/// # Examples
///
/// ```rust
/// use formcheck_validator::{Rule, fallible};
///
/// let adult = fallible(|age: &str| age.parse::<u32>().map(|n| n >= 18));
/// assert!(adult.evaluate("21").unwrap());
/// assert!(adult.evaluate("twenty").is_err());
/// ```
pub fn fallible<F>(check: F) -> Fallible<F> {
    Fallible { check }
}
