//! # formcheck-validator
//!
//! A framework-agnostic, rule-driven form validation engine.
//!
//! Each field of a form gets a [`Rule`]: a predicate over the whole form
//! state. The [`ValidationEngine`] tracks per-field and whole-form validity,
//! masking errors until the form has been submitted once, and switches from
//! narrow per-keystroke checks to full re-validation once the form has failed.
//!
//! ## Quick Start
//!
//! ```rust
//! use formcheck_validator::prelude::*;
//!
//! struct Login {
//!     email: String,
//!     password: String,
//! }
//!
//! let mut engine: ValidationEngine<Login> = ValidationEngine::builder()
//!     .rule("emailRequired", |s: &Login| !s.email.is_empty())
//!     .rule("passwordLength", |s: &Login| s.password.len() >= 8)
//!     .build()?;
//!
//! let state = Login { email: "ada@example.com".into(), password: "short".into() };
//!
//! // Nothing is flagged until the first submit.
//! assert!(engine.validate_field(&state, "passwordLength")?);
//!
//! let validations = engine.validate_form(&state)?;
//! assert!(!validations.form_valid());
//! assert_eq!(validations.field("passwordLength"), Some(false));
//! # Ok::<(), EngineError>(())
//! ```
//!
//! ## Rendering contract
//!
//! [`Validations`] serializes to `{"formValid": bool, "<field>Valid": bool, ...}`,
//! the flat shape a presentation layer merges into its own state.

pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod prelude;
pub mod rule;
pub mod snapshot;

pub use config::{DuplicatePolicy, EngineConfig, EngineOptions};
pub use engine::{Phase, ValidationEngine, ValidationEngineBuilder};
pub use error::{BoxError, EngineError};
pub use field::{FieldId, FieldStatus};
pub use rule::{BoxRule, Fallible, Rule, fallible};
pub use snapshot::Validations;
