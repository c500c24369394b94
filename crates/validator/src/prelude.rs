//! Prelude module for convenient imports.
//!
//! `use formcheck_validator::prelude::*;` brings in the engine, its builder,
//! the rule trait and adapters, and the error and snapshot types.

pub use crate::config::{DuplicatePolicy, EngineConfig, EngineOptions};
pub use crate::engine::{Phase, ValidationEngine, ValidationEngineBuilder};
pub use crate::error::EngineError;
pub use crate::field::{FieldId, FieldStatus};
pub use crate::rule::{BoxRule, Rule, fallible};
pub use crate::snapshot::Validations;
