//! Sign-up form driven by formcheck-validator.
//!
//! Simulates a user typing into a sign-up form, submitting it too early,
//! fixing the errors and submitting again. Run with
//! `RUST_LOG=formcheck_validator=trace` to see the engine's events.

use std::sync::LazyLock;

use formcheck_validator::prelude::*;
use regex::Regex;
use tracing_subscriber::EnvFilter;

const MINIMUM_PASSWORD_LENGTH: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@<>()\[\],;:]+@([A-Za-z0-9-]+\.)+[A-Za-z]{2,}$").expect("valid email regex")
});

#[derive(Debug, Default)]
struct Signup {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    verify_password: String,
}

fn build_engine() -> Result<ValidationEngine<Signup>, EngineError> {
    ValidationEngine::builder()
        .rule("firstNameRequired", |s: &Signup| !s.first_name.is_empty())
        .rule("lastNameRequired", |s: &Signup| !s.last_name.is_empty())
        .rule("emailRequired", |s: &Signup| !s.email.is_empty())
        .rule("emailRegex", |s: &Signup| s.email.is_empty() || EMAIL.is_match(&s.email))
        .rule("passwordRequired", |s: &Signup| !s.password.is_empty())
        .rule("passwordLength", |s: &Signup| {
            s.password.is_empty() || s.password.chars().count() >= MINIMUM_PASSWORD_LENGTH
        })
        .rule("verifyPasswordRequired", |s: &Signup| !s.verify_password.is_empty())
        .rule("verifyPasswordMatches", |s: &Signup| {
            s.verify_password.is_empty() || s.verify_password == s.password
        })
        .on_validation_changed(|field| println!("  ~ {field} changed"))
        .build()
}

fn render(validations: &Validations) {
    let json = serde_json::to_string_pretty(validations).unwrap_or_default();
    println!("{json}");
}

fn submit(engine: &mut ValidationEngine<Signup>, state: &Signup) -> Result<(), EngineError> {
    println!("> submit");
    let validations = engine.validate_form(state)?;
    render(&validations);
    if validations.form_valid() {
        println!("Submitting form for {} {}", state.first_name, state.last_name);
    } else {
        let blocked: Vec<&str> = validations.invalid_fields().map(FieldId::as_str).collect();
        println!("Submit blocked by: {}", blocked.join(", "));
    }
    Ok(())
}

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut engine = build_engine()?;
    let mut state = Signup::default();

    println!("> initial render");
    render(&engine.validations());

    // Typing before the first submit never surfaces errors.
    state.email = "ada@".into();
    engine.validate_field(&state, "emailRequired")?;
    engine.validate_field(&state, "emailRegex")?;

    submit(&mut engine, &state)?;

    // After a failed submit every keystroke re-checks the whole form.
    state.first_name = "Ada".into();
    engine.validate_field(&state, "firstNameRequired")?;
    state.last_name = "Lovelace".into();
    engine.validate_field(&state, "lastNameRequired")?;
    state.email = "ada@example.com".into();
    engine.validate_field(&state, "emailRegex")?;
    state.password = "engine".into();
    engine.validate_field(&state, "passwordLength")?;
    state.verify_password = "engine".into();
    engine.validate_field(&state, "verifyPasswordMatches")?;

    submit(&mut engine, &state)?;

    engine.reset_validation();
    println!("> after reset");
    render(&engine.validations());
    Ok(())
}
