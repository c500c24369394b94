//! Property-based tests for formcheck-validator.
//!
//! The form state is a vector of booleans and rule `fN` simply reads slot N,
//! so every possible combination of rule outcomes is reachable.

use std::cell::Cell;
use std::rc::Rc;

use formcheck_validator::prelude::*;
use proptest::prelude::*;

const MAX_FIELDS: usize = 8;

type Flags = Vec<bool>;

fn field(i: usize) -> String {
    format!("f{i}")
}

fn engine(fields: usize) -> ValidationEngine<Flags> {
    let mut engine = ValidationEngine::builder().build().unwrap();
    for i in 0..fields {
        engine
            .add_rule(field(i), move |s: &Flags| s[i])
            .unwrap();
    }
    engine
}

fn counted_engine(fields: usize) -> (ValidationEngine<Flags>, Rc<Cell<usize>>) {
    let flips = Rc::new(Cell::new(0));
    let sink = Rc::clone(&flips);
    let mut builder: ValidationEngineBuilder<Flags> = ValidationEngine::builder()
        .on_validation_changed(move |_| sink.set(sink.get() + 1));
    for i in 0..fields {
        builder = builder.rule(field(i), move |s: &Flags| s[i]);
    }
    (builder.build().unwrap(), flips)
}

/// A state together with a second state of the same width.
fn two_states() -> impl Strategy<Value = (Flags, Flags)> {
    (1..=MAX_FIELDS).prop_flat_map(|n| {
        (
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(any::<bool>(), n),
        )
    })
}

// ============================================================================
// PRISTINE MASKING
// ============================================================================

proptest! {
    #[test]
    fn pristine_engine_reports_all_valid(state in proptest::collection::vec(any::<bool>(), 1..=MAX_FIELDS)) {
        let mut engine = engine(state.len());
        for i in 0..state.len() {
            prop_assert!(engine.validate_field(&state, &field(i)).unwrap());
        }
        let snapshot = engine.validations();
        prop_assert!(snapshot.form_valid());
        prop_assert!(snapshot.iter().all(|(_, valid)| valid));
    }
}

// ============================================================================
// VALIDATE FORM: form_valid == AND of rules, display == real
// ============================================================================

proptest! {
    #[test]
    fn validate_form_matches_rule_outcomes(state in proptest::collection::vec(any::<bool>(), 1..=MAX_FIELDS)) {
        let mut engine = engine(state.len());
        let snapshot = engine.validate_form(&state).unwrap();

        prop_assert_eq!(snapshot.form_valid(), state.iter().all(|b| *b));
        for (i, expected) in state.iter().enumerate() {
            let status = engine.field_status(&field(i)).unwrap();
            prop_assert_eq!(status.really_valid, *expected);
            prop_assert_eq!(status.display_valid, *expected);
            prop_assert_eq!(snapshot.field(&field(i)), Some(*expected));
        }
    }

    #[test]
    fn validate_form_is_idempotent(state in proptest::collection::vec(any::<bool>(), 1..=MAX_FIELDS)) {
        let (mut engine, flips) = counted_engine(state.len());
        let first = engine.validate_form(&state).unwrap();
        let after_first = flips.get();
        let second = engine.validate_form(&state).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(flips.get(), after_first);
        prop_assert_eq!(after_first, state.iter().filter(|b| !**b).count());
    }
}

// ============================================================================
// CASCADE AND NARROW UPDATE
// ============================================================================

proptest! {
    #[test]
    fn invalid_form_cascades((first, second) in two_states(), pick in any::<prop::sample::Index>()) {
        prop_assume!(first.iter().any(|b| !*b));
        let target = field(pick.index(first.len()));

        let mut cascaded = engine(first.len());
        cascaded.validate_form(&first).unwrap();
        cascaded.validate_field(&second, &target).unwrap();

        let mut direct = engine(first.len());
        direct.validate_form(&first).unwrap();
        let expected = direct.validate_form(&second).unwrap();

        prop_assert_eq!(cascaded.validations(), expected);
    }

    #[test]
    fn valid_form_updates_one_field((width, second) in two_states().prop_map(|(a, b)| (a.len(), b)), pick in any::<prop::sample::Index>()) {
        let all_valid = vec![true; width];
        let target = pick.index(width);

        let mut engine = engine(width);
        engine.validate_form(&all_valid).unwrap();
        let displayed = engine.validate_field(&second, &field(target)).unwrap();

        prop_assert_eq!(displayed, second[target]);
        prop_assert!(engine.form_valid());
        for i in (0..width).filter(|i| *i != target) {
            prop_assert_eq!(engine.display_valid(&field(i)), Some(true));
        }
    }
}

// ============================================================================
// RESET
// ============================================================================

proptest! {
    #[test]
    fn reset_restores_fresh_state((first, second) in two_states()) {
        let fresh = engine(first.len());

        let mut used = engine(first.len());
        used.validate_form(&first).unwrap();
        used.validate_field(&second, "f0").unwrap();
        used.reset_validation();

        prop_assert_eq!(used.validations(), fresh.validations());
        prop_assert_eq!(used.phase(), fresh.phase());
        prop_assert_eq!(used.form_valid(), fresh.form_valid());
        for i in 0..first.len() {
            prop_assert_eq!(used.field_status(&field(i)), fresh.field_status(&field(i)));
        }
    }
}
