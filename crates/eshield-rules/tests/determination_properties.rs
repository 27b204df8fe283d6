//! # Determination Properties
//!
//! End-to-end checks of the evaluator against the documented determination
//! scenarios, plus property tests over arbitrary inputs.

use eshield_core::{
    DeclaredValue, DeterminationKind, EndUserType, EvaluationInput, ExceptionCode,
};
use eshield_rules::tables::embargoed_destinations;
use eshield_rules::{evaluate, evaluate_with_trace, StepOutcome};
use proptest::prelude::*;

fn single(input: &EvaluationInput) -> (DeterminationKind, ExceptionCode) {
    let results = evaluate(input);
    assert_eq!(results.len(), 1, "expected exactly one determination: {results:#?}");
    (results[0].kind, results[0].exception_code)
}

#[test]
fn low_value_protective_equipment_to_germany() {
    let input = EvaluationInput::new("Germany")
        .with_classification("1A995")
        .with_value(5000.0);
    assert_eq!(
        single(&input),
        (DeterminationKind::ExceptionEligible, ExceptionCode::Lvs)
    );
}

#[test]
fn zero_or_absent_value_requires_individual_license() {
    let zero = EvaluationInput::new("Germany")
        .with_classification("1A995")
        .with_value(0.0);
    assert_eq!(
        single(&zero),
        (DeterminationKind::LicenseRequired, ExceptionCode::Ivl)
    );

    let absent = EvaluationInput::new("Germany").with_classification("1A995");
    assert_eq!(
        single(&absent),
        (DeterminationKind::LicenseRequired, ExceptionCode::Ivl)
    );
}

#[test]
fn electronic_components_to_uk_are_sta_eligible_at_any_value() {
    let input = EvaluationInput::new("United Kingdom")
        .with_classification("3A001")
        .with_value(0.0)
        .with_end_user(EndUserType::Commercial);
    assert_eq!(
        single(&input),
        (DeterminationKind::ExceptionEligible, ExceptionCode::Sta)
    );
}

#[test]
fn unknown_classification_to_canada_is_nlr() {
    let input = EvaluationInput::new("Canada").with_classification("9X000");
    assert_eq!(
        single(&input),
        (DeterminationKind::NoLicenseRequired, ExceptionCode::Nlr)
    );
}

#[test]
fn form_payload_with_unparsable_value_behaves_like_zero() {
    let input: EvaluationInput = serde_json::from_str(
        r#"{"classificationCode": "1A995", "destination": "Germany", "declaredValue": "lots"}"#,
    )
    .unwrap();
    assert_eq!(input.declared_value, DeclaredValue::ZERO);
    assert_eq!(
        single(&input),
        (DeterminationKind::LicenseRequired, ExceptionCode::Ivl)
    );
}

#[test]
fn unknown_end_user_string_is_not_government() {
    let input: EvaluationInput = serde_json::from_str(
        r#"{"classificationCode": "9X000", "destination": "Canada", "endUserType": "Ministry"}"#,
    )
    .unwrap();
    assert_eq!(input.end_user_type, None);
    assert_eq!(
        single(&input),
        (DeterminationKind::NoLicenseRequired, ExceptionCode::Nlr)
    );
}

#[test]
fn embargo_holds_for_every_embargoed_destination() {
    for destination in embargoed_destinations() {
        let input = EvaluationInput::new(*destination)
            .with_classification("3A001")
            .with_value(10.0)
            .with_government_contract(true);
        assert_eq!(
            single(&input),
            (DeterminationKind::LicenseRequired, ExceptionCode::Embargo),
            "destination {destination}"
        );
    }
}

#[test]
fn evaluation_serializes_for_clients() {
    let eval = evaluate_with_trace(
        &EvaluationInput::new("Germany")
            .with_classification("1A995")
            .with_value(5000.0),
    );
    let json = serde_json::to_value(&eval).unwrap();
    assert_eq!(json["verdict"], "EXCEPTION_ELIGIBLE");
    assert_eq!(json["determinations"][0]["exceptionCode"], "LVS");
    assert_eq!(json["trace"][0]["rule"], "classification");
    assert_eq!(json["trace"][0]["outcome"], "skipped");
}

fn arb_end_user() -> impl Strategy<Value = Option<EndUserType>> {
    prop_oneof![
        Just(None),
        proptest::sample::select(EndUserType::all()).prop_map(Some),
    ]
}

fn arb_destination() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(vec![
            "Iran",
            "Cuba",
            "Germany",
            "United Kingdom",
            "Japan",
            "Canada",
            "Brazil",
            "",
        ])
        .prop_map(str::to_string),
        "[A-Za-z ]{0,16}",
    ]
}

fn arb_code() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        proptest::sample::select(vec!["1A995", "3A001", "3a001", "9X000", " ", ""])
            .prop_map(|s| Some(s.to_string())),
        "[0-9][A-Ea-e][0-9]{3}".prop_map(Some),
    ]
}

prop_compose! {
    fn arb_input()(
        code in arb_code(),
        destination in arb_destination(),
        value in prop_oneof![Just(0.0), -100.0f64..20_000.0, Just(f64::NAN)],
        end_user in arb_end_user(),
        contract in any::<bool>(),
    ) -> EvaluationInput {
        EvaluationInput {
            classification_code: code,
            destination,
            declared_value: DeclaredValue::from(value),
            end_user_type: end_user,
            is_government_contract: contract,
            description: None,
        }
    }
}

proptest! {
    #[test]
    fn never_empty(input in arb_input()) {
        prop_assert!(!evaluate(&input).is_empty());
    }

    #[test]
    fn missing_classification_is_exclusive(mut input in arb_input()) {
        input.classification_code = None;
        let results = evaluate(&input);
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].kind, DeterminationKind::NoLicenseRequired);
        prop_assert_eq!(results[0].exception_code, ExceptionCode::Ear99);
    }

    #[test]
    fn embargo_is_exclusive(
        input in arb_input(),
        destination in proptest::sample::select(embargoed_destinations()),
    ) {
        let input = EvaluationInput { destination: destination.to_string(), ..input };
        prop_assume!(input.classification().is_some());
        let results = evaluate(&input);
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].kind, DeterminationKind::LicenseRequired);
        prop_assert_eq!(results[0].exception_code, ExceptionCode::Embargo);
    }

    #[test]
    fn evaluation_is_idempotent(input in arb_input()) {
        prop_assert_eq!(evaluate_with_trace(&input), evaluate_with_trace(&input));
    }

    #[test]
    fn fallback_only_when_no_exception(input in arb_input()) {
        let results = evaluate(&input);
        let exceptions = results
            .iter()
            .filter(|d| d.kind == DeterminationKind::ExceptionEligible)
            .count();
        let fallbacks = results
            .iter()
            .filter(|d| matches!(d.exception_code, ExceptionCode::Ivl | ExceptionCode::Nlr))
            .count();
        prop_assert!(fallbacks <= 1);
        prop_assert!(exceptions == 0 || fallbacks == 0);
    }

    #[test]
    fn verdict_is_most_restrictive(input in arb_input()) {
        let eval = evaluate_with_trace(&input);
        let worst = eval.determinations.iter().map(|d| d.kind).max();
        prop_assert_eq!(Some(eval.verdict), worst);
    }

    #[test]
    fn one_fired_step_per_determination(input in arb_input()) {
        let eval = evaluate_with_trace(&input);
        let fired = eval
            .trace
            .iter()
            .filter(|s| s.outcome != StepOutcome::Skipped)
            .count();
        prop_assert_eq!(fired, eval.determinations.len());
    }
}
