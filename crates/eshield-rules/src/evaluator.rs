//! # Rule Evaluator
//!
//! Classifies one shipment scenario into an ordered list of
//! [`Determination`]s.
//!
//! ## Pipeline
//!
//! ```text
//! classification ─┬─ missing ──────────────────────────────▶ [EAR99]
//!                 ▼
//! embargo ────────┬─ embargoed ────────────────────────────▶ [EMBARGO]
//!                 ▼
//! low_value_shipment ─┐
//! government_end_use ─┼─ append 0..3 exceptions
//! strategic_trade ────┘
//!                 ▼
//! individual_license ─── known code, nothing appended ─────▶ + [IVL]
//! uncontrolled_fallback ─ unknown code, nothing appended ──▶ + [NLR]
//! ```
//!
//! The first two rules are exclusive of everything else. The three
//! exception rules are independent and may all fire. At most one fallback
//! fires, and only when no exception did.
//!
//! The evaluator never fails. Unknown codes, zero or unparsable values and
//! unrecognized end-user types are "no match" for their rule.

use serde::Serialize;

use eshield_core::{
    Determination, DeterminationKind, EndUserType, EvaluationInput, ExceptionCode,
};

use crate::tables::{self, ClassificationRecord};
use crate::trace::{RuleId, StepOutcome, TraceStep};

/// Determinations for a scenario together with the decision trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Guidance in the order the rules fired. Never empty.
    pub determinations: Vec<Determination>,
    /// Every rule consulted, in order.
    pub trace: Vec<TraceStep>,
    /// Most restrictive kind among `determinations`.
    pub verdict: DeterminationKind,
}

/// Evaluate a scenario and return its determinations.
pub fn evaluate(input: &EvaluationInput) -> Vec<Determination> {
    evaluate_with_trace(input).determinations
}

/// Evaluate a scenario, keeping the per-rule trace.
pub fn evaluate_with_trace(input: &EvaluationInput) -> Evaluation {
    let scenario = Scenario::new(input);
    let mut acc = Accumulator::default();

    for (rule, apply) in PIPELINE {
        if let Flow::Stop = apply(&scenario, &mut acc) {
            tracing::debug!(rule = %rule, "evaluation short-circuited");
            break;
        }
    }

    acc.finish()
}

// ---------------------------------------------------------------------------
// Pipeline plumbing
// ---------------------------------------------------------------------------

/// Normalized view of the input shared by all rules.
struct Scenario<'a> {
    input: &'a EvaluationInput,
    /// Trimmed, upper-cased code; `None` when absent or empty.
    code: Option<String>,
    record: Option<&'static ClassificationRecord>,
}

impl<'a> Scenario<'a> {
    fn new(input: &'a EvaluationInput) -> Self {
        let code = input.classification().map(tables::normalize_code);
        let record = code.as_deref().and_then(tables::lookup_classification);
        Self { input, code, record }
    }

    fn destination(&self) -> &str {
        &self.input.destination
    }
}

enum Flow {
    Continue,
    Stop,
}

type Rule = fn(&Scenario<'_>, &mut Accumulator) -> Flow;

const PIPELINE: &[(RuleId, Rule)] = &[
    (RuleId::Classification, missing_classification),
    (RuleId::Embargo, embargo),
    (RuleId::LowValueShipment, low_value_shipment),
    (RuleId::GovernmentEndUse, government_end_use),
    (RuleId::StrategicTrade, strategic_trade),
    (RuleId::IndividualLicense, individual_license),
    (RuleId::UncontrolledFallback, uncontrolled_fallback),
];

#[derive(Default)]
struct Accumulator {
    determinations: Vec<Determination>,
    trace: Vec<TraceStep>,
}

impl Accumulator {
    fn fired(&mut self, rule: RuleId, detail: String, determination: Determination) {
        tracing::debug!(rule = %rule, code = %determination.exception_code, "rule fired");
        self.trace.push(TraceStep {
            rule,
            outcome: StepOutcome::Fired,
            detail,
        });
        self.determinations.push(determination);
    }

    fn skipped(&mut self, rule: RuleId, detail: String) {
        self.trace.push(TraceStep {
            rule,
            outcome: StepOutcome::Skipped,
            detail,
        });
    }

    /// Replace any accumulated guidance with a single final answer.
    fn short_circuit(&mut self, rule: RuleId, detail: String, determination: Determination) -> Flow {
        tracing::debug!(rule = %rule, code = %determination.exception_code, "rule fired");
        self.trace.push(TraceStep {
            rule,
            outcome: StepOutcome::ShortCircuit,
            detail,
        });
        self.determinations.clear();
        self.determinations.push(determination);
        Flow::Stop
    }

    fn finish(self) -> Evaluation {
        let verdict = self
            .determinations
            .iter()
            .map(|d| d.kind)
            .fold(DeterminationKind::NoLicenseRequired, DeterminationKind::worst);
        Evaluation {
            determinations: self.determinations,
            trace: self.trace,
            verdict,
        }
    }
}

fn determination(
    kind: DeterminationKind,
    exception_code: ExceptionCode,
    title: &str,
    justification: String,
    caveats: &[&str],
    next_steps: &str,
) -> Determination {
    Determination {
        kind,
        exception_code,
        title: title.to_string(),
        justification,
        caveats: caveats.iter().map(|c| (*c).to_string()).collect(),
        next_steps: next_steps.to_string(),
    }
}

/// Format an amount as `$12,345` or `$12,345.60`.
fn currency(amount: f64) -> String {
    let text = if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    };
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, frac) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn missing_classification(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    match &scenario.code {
        Some(code) => {
            let detail = match scenario.record {
                Some(record) => format!(
                    "classification {code} found in reference table ({})",
                    record.control_summary()
                ),
                None => format!("classification {code} not in reference table"),
            };
            acc.skipped(RuleId::Classification, detail);
            Flow::Continue
        }
        None => acc.short_circuit(
            RuleId::Classification,
            "no classification code supplied; assuming EAR99".to_string(),
            determination(
                DeterminationKind::NoLicenseRequired,
                ExceptionCode::Ear99,
                "No License Required (Likely)",
                "No classification code provided. An unclassified item is assumed to be \
                 EAR99, the lowest control tier (low-tech consumer goods)."
                    .to_string(),
                &["If this item is specially designed for military use, it may be ITAR controlled."],
                "Verify the item classification.",
            ),
        ),
    }
}

fn embargo(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    let destination = scenario.destination();
    if !tables::is_embargoed(destination) {
        acc.skipped(
            RuleId::Embargo,
            format!("destination {destination:?} is not embargoed"),
        );
        return Flow::Continue;
    }

    acc.short_circuit(
        RuleId::Embargo,
        format!("destination {destination} is embargoed; all other rules skipped"),
        determination(
            DeterminationKind::LicenseRequired,
            ExceptionCode::Embargo,
            "License Required / Embargoed",
            format!("Export to {destination} is heavily restricted or embargoed."),
            &["Most exports will be denied.", "Consult legal counsel immediately."],
            "Do not ship without explicit authorization.",
        ),
    )
}

fn low_value_shipment(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    let rule = RuleId::LowValueShipment;
    let value = scenario.input.declared_value;
    let threshold = tables::LVS_VALUE_THRESHOLD;

    let Some(record) = scenario.record.filter(|r| r.lists_exception(tables::LVS_EXCEPTION))
    else {
        acc.skipped(rule, "classification does not list LVS".to_string());
        return Flow::Continue;
    };

    if !(value.is_positive() && value.amount() < threshold) {
        acc.skipped(
            rule,
            format!(
                "declared value {} is not within (0, {})",
                currency(value.amount()),
                currency(threshold)
            ),
        );
        return Flow::Continue;
    }

    acc.fired(
        rule,
        format!(
            "declared value {} below threshold {}",
            currency(value.amount()),
            currency(threshold)
        ),
        determination(
            DeterminationKind::ExceptionEligible,
            ExceptionCode::Lvs,
            "Shipment of Limited Value",
            format!(
                "The item is eligible for the LVS exception because the declared value ({}) \
                 is below the threshold ({}) for {}.",
                currency(value.amount()),
                currency(threshold),
                record.code
            ),
            &[
                "Cannot split orders to meet the threshold.",
                "Not applicable to all destinations.",
            ],
            "Record 'LVS' on shipping documents.",
        ),
    );
    Flow::Continue
}

fn government_end_use(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    let rule = RuleId::GovernmentEndUse;
    let is_government = scenario.input.end_user_type == Some(EndUserType::Government);
    let under_contract = scenario.input.is_government_contract;

    let trigger = match (is_government, under_contract) {
        (true, true) => "The end user is a government entity and the shipment is made under a government contract.",
        (true, false) => "The end user is a government entity.",
        (false, true) => "The shipment is made under a government contract.",
        (false, false) => {
            let end_user = scenario
                .input
                .end_user_type
                .map_or("unspecified", |t| t.as_str());
            acc.skipped(
                rule,
                format!("end user {end_user} without government contract"),
            );
            return Flow::Continue;
        }
    };

    acc.fired(
        rule,
        "government end user or government contract".to_string(),
        determination(
            DeterminationKind::ExceptionEligible,
            ExceptionCode::Gov,
            "Government End-User",
            format!(
                "{trigger} The GOV exception applies to exports to cooperating governments \
                 such as {}.",
                scenario.destination()
            ),
            &[
                "Ensure the agency is eligible.",
                "Consignee must be the government agency.",
            ],
            "Verify agency eligibility in EAR Part 740.11.",
        ),
    );
    Flow::Continue
}

fn strategic_trade(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    let rule = RuleId::StrategicTrade;
    let destination = scenario.destination();

    let Some(code) = scenario
        .code
        .as_deref()
        .filter(|c| *c == tables::STA_REFERENCE_CODE)
    else {
        acc.skipped(
            rule,
            format!("classification is not {}", tables::STA_REFERENCE_CODE),
        );
        return Flow::Continue;
    };

    if !tables::is_strategic_partner(destination) {
        acc.skipped(
            rule,
            format!("destination {destination:?} is not a strategic-trade partner"),
        );
        return Flow::Continue;
    }

    acc.fired(
        rule,
        format!("{code} to partner destination {destination}"),
        determination(
            DeterminationKind::ExceptionEligible,
            ExceptionCode::Sta,
            "Strategic Trade Authorization",
            format!(
                "Exports of {code} to {destination} (Country Group A:5) are often eligible for STA."
            ),
            &[
                "Requires consignee statement.",
                "Notification to BIS required.",
            ],
            "Obtain Prior Consignee Statement.",
        ),
    );
    Flow::Continue
}

fn individual_license(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    let rule = RuleId::IndividualLicense;
    let Some(record) = scenario.record else {
        acc.skipped(rule, "classification not in reference table".to_string());
        return Flow::Continue;
    };
    if !acc.determinations.is_empty() {
        acc.skipped(rule, "an exception already matched".to_string());
        return Flow::Continue;
    }

    let controls = record.control_summary();
    acc.fired(
        rule,
        format!("{} controlled ({controls}) with no matching exception", record.code),
        determination(
            DeterminationKind::LicenseRequired,
            ExceptionCode::Ivl,
            "Individual Validated License",
            format!(
                "Item {} is controlled ({controls}) and no obvious exceptions matched your criteria.",
                record.code
            ),
            &["Processing time can be 30-60 days."],
            "Apply for a license in SNAP-R.",
        ),
    );
    Flow::Continue
}

fn uncontrolled_fallback(scenario: &Scenario<'_>, acc: &mut Accumulator) -> Flow {
    let rule = RuleId::UncontrolledFallback;
    if scenario.record.is_some() {
        acc.skipped(rule, "classification is in reference table".to_string());
        return Flow::Continue;
    }
    if !acc.determinations.is_empty() {
        acc.skipped(rule, "an exception already matched".to_string());
        return Flow::Continue;
    }

    let code = scenario.code.as_deref().unwrap_or_default();
    acc.fired(
        rule,
        format!("{code} not in reference table; assuming uncontrolled"),
        determination(
            DeterminationKind::NoLicenseRequired,
            ExceptionCode::Nlr,
            "No License Required",
            format!(
                "Classification '{code}' is not in our restricted database. Assuming it is not \
                 controlled for {}.",
                scenario.destination()
            ),
            &["Verify the classification code is correct."],
            "Proceed with shipment as NLR.",
        ),
    );
    Flow::Continue
}
