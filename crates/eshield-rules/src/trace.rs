//! # Decision Trace
//!
//! Every rule the evaluator consults leaves one [`TraceStep`]. Rules that
//! are never reached because an earlier rule short-circuited leave nothing.

use std::fmt;

use serde::Serialize;

/// The rules of the evaluation pipeline, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// A classification code must be supplied.
    Classification,
    /// Destination embargo check.
    Embargo,
    /// Limited-value shipment exception.
    LowValueShipment,
    /// Government end-use exception.
    GovernmentEndUse,
    /// Strategic trade authorization.
    StrategicTrade,
    /// Controlled item with no exception: individual license.
    IndividualLicense,
    /// Unknown classification with nothing else matched.
    UncontrolledFallback,
}

impl RuleId {
    /// Snake-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Embargo => "embargo",
            Self::LowValueShipment => "low_value_shipment",
            Self::GovernmentEndUse => "government_end_use",
            Self::StrategicTrade => "strategic_trade",
            Self::IndividualLicense => "individual_license",
            Self::UncontrolledFallback => "uncontrolled_fallback",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rule did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The rule appended a determination.
    Fired,
    /// The rule's conditions did not hold.
    Skipped,
    /// The rule produced the final answer; later rules were not consulted.
    ShortCircuit,
}

/// One consulted rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// Which rule.
    pub rule: RuleId,
    /// What it did.
    pub outcome: StepOutcome,
    /// Human-readable note naming the inputs the rule looked at.
    pub detail: String,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.outcome {
            StepOutcome::Fired => "+",
            StepOutcome::Skipped => "-",
            StepOutcome::ShortCircuit => "!",
        };
        write!(f, "[{marker}] {}: {}", self.rule, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_snake_case() {
        assert_eq!(serde_json::to_value(StepOutcome::Skipped).unwrap(), "skipped");
        assert_eq!(
            serde_json::to_value(StepOutcome::ShortCircuit).unwrap(),
            "short_circuit"
        );
    }

    #[test]
    fn display_marks_skipped_steps() {
        let step = TraceStep {
            rule: RuleId::StrategicTrade,
            outcome: StepOutcome::Skipped,
            detail: "destination is not a strategic partner".to_string(),
        };
        assert_eq!(
            step.to_string(),
            "[-] strategic_trade: destination is not a strategic partner"
        );
    }
}
