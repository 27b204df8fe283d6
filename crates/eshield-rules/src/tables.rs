//! # Reference Tables
//!
//! Static reference data consulted by the evaluator. Nothing here is
//! mutable and nothing is registered at runtime.
//!
//! Classification lookups are case-insensitive. Destination lookups are
//! exact string matches against the names the form offers.

use std::fmt;

use serde::Serialize;

/// Reason a classification is controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlReason {
    /// National security.
    Ns,
    /// Anti-terrorism.
    At,
    /// Regional stability.
    Rs,
}

impl ControlReason {
    /// Short token as printed on the Commerce Control List.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ns => "NS",
            Self::At => "AT",
            Self::Rs => "RS",
        }
    }

    /// Long-form label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ns => "National Security",
            Self::At => "Anti-Terrorism",
            Self::Rs => "Regional Stability",
        }
    }
}

impl fmt::Display for ControlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the classification reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    /// Upper-case classification code; unique key.
    pub code: &'static str,
    /// Free-text description of the controlled items.
    pub description: &'static str,
    /// Why the classification is controlled.
    pub control_reasons: &'static [ControlReason],
    /// License exceptions that may apply, subject to further checks.
    pub eligible_exception_codes: &'static [&'static str],
}

impl ClassificationRecord {
    /// Whether the record lists the given exception code.
    pub fn lists_exception(&self, code: &str) -> bool {
        self.eligible_exception_codes.contains(&code)
    }

    /// Control reasons joined as `NS, AT, RS`.
    pub fn control_summary(&self) -> String {
        self.control_reasons
            .iter()
            .map(ControlReason::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Exclusive upper bound on declared value for the limited-value exception.
pub const LVS_VALUE_THRESHOLD: f64 = 10_000.0;

/// Table code of the value-based exception.
pub const LVS_EXCEPTION: &str = "LVS";

/// The electronic-components classification eligible for strategic trade
/// authorization to partner destinations.
pub const STA_REFERENCE_CODE: &str = "3A001";

/// Classification table, sorted by code.
static CLASSIFICATIONS: &[ClassificationRecord] = &[
    ClassificationRecord {
        code: "1A995",
        description:
            "Protective and detection equipment not specifically designed for military use.",
        control_reasons: &[ControlReason::At],
        eligible_exception_codes: &["LVS"],
    },
    ClassificationRecord {
        code: "3A001",
        description: "Electronic components.",
        control_reasons: &[ControlReason::Ns, ControlReason::At, ControlReason::Rs],
        eligible_exception_codes: &["LVS", "GBS"],
    },
];

/// Embargoed or heavily restricted destinations.
static EMBARGOED_DESTINATIONS: &[&str] = &[
    "Iran",
    "North Korea",
    "Syria",
    "Cuba",
    "Russia",
    "Belarus",
];

/// Partner destinations for strategic trade authorization.
static STRATEGIC_PARTNERS: &[&str] = &[
    "United Kingdom",
    "Germany",
    "Canada",
    "Japan",
    "Australia",
];

/// Trim and upper-case a classification code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Look up a classification by code, ignoring case and surrounding
/// whitespace.
pub fn lookup_classification(code: &str) -> Option<&'static ClassificationRecord> {
    let needle = code.trim();
    CLASSIFICATIONS
        .iter()
        .find(|record| record.code.eq_ignore_ascii_case(needle))
}

/// All classification records, sorted by code.
pub fn classifications() -> &'static [ClassificationRecord] {
    CLASSIFICATIONS
}

/// Whether the destination is embargoed. Exact match.
pub fn is_embargoed(destination: &str) -> bool {
    EMBARGOED_DESTINATIONS.contains(&destination)
}

/// All embargoed destinations.
pub fn embargoed_destinations() -> &'static [&'static str] {
    EMBARGOED_DESTINATIONS
}

/// Whether the destination is a strategic-trade partner. Exact match.
pub fn is_strategic_partner(destination: &str) -> bool {
    STRATEGIC_PARTNERS.contains(&destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(lookup_classification("1a995").map(|r| r.code), Some("1A995"));
        assert_eq!(lookup_classification(" 3A001 ").map(|r| r.code), Some("3A001"));
        assert!(lookup_classification("9X000").is_none());
        assert!(lookup_classification("").is_none());
    }

    #[test]
    fn table_is_sorted_and_unique() {
        let codes: Vec<&str> = classifications().iter().map(|r| r.code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn every_record_is_controlled() {
        for record in classifications() {
            assert!(!record.control_reasons.is_empty(), "{} has no controls", record.code);
            assert_eq!(record.code, normalize_code(record.code));
        }
    }

    #[test]
    fn control_summary_joins_tokens() {
        let record = lookup_classification("3A001").unwrap();
        assert_eq!(record.control_summary(), "NS, AT, RS");
        assert!(record.lists_exception("LVS"));
        assert!(record.lists_exception("GBS"));
        assert!(!record.lists_exception("STA"));
    }

    #[test]
    fn destination_sets_are_exact_match() {
        assert!(is_embargoed("Iran"));
        assert!(is_embargoed("North Korea"));
        assert!(!is_embargoed("iran"));
        assert!(!is_embargoed(" Iran"));
        assert!(is_strategic_partner("United Kingdom"));
        assert!(!is_strategic_partner("UK"));
    }

    #[test]
    fn partners_and_embargoes_are_disjoint() {
        for dest in embargoed_destinations() {
            assert!(!is_strategic_partner(dest), "{dest} in both sets");
        }
    }

    #[test]
    fn control_reason_labels() {
        assert_eq!(ControlReason::Ns.label(), "National Security");
        assert_eq!(ControlReason::At.to_string(), "AT");
        assert_eq!(serde_json::to_string(&ControlReason::Rs).unwrap(), "\"RS\"");
    }
}
