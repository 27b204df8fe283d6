//! # License Determinations
//!
//! One [`Determination`] is one piece of guidance returned to the user:
//! what kind of outcome it is, which rule produced it, why, and what the
//! user still has to verify on their own.
//!
//! ## Restrictiveness
//!
//! [`DeterminationKind`] is totally ordered from least to most restrictive:
//!
//! ```text
//! NoLicenseRequired < ExceptionEligible < LicenseRequired
//! ```
//!
//! [`DeterminationKind::worst`] picks the more restrictive of two kinds and
//! is used to fold a result list into a single verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome category of a determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeterminationKind {
    /// The item may ship without a license.
    NoLicenseRequired,
    /// A license exception may apply, subject to caveats.
    ExceptionEligible,
    /// An individual license or explicit authorization is needed.
    LicenseRequired,
}

impl DeterminationKind {
    fn rank(self) -> u8 {
        match self {
            Self::NoLicenseRequired => 0,
            Self::ExceptionEligible => 1,
            Self::LicenseRequired => 2,
        }
    }

    /// The more restrictive of `self` and `other`.
    pub fn worst(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Serialized identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoLicenseRequired => "NO_LICENSE_REQUIRED",
            Self::ExceptionEligible => "EXCEPTION_ELIGIBLE",
            Self::LicenseRequired => "LICENSE_REQUIRED",
        }
    }
}

impl PartialOrd for DeterminationKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeterminationKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for DeterminationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies which rule produced a determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum ExceptionCode {
    /// Shipment of limited value.
    Lvs,
    /// Government end use.
    Gov,
    /// Strategic trade authorization.
    Sta,
    /// Embargoed destination.
    Embargo,
    /// Individual validated license.
    Ivl,
    /// Unclassified item assumed EAR99.
    Ear99,
    /// No license required.
    Nlr,
}

impl ExceptionCode {
    /// Upper-case code as it appears on shipping documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lvs => "LVS",
            Self::Gov => "GOV",
            Self::Sta => "STA",
            Self::Embargo => "EMBARGO",
            Self::Ivl => "IVL",
            Self::Ear99 => "EAR99",
            Self::Nlr => "NLR",
        }
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of license guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Determination {
    /// Outcome category.
    pub kind: DeterminationKind,
    /// The rule that fired.
    pub exception_code: ExceptionCode,
    /// Short heading.
    pub title: String,
    /// Why the rule fired, naming the inputs that triggered it.
    pub justification: String,
    /// Conditions the user must verify independently, in display order.
    pub caveats: Vec<String>,
    /// Recommended follow-up action.
    pub next_steps: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_prefers_more_restrictive() {
        use DeterminationKind::*;
        assert_eq!(NoLicenseRequired.worst(ExceptionEligible), ExceptionEligible);
        assert_eq!(ExceptionEligible.worst(NoLicenseRequired), ExceptionEligible);
        assert_eq!(ExceptionEligible.worst(LicenseRequired), LicenseRequired);
        assert_eq!(LicenseRequired.worst(NoLicenseRequired), LicenseRequired);
        assert_eq!(NoLicenseRequired.worst(NoLicenseRequired), NoLicenseRequired);
    }

    #[test]
    fn kind_serde_format_matches_as_str() {
        for kind in [
            DeterminationKind::NoLicenseRequired,
            DeterminationKind::ExceptionEligible,
            DeterminationKind::LicenseRequired,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn code_serde_format_matches_as_str() {
        for code in [
            ExceptionCode::Lvs,
            ExceptionCode::Gov,
            ExceptionCode::Sta,
            ExceptionCode::Embargo,
            ExceptionCode::Ivl,
            ExceptionCode::Ear99,
            ExceptionCode::Nlr,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(code.to_string(), code.as_str());
        }
    }

    #[test]
    fn determination_uses_camel_case_keys() {
        let d = Determination {
            kind: DeterminationKind::LicenseRequired,
            exception_code: ExceptionCode::Ivl,
            title: "Individual Validated License".into(),
            justification: "controlled".into(),
            caveats: vec!["slow".into()],
            next_steps: "apply".into(),
        };
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["exceptionCode"], "IVL");
        assert_eq!(value["nextSteps"], "apply");
        assert_eq!(value["kind"], "LICENSE_REQUIRED");
    }
}
