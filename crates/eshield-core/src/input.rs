//! # Evaluation Input
//!
//! The shipment scenario handed to the rule evaluator. Field names on the
//! wire follow the web form (`classificationCode`, `declaredValue`,
//! `endUserType`, `isGovernmentContract`), with the legacy `eccn` and
//! `value` keys accepted as aliases.
//!
//! Deserialization is deliberately lenient: a form can post a value as a
//! number, a string, `null`, or not at all, and an end-user type the form
//! never offered. None of those are errors. Each field collapses to the
//! value that makes its rule "not match".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EshieldError, UnknownEndUserType};

// ---------------------------------------------------------------------------
// DeclaredValue
// ---------------------------------------------------------------------------

/// Declared shipment value in currency units.
///
/// Always finite. Absent, non-numeric, NaN and infinite inputs are
/// represented as `0`, which fails every "value must be positive" check.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeclaredValue(f64);

impl DeclaredValue {
    /// The zero value used for missing or unparsable input.
    pub const ZERO: Self = Self(0.0);

    /// Parse a declared value from form text.
    ///
    /// Leading whitespace is skipped and the longest leading decimal
    /// number is read; anything after it (`"5000 USD"`) is ignored. Text
    /// that does not start with a number (`"$5,000"`, `"abc"`) yields
    /// [`DeclaredValue::ZERO`], as do values that overflow to infinity.
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim_start();
        let number = &text[..leading_number_len(text)];
        number.parse::<f64>().map(Self::from).unwrap_or(Self::ZERO)
    }

    /// The numeric amount.
    pub fn amount(self) -> f64 {
        self.0
    }

    /// Strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    fn from_json(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Number(n) => n.as_f64().map(Self::from).unwrap_or(Self::ZERO),
            serde_json::Value::String(s) => Self::parse(s),
            _ => Self::ZERO,
        }
    }
}

impl From<f64> for DeclaredValue {
    fn from(amount: f64) -> Self {
        if amount.is_finite() {
            Self(amount)
        } else {
            Self::ZERO
        }
    }
}

impl fmt::Display for DeclaredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for DeclaredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for DeclaredValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&raw))
    }
}

/// Byte length of the decimal number at the start of `text`:
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
/// Zero when `text` does not start with one.
fn leading_number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    end
}

// ---------------------------------------------------------------------------
// EndUserType
// ---------------------------------------------------------------------------

/// Category of the party that will receive and use the exported item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EndUserType {
    /// Private-sector company.
    Commercial,
    /// Government agency.
    Government,
    /// Armed forces or military end use.
    Military,
    /// Non-governmental organization.
    #[serde(rename = "NGO")]
    Ngo,
    /// Private individual.
    Individual,
    /// University or research institution.
    Academic,
}

impl EndUserType {
    /// Returns all end-user types in form order.
    pub fn all() -> &'static [EndUserType] {
        &[
            Self::Commercial,
            Self::Government,
            Self::Military,
            Self::Ngo,
            Self::Individual,
            Self::Academic,
        ]
    }

    /// Display name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::Government => "Government",
            Self::Military => "Military",
            Self::Ngo => "NGO",
            Self::Individual => "Individual",
            Self::Academic => "Academic",
        }
    }
}

impl fmt::Display for EndUserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndUserType {
    type Err = UnknownEndUserType;

    /// Case-insensitive match against the display names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownEndUserType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// EvaluationInput
// ---------------------------------------------------------------------------

/// A shipment scenario to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EvaluationInput {
    /// Control classification code (ECCN) as entered; may be blank.
    #[serde(
        default,
        alias = "eccn",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub classification_code: Option<String>,

    /// Destination country name, compared by exact match.
    #[serde(default, deserialize_with = "lenient_destination")]
    pub destination: String,

    /// Declared shipment value.
    #[serde(default, alias = "value")]
    pub declared_value: DeclaredValue,

    /// End-user category; unknown strings deserialize to `None`.
    #[serde(
        default,
        deserialize_with = "lenient_end_user",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_user_type: Option<EndUserType>,

    /// Whether the shipment is made under a government contract.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_government_contract: bool,

    /// Free-text item description.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl EvaluationInput {
    /// Start a scenario for the given destination. All other fields default.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// Set the classification code.
    pub fn with_classification(mut self, code: impl Into<String>) -> Self {
        self.classification_code = Some(code.into());
        self
    }

    /// Set the declared value.
    pub fn with_value(mut self, value: impl Into<DeclaredValue>) -> Self {
        self.declared_value = value.into();
        self
    }

    /// Set the end-user type.
    pub fn with_end_user(mut self, end_user: EndUserType) -> Self {
        self.end_user_type = Some(end_user);
        self
    }

    /// Set the government-contract flag.
    pub fn with_government_contract(mut self, flag: bool) -> Self {
        self.is_government_contract = flag;
        self
    }

    /// Set the item description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Decode a scenario from JSON text.
    ///
    /// Only a document that is not a JSON object fails; individual fields
    /// are decoded leniently.
    pub fn from_json(text: &str) -> Result<Self, EshieldError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The classification code with surrounding whitespace removed, or
    /// `None` when absent or empty.
    ///
    /// A whitespace-only code counts as supplied: it trims to `""`, which
    /// matches no table entry.
    pub fn classification(&self) -> Option<&str> {
        self.classification_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(str::trim)
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_destination<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_end_user<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EndUserType>, D::Error> {
    Ok(lenient_string(deserializer)?.and_then(|s| s.parse().ok()))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}
