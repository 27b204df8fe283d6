//! # Error Types
//!
//! Errors used at the edges of ExportShield. The rule evaluator itself is
//! total and never returns an error; these types cover decoding scenario
//! files and parsing the end-user flag from free text.

use thiserror::Error;

/// Top-level error type for ExportShield.
#[derive(Error, Debug)]
pub enum EshieldError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An end-user type string that matches none of the known categories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown end-user type: {0:?}")]
pub struct UnknownEndUserType(pub String);
