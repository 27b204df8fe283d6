//! # eshield-core: Foundational Types for ExportShield
//!
//! This crate defines the vocabulary shared by every other ExportShield
//! crate: what a shipment scenario looks like on the way in, and what a
//! license determination looks like on the way out. It depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Total input types.** [`EvaluationInput`] deserializes from anything a
//!    web form can produce. Missing fields, non-numeric values and unknown
//!    end-user strings become well-defined defaults, never errors.
//!
//! 2. **Newtype for money.** [`DeclaredValue`] owns the parsing rules for
//!    declared shipment value. Non-finite and unparsable inputs collapse to 0.
//!
//! 3. **Closed code sets.** [`DeterminationKind`] and [`ExceptionCode`] are
//!    exhaustive enums. Adding a code forces every `match` to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `eshield-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod determination;
pub mod error;
pub mod input;

// Re-export primary types for ergonomic imports.
pub use determination::{Determination, DeterminationKind, ExceptionCode};
pub use error::{EshieldError, UnknownEndUserType};
pub use input::{DeclaredValue, EndUserType, EvaluationInput};
