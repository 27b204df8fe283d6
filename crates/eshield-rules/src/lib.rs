//! # eshield-rules: License-Exception Rule Evaluator
//!
//! Decides, for one shipment scenario, whether the export is clear,
//! exception-eligible, or needs a license, and explains why.
//!
//! ## Architecture
//!
//! - **Tables** (`tables.rs`): the classification reference table, the
//!   embargo set and the strategic-trade partner list. All compiled in,
//!   all read-only.
//!
//! - **Evaluator** (`evaluator.rs`): an ordered pipeline of plain rule
//!   functions. Each rule either short-circuits with a final answer or
//!   appends to the result list.
//!
//! - **Trace** (`trace.rs`): the per-rule record of what was consulted and
//!   what happened, returned alongside the determinations.
//!
//! ## Crate Policy
//!
//! - Depends on `eshield-core` only.
//! - No I/O, no shared mutable state, no error paths. Every input yields
//!   at least one determination.

pub mod evaluator;
pub mod tables;
pub mod trace;

pub use evaluator::{evaluate, evaluate_with_trace, Evaluation};
pub use tables::{ClassificationRecord, ControlReason};
pub use trace::{RuleId, StepOutcome, TraceStep};
