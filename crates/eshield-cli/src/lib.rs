//! # eshield-cli: ExportShield on the command line
//!
//! ## Subcommands
//!
//! - `eshield evaluate`: Evaluate a scenario built from flags, a JSON or
//!   YAML file, or both.
//! - `eshield classifications`: Print the controlled classification table.
//!
//! ```bash
//! eshield evaluate --eccn 1A995 --destination Germany --value 5000
//! eshield evaluate --input scenario.yaml --trace --format text
//! ```
//!
//! `evaluate` exits with status 2 when any determination requires a
//! license, so scripts can gate on it.

pub mod classifications;
pub mod evaluate;

use clap::ValueEnum;

/// Exit status for a verdict that requires a license.
pub const EXIT_LICENSE_REQUIRED: u8 = 2;

/// Output format shared by the subcommands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Human-readable text.
    Text,
}
