//! # Classifications CLI: Print the controlled classification table.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Args;

use eshield_rules::tables::{self, ClassificationRecord, ControlReason};

use crate::OutputFormat;

/// Classifications subcommand arguments.
#[derive(Args, Debug)]
pub struct ClassificationsArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the classifications subcommand.
pub fn run_classifications(args: &ClassificationsArgs) -> Result<u8> {
    println!("{}", render(tables::classifications(), args.format)?);
    Ok(0)
}

fn render(records: &[ClassificationRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(records).context("failed to serialize classifications")
        }
        OutputFormat::Text => {
            let mut out = String::from("Controlled classifications:\n");
            for r in records {
                let _ = writeln!(
                    out,
                    "  {:<6} [{}] {} (exceptions: {})",
                    r.code,
                    r.control_summary(),
                    r.description,
                    r.eligible_exception_codes.join(", ")
                );
                let labels: Vec<&str> =
                    r.control_reasons.iter().map(ControlReason::label).collect();
                let _ = writeln!(out, "         controls: {}", labels.join(", "));
            }
            let _ = write!(out, "\nTotal: {} classifications", records.len());
            Ok(out)
        }
    }
}
