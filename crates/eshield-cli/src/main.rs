//! # eshield CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use eshield_cli::classifications::{run_classifications, ClassificationsArgs};
use eshield_cli::evaluate::{run_evaluate, EvaluateArgs};

/// ExportShield: mock EAR license-exception evaluation.
///
/// Results are informational and are not a legal determination.
#[derive(Parser, Debug)]
#[command(name = "eshield", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a shipment scenario for license exceptions.
    Evaluate(EvaluateArgs),

    /// List the controlled classification table.
    Classifications(ClassificationsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Evaluate(args) => run_evaluate(&args),
        Commands::Classifications(args) => run_classifications(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
