//! # Evaluate CLI: Run the rule evaluator on one scenario.
//!
//! Flags override fields read from `--input`. The file format is chosen
//! by extension: `.yaml`/`.yml` is YAML, anything else JSON. In YAML the
//! classification and destination are taken as written, so an unquoted
//! `5E002` stays a code instead of becoming a number.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use eshield_core::{DeclaredValue, Determination, DeterminationKind, EndUserType, EvaluationInput};
use eshield_rules::{Evaluation, TraceStep};

use crate::{OutputFormat, EXIT_LICENSE_REQUIRED};

/// Evaluate subcommand arguments.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Classification code (ECCN), e.g. 1A995.
    #[arg(long)]
    pub eccn: Option<String>,

    /// Destination country, exact name (e.g. "United Kingdom").
    #[arg(long)]
    pub destination: Option<String>,

    /// Declared value. The leading number is read; trailing text such as
    /// a currency code is ignored.
    #[arg(long)]
    pub value: Option<String>,

    /// Free-text item description.
    #[arg(long)]
    pub description: Option<String>,

    /// End-user type (Commercial, Government, Military, NGO, Individual, Academic).
    #[arg(long)]
    pub end_user: Option<EndUserType>,

    /// Shipment is made under a government contract.
    #[arg(long)]
    pub gov_contract: bool,

    /// Read the scenario from a JSON or YAML file.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Include the rule-by-rule decision trace.
    #[arg(long)]
    pub trace: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct Report<'a> {
    verdict: DeterminationKind,
    results: &'a [Determination],
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [TraceStep]>,
}

/// Execute the evaluate subcommand.
pub fn run_evaluate(args: &EvaluateArgs) -> Result<u8> {
    let input = build_input(args)?;
    let evaluation = eshield_rules::evaluate_with_trace(&input);

    tracing::info!(
        description = input.description.as_deref().unwrap_or("-"),
        verdict = %evaluation.verdict,
        results = evaluation.determinations.len(),
        "scenario evaluated"
    );

    println!("{}", render(&evaluation, args.format, args.trace)?);

    Ok(exit_code(evaluation.verdict))
}

/// Assemble the scenario from the input file (if any) and flags.
pub fn build_input(args: &EvaluateArgs) -> Result<EvaluationInput> {
    let mut input = match &args.input {
        Some(path) => load_scenario(path)?,
        None => EvaluationInput::default(),
    };

    if let Some(eccn) = &args.eccn {
        input.classification_code = Some(eccn.clone());
    }
    if let Some(destination) = &args.destination {
        input.destination = destination.clone();
    }
    if let Some(value) = &args.value {
        input.declared_value = DeclaredValue::parse(value);
    }
    if let Some(description) = &args.description {
        input = input.with_description(description.clone());
    }
    if let Some(end_user) = args.end_user {
        input.end_user_type = Some(end_user);
    }
    if args.gov_contract {
        input.is_government_contract = true;
    }

    Ok(input)
}

/// Scenario fields re-read from YAML as plain text.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerbatimFields {
    #[serde(default, alias = "eccn")]
    classification_code: Option<String>,
    #[serde(default)]
    destination: Option<String>,
}

fn load_yaml(content: &str) -> serde_yaml::Result<EvaluationInput> {
    let mut input: EvaluationInput = serde_yaml::from_str(content)?;
    // Sequences or maps in these fields stay with the lenient result.
    if let Ok(verbatim) = serde_yaml::from_str::<VerbatimFields>(content) {
        if verbatim.classification_code.is_some() {
            input.classification_code = verbatim.classification_code;
        }
        if let Some(destination) = verbatim.destination {
            input.destination = destination;
        }
    }
    Ok(input)
}

/// Read a scenario file.
pub fn load_scenario(path: &Path) -> Result<EvaluationInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file: {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        load_yaml(&content)
            .with_context(|| format!("failed to parse YAML scenario: {}", path.display()))
    } else {
        EvaluationInput::from_json(&content)
            .with_context(|| format!("failed to parse JSON scenario: {}", path.display()))
    }
}

/// Render an evaluation in the requested format.
pub fn render(evaluation: &Evaluation, format: OutputFormat, with_trace: bool) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                verdict: evaluation.verdict,
                results: &evaluation.determinations,
                trace: with_trace.then_some(evaluation.trace.as_slice()),
            };
            serde_json::to_string_pretty(&report).context("failed to serialize evaluation")
        }
        OutputFormat::Text => Ok(render_text(evaluation, with_trace)),
    }
}

fn render_text(evaluation: &Evaluation, with_trace: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Verdict: {}", evaluation.verdict);

    for d in &evaluation.determinations {
        let _ = writeln!(out);
        let _ = writeln!(out, "[{}] {} ({})", d.exception_code, d.title, d.kind);
        let _ = writeln!(out, "  {}", d.justification);
        for caveat in &d.caveats {
            let _ = writeln!(out, "  * {caveat}");
        }
        let _ = writeln!(out, "  Next: {}", d.next_steps);
    }

    if with_trace {
        let _ = writeln!(out);
        let _ = writeln!(out, "Trace:");
        for step in &evaluation.trace {
            let _ = writeln!(out, "  {step}");
        }
    }

    out.trim_end().to_string()
}

fn exit_code(verdict: DeterminationKind) -> u8 {
    if verdict == DeterminationKind::LicenseRequired {
        EXIT_LICENSE_REQUIRED
    } else {
        0
    }
}
