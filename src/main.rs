use anchor_patch::{PatchEngine, PatchOutcome, PatchRequest, Verification, DEFAULT_WINDOW};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anchor-patch")]
#[command(
    about = "Replace an exact snippet in a text file using surrounding anchor lines",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// File to patch (relative paths resolve from the current directory)
    #[arg(long, conflicts_with_all = ["spec", "spec_file"])]
    path: Option<PathBuf>,

    /// Text that must appear immediately before the snippet; can span lines
    #[arg(long, conflicts_with_all = ["spec", "spec_file"])]
    anchor_before: Option<String>,

    /// Exact text to be replaced
    #[arg(long, conflicts_with_all = ["spec", "spec_file"])]
    old_snippet: Option<String>,

    /// Replacement text
    #[arg(long, conflicts_with_all = ["spec", "spec_file"])]
    new_snippet: Option<String>,

    /// Text that must appear after the snippet; can span lines
    #[arg(long, conflicts_with_all = ["spec", "spec_file"])]
    anchor_after: Option<String>,

    /// How many characters after anchor_before to search for old_snippet
    /// (increase for huge files)
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// JSON object with all parameters (alternative to individual flags)
    #[arg(long, conflicts_with = "spec_file")]
    spec: Option<String>,

    /// Path to a JSON file with all parameters
    #[arg(long)]
    spec_file: Option<PathBuf>,

    /// Compute and print the diff without writing the file
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    let dry_run = cli.dry_run;

    match build_request(cli).and_then(|request| run(&request, dry_run)) {
        Ok(outcome) => {
            // The unified diff is the audit trail; stdout carries it verbatim.
            print!("{}", outcome.diff);
            if outcome.verification == Verification::Skipped {
                eprintln!(
                    "{}",
                    "Warning: diff verification skipped (no verifier available)".yellow()
                );
            }
        }
        Err(err) => {
            // Structured error channel: automated callers branch on this
            // without parsing prose.
            eprintln!("{}", serde_json::json!({ "error": err.to_string() }));
            std::process::exit(1);
        }
    }
}

fn run(request: &PatchRequest, dry_run: bool) -> Result<PatchOutcome> {
    let engine = PatchEngine::new();
    let outcome = if dry_run {
        engine.preview(request)?
    } else {
        engine.patch(request)?
    };
    Ok(outcome)
}

/// Build the request from either a JSON spec or the individual flags.
fn build_request(cli: Cli) -> Result<PatchRequest> {
    if let Some(spec_file) = &cli.spec_file {
        let source = fs::read_to_string(spec_file)?;
        return parse_spec(&source);
    }
    if let Some(spec) = &cli.spec {
        return parse_spec(spec);
    }

    // Flag form: report every missing required parameter at once, not just
    // the first.
    let mut missing = Vec::new();
    let path = require(cli.path, "path", &mut missing);
    let anchor_before = require(cli.anchor_before, "anchor_before", &mut missing);
    let old_snippet = require(cli.old_snippet, "old_snippet", &mut missing);
    let new_snippet = require(cli.new_snippet, "new_snippet", &mut missing);
    let anchor_after = require(cli.anchor_after, "anchor_after", &mut missing);

    match (path, anchor_before, old_snippet, new_snippet, anchor_after) {
        (Some(path), Some(anchor_before), Some(old_snippet), Some(new_snippet), Some(anchor_after)) => {
            Ok(PatchRequest {
                path,
                anchor_before,
                old_snippet,
                new_snippet,
                anchor_after,
                window: cli.window,
            })
        }
        _ => anyhow::bail!("missing required parameter(s): {}", missing.join(", ")),
    }
}

/// Pass a present flag through; record an absent one by name.
fn require<T>(value: Option<T>, name: &'static str, missing: &mut Vec<&'static str>) -> Option<T> {
    if value.is_none() {
        missing.push(name);
    }
    value
}

fn parse_spec(source: &str) -> Result<PatchRequest> {
    serde_json::from_str(source).map_err(|e| anyhow::anyhow!("invalid spec JSON: {}", e))
}
