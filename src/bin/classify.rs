//! Model Change Classification CLI
//!
//! Compares two generated model artifacts and recommends a semantic version
//! bump.
//!
//! Usage:
//!   model-classify --old old/GeneratedModels.swift --new Generated/GeneratedModels.swift --out summary.md --json report.json
//!   model-classify --old old.swift --new new.swift --out summary.md --json report.json --model-changed True

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use openapi_model_gen::diff::diff_with_profile;
use openapi_model_gen::snapshot::{load_file, SnapshotFormat};
use openapi_model_gen::{ChangeReport, GeneratorConfig, SchemaVersion};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "model-classify")]
#[command(about = "Classify changes between two generated model artifacts")]
struct Cli {
    /// Previous artifact (Swift file or structured snapshot)
    #[arg(long)]
    old: PathBuf,

    /// Current artifact (Swift file or structured snapshot)
    #[arg(long)]
    new: PathBuf,

    /// Markdown summary output
    #[arg(long)]
    out: PathBuf,

    /// JSON report output
    #[arg(long)]
    json: PathBuf,

    /// Whether the raw model file changed, `true` or `false` in any case
    /// (computed from the texts when omitted)
    #[arg(long, value_parser = parse_flag)]
    model_changed: Option<bool>,

    /// Current released version, used to compute the next one
    #[arg(long)]
    current_version: Option<String>,

    /// Explicit config file
    #[arg(short, long)]
    config: Option<String>,
}

/// Case-insensitive `true` / `false`
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("expected true or false, got `{}`", other)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GeneratorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    let old = load_file(&cli.old).with_context(|| format!("failed to load {}", cli.old.display()))?;
    let new = load_file(&cli.new).with_context(|| format!("failed to load {}", cli.new.display()))?;

    for (path, loaded) in [(&cli.old, &old), (&cli.new, &new)] {
        if loaded.format == SnapshotFormat::SwiftText && loaded.declarations.is_empty() {
            println!("⚠️  No declarations recognized in {}", path.display());
        }
    }
    info!(
        old = old.declarations.len(),
        new = new.declarations.len(),
        "Loaded declarations"
    );

    let result = diff_with_profile(&old.declarations, &new.declarations, &config.render);

    let mut report = ChangeReport::new(result, &old.text, &new.text).with_raw_changed(cli.model_changed);
    info!(
        old = report.old_checksum.short(),
        new = report.new_checksum.short(),
        "Artifact checksums"
    );

    let mut next_tag = None;
    if let Some(current) = &cli.current_version {
        let current = SchemaVersion::parse(current)?;
        next_tag = Some(current.bump(report.diff.severity).tag_string());
        report = report.with_current_version(&current);
    }

    std::fs::write(&cli.out, report.to_markdown())
        .with_context(|| format!("failed to write {}", cli.out.display()))?;

    std::fs::write(&cli.json, report.to_json()?)
        .with_context(|| format!("failed to write {}", cli.json.display()))?;
    println!("📄 Report written to: {}", cli.json.display());

    println!("Recommended semantic version bump: {}", report.diff.severity);
    if let Some(tag) = &next_tag {
        println!("Next tag: {}", tag);
    }
    println!("✅ Summary written to: {}", cli.out.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_changed_is_case_insensitive() {
        assert_eq!(parse_flag("True"), Ok(true));
        assert_eq!(parse_flag("FALSE"), Ok(false));
        assert!(parse_flag("yes").is_err());

        let cli = Cli::try_parse_from([
            "model-classify", "--old", "a.swift", "--new", "b.swift",
            "--out", "s.md", "--json", "r.json", "--model-changed", "True",
        ])
        .unwrap();
        assert_eq!(cli.model_changed, Some(true));
    }

    #[test]
    fn test_both_outputs_are_required() {
        let missing_json = Cli::try_parse_from([
            "model-classify", "--old", "a.swift", "--new", "b.swift", "--out", "s.md",
        ]);
        assert!(missing_json.is_err());
    }
}
