//! OpenAPI Pruning CLI
//!
//! Reduces a full OpenAPI document to the configured operations and the
//! schemas they reach.
//!
//! Usage:
//!   spec-prune --input Specs/openapi-full.json --output Specs/pruned-openapi.json
//!   spec-prune --input full.json --output pruned.json --keep /responses --keep /files

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use openapi_model_gen::{ApiDocument, GeneratorConfig, OperationSet, Pruner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spec-prune")]
#[command(about = "Prune an OpenAPI document to selected operations and reachable schemas")]
struct Cli {
    /// Full OpenAPI document (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the pruned document
    #[arg(short, long)]
    output: PathBuf,

    /// Operation path to keep (repeatable; replaces the configured list)
    #[arg(short, long)]
    keep: Vec<String>,

    /// Explicit config file
    #[arg(short, long)]
    config: Option<String>,
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

    let mut pruner = Pruner::from_config(&config.prune);
    if !cli.keep.is_empty() {
        pruner = Pruner::new(OperationSet::new(cli.keep.iter().cloned()))
            .with_extra_security_schemes(config.prune.extra_security_schemes.iter().cloned());
    }

    println!("📖 Input: {}", cli.input.display());
    println!("🔑 Keeping {} operations", pruner.operations().len());
    println!("📝 Output: {}", cli.output.display());

    let doc = ApiDocument::load(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let outcome = pruner.prune(&doc)?;

    for path in &outcome.skipped_paths {
        println!("⚠️  Not in document, skipped: {}", path);
    }

    outcome
        .document
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("\n{}", outcome.summary);
    println!("✅ Pruned document saved to: {}", cli.output.display());

    Ok(())
}
