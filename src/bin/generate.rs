//! Swift Model Generation CLI
//!
//! Compiles a pruned OpenAPI document into Swift declarations and writes the
//! structured snapshot beside them.
//!
//! Usage:
//!   model-generate --input Specs/pruned-openapi.json --output Generated/GeneratedModels.swift

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use openapi_model_gen::snapshot::sidecar_path;
use openapi_model_gen::{compile, ApiDocument, Checksum, GeneratorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "model-generate")]
#[command(about = "Generate Swift models from a pruned OpenAPI document")]
struct Cli {
    /// Pruned OpenAPI document (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Swift file to write
    #[arg(short, long)]
    output: PathBuf,

    /// Structured snapshot path (defaults to <output>.snapshot.json)
    #[arg(long, conflicts_with = "no_snapshot")]
    snapshot: Option<PathBuf>,

    /// Do not write a structured snapshot
    #[arg(long)]
    no_snapshot: bool,

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

    let doc = ApiDocument::load(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    println!("📖 Loaded {} ({} schemas)", cli.input.display(), doc.schema_count());

    // Compile fully before touching the output
    let generated = compile(&doc, &config)?;
    let code = generated.emit_swift();
    let snapshot = generated.snapshot();
    let snapshot_json = snapshot.to_json()?;
    let checksum = Checksum::of_snapshot(&snapshot)?;

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&cli.output, &code)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    println!("✅ Generated models written to: {}", cli.output.display());

    if !cli.no_snapshot {
        let snapshot_path = cli.snapshot.unwrap_or_else(|| sidecar_path(&cli.output));
        std::fs::write(&snapshot_path, &snapshot_json)
            .with_context(|| format!("failed to write {}", snapshot_path.display()))?;
        println!(
            "✅ Snapshot written to: {} ({})",
            snapshot_path.display(),
            checksum.short()
        );
    }

    println!(
        "Generated {} enums and {} structs",
        generated.enum_count(),
        generated.record_count()
    );

    Ok(())
}
