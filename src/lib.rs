//! OpenAPI Model Generator
//!
//! Turns an OpenAPI document into Swift model declarations and tracks how
//! those declarations evolve between releases.
//!
//! ## Pipeline
//!
//! ```text
//! full document
//!   └─ prune ──────────▶ pruned document (kept operations + reachable schemas)
//!        └─ compile ───▶ GeneratedModels.swift + GeneratedModels.swift.snapshot.json
//!
//! old snapshot ─┐
//!               ├─ diff ─▶ report.json + summary.md (major / minor / patch)
//! new snapshot ─┘
//! ```
//!
//! ## Features
//!
//! - **Reachability Pruning**: keep an allow-list of operations and only the schemas they need
//! - **Deterministic Naming**: one ordered override table, marker prefix on every type
//! - **Structured Snapshots**: every artifact carries its declarations as JSON
//! - **Semantic Diffing**: conservative semver classification of model changes

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod declaration;
pub mod diff;
pub mod document;
pub mod error;
pub mod graph;
pub mod prune;
pub mod report;
pub mod snapshot;
pub mod version;

pub use checksum::Checksum;
pub use codegen::{compile, CodegenContext, GeneratedDocument};
pub use config::GeneratorConfig;
pub use declaration::{EnumCase, EnumType, GeneratedDeclaration, Property, RecordType, Snapshot};
pub use diff::{diff, DiffResult, Severity};
pub use document::ApiDocument;
pub use error::{GeneratorError, Result};
pub use graph::ReferenceGraph;
pub use prune::{prune, OperationSet, PruneOutcome, Pruner};
pub use report::ChangeReport;
pub use snapshot::DeclarationMap;
pub use version::SchemaVersion;
