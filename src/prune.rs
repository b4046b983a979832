//! Reachability Pruner
//!
//! Reduces a document to the operations in an [`OperationSet`] and the
//! schemas reachable from them. Reachability is the reference graph closure
//! seeded with every schema the kept operations mention.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::PruneConfig;
use crate::document::ApiDocument;
use crate::error::Result;
use crate::graph::{collect_schema_refs, ReferenceGraph, SchemaId};

/// Operation paths to keep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSet {
    paths: BTreeSet<String>,
}

impl OperationSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Counts before and after pruning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSummary {
    pub original_paths: usize,
    pub kept_paths: usize,
    pub original_schemas: usize,
    pub kept_schemas: usize,
}

impl PruneSummary {
    fn percent(kept: usize, original: usize) -> f64 {
        if original == 0 {
            0.0
        } else {
            kept as f64 / original as f64 * 100.0
        }
    }
}

impl fmt::Display for PruneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pruning Summary:")?;
        writeln!(
            f,
            "   Endpoints: {} -> {} ({:.1}% kept)",
            self.original_paths,
            self.kept_paths,
            Self::percent(self.kept_paths, self.original_paths)
        )?;
        write!(
            f,
            "   Schemas: {} -> {} ({:.1}% kept)",
            self.original_schemas,
            self.kept_schemas,
            Self::percent(self.kept_schemas, self.original_schemas)
        )
    }
}

/// Result of a pruning run
#[derive(Debug, Clone)]
pub struct PruneOutcome {
    pub document: ApiDocument,
    pub kept_paths: Vec<String>,
    pub removed_paths: Vec<String>,
    pub kept_schemas: Vec<SchemaId>,
    pub removed_schemas: Vec<SchemaId>,
    /// Keep entries with no matching path in the source
    pub skipped_paths: Vec<String>,
    pub summary: PruneSummary,
}

/// Prunes documents down to an operation set
#[derive(Debug, Clone)]
pub struct Pruner {
    keep: OperationSet,
    extra_security_schemes: Vec<String>,
}

impl Pruner {
    pub fn new(keep: OperationSet) -> Self {
        Self { keep, extra_security_schemes: Vec::new() }
    }

    pub fn from_config(config: &PruneConfig) -> Self {
        Self::new(OperationSet::new(config.keep_paths.iter().cloned()))
            .with_extra_security_schemes(config.extra_security_schemes.iter().cloned())
    }

    /// Schemes kept (and required) whenever the source defines them
    pub fn with_extra_security_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_security_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn operations(&self) -> &OperationSet {
        &self.keep
    }

    pub fn prune(&self, doc: &ApiDocument) -> Result<PruneOutcome> {
        let empty = Map::new();
        let source_paths = doc.paths().unwrap_or(&empty);
        let source_schemas = doc.schemas().unwrap_or(&empty);

        // Paths
        let mut kept_paths_map = Map::new();
        let mut removed_paths = Vec::new();
        let mut seeds: BTreeSet<SchemaId> = BTreeSet::new();

        for (path, operations) in source_paths {
            if self.keep.contains(path) {
                debug!(path = %path, "Keeping endpoint");
                seeds.extend(collect_schema_refs(operations).into_iter().map(|(name, _)| name));
                kept_paths_map.insert(path.clone(), operations.clone());
            } else {
                debug!(path = %path, "Removing endpoint");
                removed_paths.push(path.clone());
            }
        }

        let skipped_paths: Vec<String> = self
            .keep
            .iter()
            .filter(|p| !source_paths.contains_key(p.as_str()))
            .cloned()
            .collect();
        for path in &skipped_paths {
            debug!(path = %path, "Keep path not present in document, skipping");
        }

        // Schemas
        let graph = ReferenceGraph::build(doc);
        let reachable = graph.closure(seeds.iter().map(String::as_str));

        let mut kept_schemas_map = Map::new();
        let mut removed_schemas = Vec::new();
        for (name, schema) in source_schemas {
            if reachable.contains(name) {
                debug!(schema = %name, "Keeping schema");
                kept_schemas_map.insert(name.clone(), schema.clone());
            } else {
                debug!(schema = %name, "Removing schema");
                removed_schemas.push(name.clone());
            }
        }

        // Assemble
        let mut root = Map::new();
        root.insert(
            "openapi".to_string(),
            doc.field("openapi").cloned().unwrap_or_else(|| json!("3.0.1")),
        );
        root.insert("info".to_string(), doc.field("info").cloned().unwrap_or_else(|| json!({})));
        root.insert(
            "servers".to_string(),
            doc.field("servers").cloned().unwrap_or_else(|| json!([])),
        );

        let kept_paths: Vec<String> = kept_paths_map.keys().cloned().collect();
        let kept_schemas: Vec<SchemaId> = kept_schemas_map.keys().cloned().collect();
        root.insert("paths".to_string(), Value::Object(kept_paths_map));

        let mut components = Map::new();
        components.insert("schemas".to_string(), Value::Object(kept_schemas_map));

        let (schemes, security) = self.prune_security(doc);
        if !schemes.is_empty() {
            components.insert(
                "securitySchemes".to_string(),
                Value::Object(schemes.into_iter().collect()),
            );
        }
        root.insert("components".to_string(), Value::Object(components));
        if let Some(security) = security {
            root.insert("security".to_string(), Value::Array(security));
        }

        let summary = PruneSummary {
            original_paths: source_paths.len(),
            kept_paths: kept_paths.len(),
            original_schemas: source_schemas.len(),
            kept_schemas: kept_schemas.len(),
        };
        info!(
            paths = summary.kept_paths,
            schemas = summary.kept_schemas,
            skipped = skipped_paths.len(),
            "Pruned document"
        );

        Ok(PruneOutcome {
            document: ApiDocument::from_value(Value::Object(root))?,
            kept_paths,
            removed_paths,
            kept_schemas,
            removed_schemas,
            skipped_paths,
            summary,
        })
    }

    /// Security schemes referenced by the requirement list, plus the configured extras
    fn prune_security(&self, doc: &ApiDocument) -> (BTreeMap<String, Value>, Option<Vec<Value>>) {
        let mut kept = BTreeMap::new();
        let Some(source_schemes) = doc.security_schemes() else {
            return (kept, doc.security().cloned());
        };

        let mut requirements = doc.security().cloned();
        for requirement in requirements.iter().flatten() {
            for scheme in requirement.as_object().into_iter().flat_map(Map::keys) {
                if let Some(definition) = source_schemes.get(scheme) {
                    kept.insert(scheme.clone(), definition.clone());
                }
            }
        }

        for scheme in &self.extra_security_schemes {
            let Some(definition) = source_schemes.get(scheme) else {
                continue;
            };
            debug!(scheme = %scheme, "Keeping security scheme");
            kept.insert(scheme.clone(), definition.clone());

            let list = requirements.get_or_insert_with(Vec::new);
            let listed = list
                .iter()
                .any(|r| r.as_object().is_some_and(|o| o.contains_key(scheme)));
            if !listed {
                list.push(json!({ scheme.as_str(): [] }));
            }
        }

        (kept, requirements)
    }
}

/// Prune with no extra security schemes
pub fn prune(doc: &ApiDocument, keep: &OperationSet) -> Result<PruneOutcome> {
    Pruner::new(keep.clone()).prune(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses_doc() -> ApiDocument {
        ApiDocument::from_value(json!({
            "openapi": "3.0.1",
            "info": {"title": "Responses", "version": "1.0"},
            "paths": {
                "/responses": {"post": {
                    "requestBody": {"content": {"application/json": {
                        "schema": {"$ref": "#/components/schemas/ResponsesRequest"}
                    }}}
                }},
                "/batches": {"get": {"responses": {"200": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Batch"}
                }}}}}}
            },
            "components": {
                "schemas": {
                    "ResponsesRequest": {"type": "object", "properties": {
                        "expires_after": {"$ref": "#/components/schemas/ExpiresAfter"},
                        "status": {"$ref": "#/components/schemas/Status"}
                    }},
                    "ExpiresAfter": {"type": "object", "properties": {"seconds": {"type": "integer"}}},
                    "Status": {"type": "string", "enum": ["in_progress", "completed"]},
                    "Batch": {"type": "object"}
                },
                "securitySchemes": {
                    "ApiKeyAuth": {"type": "apiKey", "in": "header", "name": "api-key"},
                    "OAuth": {"type": "oauth2"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_prune_keeps_closure() {
        let keep = OperationSet::new(["/responses"]);
        let outcome = prune(&responses_doc(), &keep).unwrap();

        assert_eq!(outcome.kept_paths, vec!["/responses"]);
        assert_eq!(outcome.removed_paths, vec!["/batches"]);
        assert_eq!(outcome.kept_schemas, vec!["ExpiresAfter", "ResponsesRequest", "Status"]);
        assert_eq!(outcome.removed_schemas, vec!["Batch"]);
        assert_eq!(outcome.document.field("info").unwrap()["title"], "Responses");
        assert!(outcome.document.security().is_none());
    }

    #[test]
    fn test_missing_keep_path_is_skipped() {
        let keep = OperationSet::new(["/responses", "/embeddings"]);
        let outcome = prune(&responses_doc(), &keep).unwrap();
        assert_eq!(outcome.skipped_paths, vec!["/embeddings"]);
        assert_eq!(outcome.summary.kept_paths, 1);
    }

    #[test]
    fn test_defaults_for_missing_metadata() {
        let doc = ApiDocument::from_value(json!({"paths": {}})).unwrap();
        let outcome = prune(&doc, &OperationSet::default()).unwrap();
        let value = outcome.document.as_value();
        assert_eq!(value["openapi"], "3.0.1");
        assert_eq!(value["info"], json!({}));
        assert_eq!(value["servers"], json!([]));
        assert_eq!(value["components"], json!({"schemas": {}}));
    }

    #[test]
    fn test_extra_security_scheme() {
        let pruner = Pruner::new(OperationSet::new(["/responses"]))
            .with_extra_security_schemes(["ApiKeyAuth"]);
        let outcome = pruner.prune(&responses_doc()).unwrap();

        let schemes = outcome.document.security_schemes().unwrap();
        assert!(schemes.contains_key("ApiKeyAuth"));
        assert!(!schemes.contains_key("OAuth"));
        assert_eq!(
            outcome.document.security().unwrap(),
            &vec![json!({"ApiKeyAuth": []})]
        );
    }

    #[test]
    fn test_referenced_security_scheme_passes_through() {
        let mut value = responses_doc().into_value();
        value["security"] = json!([{"OAuth": ["read"]}]);
        let doc = ApiDocument::from_value(value).unwrap();

        let outcome = prune(&doc, &OperationSet::new(["/responses"])).unwrap();
        let schemes = outcome.document.security_schemes().unwrap();
        assert_eq!(schemes.keys().collect::<Vec<_>>(), vec!["OAuth"]);
        assert_eq!(outcome.document.security().unwrap(), &vec![json!({"OAuth": ["read"]})]);
    }

    #[test]
    fn test_summary_display() {
        let summary = PruneSummary {
            original_paths: 0,
            kept_paths: 0,
            original_schemas: 4,
            kept_schemas: 3,
        };
        let text = summary.to_string();
        assert!(text.contains("Endpoints: 0 -> 0 (0.0% kept)"));
        assert!(text.contains("Schemas: 4 -> 3 (75.0% kept)"));
    }
}
