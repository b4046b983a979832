//! Schema Reference Graph
//!
//! Read-only index over `components.schemas` using petgraph for `$ref`
//! dependencies. Cycles are fine: closure is a worklist over a visited set.
//!
//! Shared by:
//! - the pruner (reachability closure)
//! - the compiler (reference validation, alias resolution)

pub mod shape;

pub use shape::{detect_shape, PrimitiveKind, PropertyShape, SchemaShape};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::trace;

use crate::document::ApiDocument;

/// JSON pointer prefix of schema component references
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Schema identifier (its key under `components.schemas`)
pub type SchemaId = String;

/// Where in the source schema a reference occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Direct `$ref` (schema is an alias)
    Ref,
    /// Property field type
    Property,
    /// `items` array element type
    Items,
    /// `anyOf` / `oneOf` / `allOf` member
    Union,
    /// `additionalProperties` map value type
    AdditionalProperties,
}

impl EdgeKind {
    fn for_key(key: &str) -> Option<Self> {
        match key {
            "properties" => Some(Self::Property),
            "items" => Some(Self::Items),
            "anyOf" | "oneOf" | "allOf" => Some(Self::Union),
            "additionalProperties" => Some(Self::AdditionalProperties),
            _ => None,
        }
    }
}

/// Schema name from a `#/components/schemas/<Name>` reference, JSON pointer escapes decoded
pub fn schema_name_from_ref(ref_path: &str) -> Option<String> {
    let name = ref_path.strip_prefix(SCHEMA_REF_PREFIX)?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name.replace("~1", "/").replace("~0", "~"))
}

/// Collect every schema reference under `value`, labelled by where it occurs.
///
/// An object carrying `$ref` is a reference and is not descended into.
pub fn collect_schema_refs(value: &Value) -> Vec<(SchemaId, EdgeKind)> {
    let mut refs = Vec::new();
    walk_refs(value, EdgeKind::Ref, &mut refs);
    refs
}

fn walk_refs(value: &Value, kind: EdgeKind, refs: &mut Vec<(SchemaId, EdgeKind)>) {
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(Value::as_str) {
                if let Some(name) = schema_name_from_ref(ref_path) {
                    refs.push((name, kind));
                }
                return;
            }
            for (key, child) in obj {
                walk_refs(child, EdgeKind::for_key(key).unwrap_or(kind), refs);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_refs(item, kind, refs);
            }
        }
        _ => {}
    }
}

/// The schema reference graph
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    /// Primary graph structure, one node per named schema
    graph: DiGraph<SchemaId, EdgeKind>,

    /// Node index lookup: name -> NodeIndex
    node_indices: HashMap<SchemaId, NodeIndex>,

    /// Raw JSON per schema
    raw_schemas: BTreeMap<SchemaId, Value>,

    /// References whose target is not a named schema: source -> targets
    dangling: BTreeMap<SchemaId, BTreeSet<SchemaId>>,
}

impl ReferenceGraph {
    /// Build the graph over a document's named schemas
    pub fn build(doc: &ApiDocument) -> Self {
        match doc.schemas() {
            Some(schemas) => Self::from_schemas(schemas),
            None => Self::default(),
        }
    }

    /// Build the graph over a `components.schemas` map
    pub fn from_schemas(schemas: &Map<String, Value>) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut raw_schemas = BTreeMap::new();

        for (name, schema) in schemas {
            let idx = graph.add_node(name.clone());
            node_indices.insert(name.clone(), idx);
            raw_schemas.insert(name.clone(), schema.clone());
        }

        let mut dangling: BTreeMap<SchemaId, BTreeSet<SchemaId>> = BTreeMap::new();

        for (name, schema) in schemas {
            let source = node_indices[name];
            for (target, kind) in collect_schema_refs(schema) {
                match node_indices.get(&target) {
                    Some(&target_idx) => {
                        if graph.find_edge(source, target_idx).is_none() {
                            graph.add_edge(source, target_idx, kind);
                        }
                    }
                    None => {
                        dangling.entry(name.clone()).or_default().insert(target);
                    }
                }
            }
        }

        tracing::debug!(
            schemas = graph.node_count(),
            edges = graph.edge_count(),
            dangling = dangling.len(),
            "Built reference graph"
        );

        Self { graph, node_indices, raw_schemas, dangling }
    }

    // ========== Public API ==========

    /// Get schema count
    pub fn schema_count(&self) -> usize {
        self.raw_schemas.len()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Get raw JSON schema by name
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.raw_schemas.get(name)
    }

    /// Detected shape of a named schema
    pub fn shape(&self, name: &str) -> Option<SchemaShape> {
        self.raw_schemas.get(name).map(detect_shape)
    }

    /// Schema names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &SchemaId> {
        self.raw_schemas.keys()
    }

    /// Get immediate outgoing refs (dependencies), sorted
    pub fn refs_out(&self, name: &str) -> Vec<&SchemaId> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Get immediate incoming refs (dependents), sorted
    pub fn refs_in(&self, name: &str) -> Vec<&SchemaId> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&SchemaId> {
        let Some(&node_idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut result: Vec<&SchemaId> = self
            .graph
            .edges_directed(node_idx, direction)
            .filter_map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph.node_weight(other)
            })
            .collect();
        result.sort();
        result.dedup();
        result
    }

    /// Transitive closure over outgoing references, seeds included.
    ///
    /// Seeds that are not named schemas are ignored.
    pub fn closure<'a, I>(&self, seeds: I) -> BTreeSet<SchemaId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut reached = BTreeSet::new();
        let mut worklist: Vec<NodeIndex> = seeds
            .into_iter()
            .filter_map(|s| self.node_indices.get(s).copied())
            .collect();

        while let Some(node_idx) = worklist.pop() {
            let Some(name) = self.graph.node_weight(node_idx) else {
                continue;
            };
            if !reached.insert(name.clone()) {
                continue;
            }
            for edge in self.graph.edges_directed(node_idx, Direction::Outgoing) {
                trace!(
                    from = %name,
                    to = ?self.graph.node_weight(edge.target()),
                    kind = ?edge.weight(),
                    "Following reference"
                );
                worklist.push(edge.target());
            }
        }

        reached
    }

    /// References whose target is not a named schema, as (source, target) pairs
    pub fn dangling_refs(&self) -> Vec<(&SchemaId, &SchemaId)> {
        self.dangling
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |t| (source, t)))
            .collect()
    }
}
