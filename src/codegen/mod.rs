//! Code Generation
//!
//! Compiles a (pruned) document into generated declarations.
//!
//! Architecture:
//! - CodegenContext: graph, names and render profile for one run
//! - FieldType: language-agnostic property type, lowered from SchemaShape
//! - Emitters: language-specific text generators over GeneratedDeclaration
//!
//! The key constraint: Emitters NEVER read raw schema JSON - only declarations.

pub mod config;
pub mod names;
pub mod swift;

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::declaration::{
    EnumCase, EnumType, GeneratedDeclaration, Property, RecordType, Snapshot,
};
use crate::document::ApiDocument;
use crate::error::{GeneratorError, Result};
use crate::graph::{PrimitiveKind, PropertyShape, ReferenceGraph, SchemaId, SchemaShape};

use self::config::RenderProfile;
use self::names::{to_pascal_case, NameResolver};

/// Maximum length of an emitted description
const MAX_DESCRIPTION_LEN: usize = 200;

// =============================================================================
// Field Types
// =============================================================================

/// Property type before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Timestamp,
    Locator,
    Int,
    Int64,
    Double,
    Float,
    Bool,
    Sequence(Box<FieldType>),
    /// A generated declaration, by type name
    Named(String),
    /// Opaque structured value
    Placeholder,
}

impl FieldType {
    pub fn render(&self, profile: &RenderProfile) -> String {
        let types = &profile.types;
        match self {
            Self::Text => types.string.clone(),
            Self::Timestamp => types.datetime.clone(),
            Self::Locator => types.uri.clone(),
            Self::Int => types.integer.clone(),
            Self::Int64 => types.int64.clone(),
            Self::Double => types.number.clone(),
            Self::Float => types.float.clone(),
            Self::Bool => types.boolean.clone(),
            Self::Sequence(inner) => profile.wrap_sequence(&inner.render(profile)),
            Self::Named(name) => name.clone(),
            Self::Placeholder => types.any.clone(),
        }
    }

    pub fn contains_placeholder(&self) -> bool {
        match self {
            Self::Placeholder => true,
            Self::Sequence(inner) => inner.contains_placeholder(),
            _ => false,
        }
    }

    /// Innermost named declaration, if any
    pub fn named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Sequence(inner) => inner.named(),
            _ => None,
        }
    }
}

// =============================================================================
// Declaration classification
// =============================================================================

/// What a named schema compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationRole {
    Enum,
    Record,
    /// No declaration; references resolve to the mapped type
    Alias,
}

fn role_of(shape: &SchemaShape) -> DeclarationRole {
    match shape {
        SchemaShape::Enumeration { .. } => DeclarationRole::Enum,
        SchemaShape::Object { properties } if !properties.is_empty() => DeclarationRole::Record,
        _ => DeclarationRole::Alias,
    }
}

// =============================================================================
// CodegenContext
// =============================================================================

/// Compilation context for one document
pub struct CodegenContext {
    graph: ReferenceGraph,
    resolver: NameResolver,
    profile: RenderProfile,

    /// Detected shape and role per schema
    shapes: BTreeMap<SchemaId, (SchemaShape, DeclarationRole)>,

    /// Schemas that own a declaration name, by type name
    declared_names: BTreeMap<String, SchemaId>,

    /// Names taken by any declaration, including synthesized ones
    taken_names: BTreeSet<String>,

    /// Inline enums discovered while lowering records
    synthesized: Vec<EnumType>,
}

impl CodegenContext {
    /// Build the context, failing on references to missing schemas
    pub fn build(doc: &ApiDocument, config: &GeneratorConfig) -> Result<Self> {
        let graph = ReferenceGraph::build(doc);

        if let Some((from, target)) = graph.dangling_refs().into_iter().next() {
            return Err(GeneratorError::UnresolvableReference {
                from: from.clone(),
                target: target.clone(),
            });
        }

        let resolver = NameResolver::new(config.naming.clone(), &config.render);

        let mut shapes = BTreeMap::new();
        let mut declared_names = BTreeMap::new();
        for name in graph.names() {
            let Some(shape) = graph.shape(name) else {
                continue;
            };
            let role = role_of(&shape);
            if role != DeclarationRole::Alias {
                let type_name = resolver.type_name(name);
                if let Some(first) = declared_names.get(&type_name) {
                    warn!(
                        schema = %name,
                        type_name = %type_name,
                        first = %first,
                        referenced_by = ?graph.refs_in(name),
                        "Skipping schema with duplicate generated name"
                    );
                } else {
                    declared_names.insert(type_name, name.clone());
                }
            } else {
                debug!(schema = %name, shape = shape.label(), "Schema compiles to an alias");
            }
            shapes.insert(name.clone(), (shape, role));
        }

        let taken_names = declared_names.keys().cloned().collect();

        Ok(Self {
            graph,
            resolver,
            profile: config.render.clone(),
            shapes,
            declared_names,
            taken_names,
            synthesized: Vec::new(),
        })
    }

    /// Compile every declaration: schema enums, inline enums, then records
    pub fn compile(mut self) -> GeneratedDocument {
        let owners: Vec<(String, SchemaId)> = self
            .declared_names
            .iter()
            .map(|(type_name, schema)| (type_name.clone(), schema.clone()))
            .collect();

        // declared_names is keyed by type name; emit in source-name order
        let mut owners_by_source: Vec<&(String, SchemaId)> = owners.iter().collect();
        owners_by_source.sort_by(|a, b| a.1.cmp(&b.1));

        let mut enums = Vec::new();
        let mut records = Vec::new();

        for (type_name, schema) in owners_by_source {
            let Some((shape, role)) = self.shapes.get(schema).cloned() else {
                continue;
            };
            let description = self.schema_description(schema);
            match (role, shape) {
                (DeclarationRole::Enum, SchemaShape::Enumeration { values }) => {
                    enums.push(EnumType {
                        name: type_name.clone(),
                        source_name: Some(schema.clone()),
                        description,
                        cases: self.enum_cases(&values),
                    });
                }
                (DeclarationRole::Record, SchemaShape::Object { properties }) => {
                    records.push(self.compile_record(type_name, schema, &properties, description));
                }
                _ => {}
            }
        }

        propagate_equatable(&mut records);

        let mut declarations: Vec<GeneratedDeclaration> =
            enums.into_iter().map(GeneratedDeclaration::Enum).collect();
        declarations.extend(self.synthesized.drain(..).map(GeneratedDeclaration::Enum));
        declarations.extend(records.into_iter().map(GeneratedDeclaration::Record));

        info!(
            declarations = declarations.len(),
            schemas = self.graph.schema_count(),
            "Compiled declarations"
        );

        GeneratedDocument { declarations, profile: self.profile }
    }

    fn schema_description(&self, schema: &str) -> Option<String> {
        self.graph
            .get_raw(schema)
            .and_then(|raw| raw.get("description"))
            .and_then(|d| d.as_str())
            .and_then(clean_description)
    }

    fn compile_record(
        &mut self,
        type_name: &str,
        schema: &str,
        properties: &[PropertyShape],
        description: Option<String>,
    ) -> RecordType {
        let mut compiled = Vec::with_capacity(properties.len());
        let mut field_types = Vec::with_capacity(properties.len());

        for prop in properties {
            let owner = InlineOwner { record_type: type_name, record_schema: schema, property: &prop.name };
            let field = self.lower(&prop.shape, Some(&owner), &mut Vec::new());
            compiled.push(Property {
                name: self.resolver.member_name(&prop.name),
                wire_name: prop.name.clone(),
                type_expr: field.render(&self.profile),
                optional: !prop.required,
                description: prop.description.as_deref().and_then(clean_description),
            });
            field_types.push(field);
        }

        let mut member_names: Vec<String> = compiled.iter().map(|p| p.name.clone()).collect();
        uniquify(&mut member_names);
        for (prop, name) in compiled.iter_mut().zip(member_names) {
            prop.name = name;
        }

        let equatable = !field_types.iter().any(FieldType::contains_placeholder);

        RecordType {
            name: type_name.to_string(),
            source_name: Some(schema.to_string()),
            description,
            properties: compiled,
            equatable,
        }
    }

    /// Lower a shape to a field type
    fn lower(
        &mut self,
        shape: &SchemaShape,
        owner: Option<&InlineOwner<'_>>,
        visiting: &mut Vec<SchemaId>,
    ) -> FieldType {
        match shape {
            SchemaShape::Primitive { primitive, format } => lower_primitive(*primitive, format.as_deref()),
            SchemaShape::Array { items } => FieldType::Sequence(Box::new(self.lower(items, owner, visiting))),
            SchemaShape::Enumeration { values } => match owner {
                Some(owner) => self.synthesize_enum(owner, values),
                None => FieldType::Text,
            },
            SchemaShape::Reference { target } => self.resolve_reference(target, visiting),
            SchemaShape::Object { .. } | SchemaShape::Union { .. } => FieldType::Placeholder,
            SchemaShape::Unknown { description } => {
                debug!(reason = %description, "Unrepresentable shape, using placeholder");
                FieldType::Placeholder
            }
        }
    }

    /// References resolve by lookup; aliases are followed to their mapped type
    fn resolve_reference(&mut self, target: &str, visiting: &mut Vec<SchemaId>) -> FieldType {
        let Some((shape, role)) = self.shapes.get(target).cloned() else {
            return FieldType::Placeholder;
        };

        if role != DeclarationRole::Alias {
            let type_name = self.resolver.type_name(target);
            if self.declared_names.get(&type_name).map(String::as_str) != Some(target) {
                warn!(
                    schema = %target,
                    type_name = %type_name,
                    "Reference to a schema skipped for its duplicate name, using placeholder"
                );
                return FieldType::Placeholder;
            }
            return FieldType::Named(type_name);
        }

        if visiting.iter().any(|v| v == target) {
            debug!(schema = %target, "Alias cycle, using placeholder");
            return FieldType::Placeholder;
        }

        visiting.push(target.to_string());
        let field = self.lower(&shape, None, visiting);
        visiting.pop();
        field
    }

    /// Declare an enum for an inline string enumeration on a record property
    fn synthesize_enum(&mut self, owner: &InlineOwner<'_>, values: &[String]) -> FieldType {
        let name = format!("{}{}", owner.record_type, to_pascal_case(owner.property))
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>();

        if !self.taken_names.insert(name.clone()) {
            warn!(
                schema = %owner.record_schema,
                property = %owner.property,
                type_name = %name,
                "Inline enum name already taken, falling back to text"
            );
            return FieldType::Text;
        }

        self.synthesized.push(EnumType {
            name: name.clone(),
            source_name: Some(format!("{}.{}", owner.record_schema, owner.property)),
            description: None,
            cases: self.enum_cases(values),
        });
        FieldType::Named(name)
    }

    fn enum_cases(&self, values: &[String]) -> Vec<EnumCase> {
        let mut identifiers: Vec<String> = values
            .iter()
            .map(|v| self.resolver.enum_case_identifier(v))
            .collect();
        uniquify(&mut identifiers);

        identifiers
            .into_iter()
            .zip(values)
            .map(|(identifier, value)| EnumCase { identifier, value: value.clone() })
            .collect()
    }
}

/// Record property that owns an inline enumeration
struct InlineOwner<'a> {
    record_type: &'a str,
    record_schema: &'a str,
    property: &'a str,
}

fn lower_primitive(kind: PrimitiveKind, format: Option<&str>) -> FieldType {
    match (kind, format) {
        (PrimitiveKind::String, Some("date-time")) => FieldType::Timestamp,
        (PrimitiveKind::String, Some("uri")) => FieldType::Locator,
        (PrimitiveKind::String, _) => FieldType::Text,
        (PrimitiveKind::Integer, Some("int64")) => FieldType::Int64,
        (PrimitiveKind::Integer, _) => FieldType::Int,
        (PrimitiveKind::Number, Some("float")) => FieldType::Float,
        (PrimitiveKind::Number, _) => FieldType::Double,
        (PrimitiveKind::Boolean, _) => FieldType::Bool,
    }
}

/// Suffix repeated identifiers with `_2`, `_3`, ...
fn uniquify(identifiers: &mut [String]) {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for ident in identifiers.iter_mut() {
        if seen.insert(ident.clone()) {
            continue;
        }
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{}_{}", ident, n);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        seen.insert(unique.clone());
        *ident = unique;
    }
}

/// A record referencing a non-equatable record is not equatable either
fn propagate_equatable(records: &mut [RecordType]) {
    loop {
        let opaque: BTreeSet<String> = records
            .iter()
            .filter(|r| !r.equatable)
            .map(|r| r.name.clone())
            .collect();

        let mut changed = false;
        for record in records.iter_mut().filter(|r| r.equatable) {
            let references_opaque = record.properties.iter().any(|p| {
                opaque.contains(innermost_type(&p.type_expr))
            });
            if references_opaque {
                record.equatable = false;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }
}

/// `[[GeneratedFoo]]` -> `GeneratedFoo`
fn innermost_type(type_expr: &str) -> &str {
    type_expr.trim_start_matches('[').trim_end_matches(']')
}

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid markdown link regex"));

static LIST_KEY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^- `[^`]+`:").expect("valid list key regex"));

/// Single-line doc text: links flattened, list keys dropped, whitespace collapsed, truncated
pub fn clean_description(raw: &str) -> Option<String> {
    let text = MARKDOWN_LINK.replace_all(raw, "$1");
    let text = LIST_KEY_PREFIX.replace_all(&text, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.is_empty() {
        return None;
    }
    if text.chars().count() > MAX_DESCRIPTION_LEN {
        let truncated: String = text.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
        return Some(format!("{}...", truncated.trim_end()));
    }
    Some(text)
}

// =============================================================================
// Generated Output
// =============================================================================

/// Output of one compilation
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub declarations: Vec<GeneratedDeclaration>,
    pub profile: RenderProfile,
}

impl GeneratedDocument {
    /// Render the declarations document
    pub fn emit_swift(&self) -> String {
        swift::emit_document(&self.declarations, &self.profile)
    }

    /// Structured form persisted beside the rendered artifact
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.declarations.clone())
    }

    pub fn enum_count(&self) -> usize {
        self.declarations.iter().filter(|d| d.as_enum().is_some()).count()
    }

    pub fn record_count(&self) -> usize {
        self.declarations.iter().filter(|d| d.as_record().is_some()).count()
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Compile a document into declarations
pub fn compile(doc: &ApiDocument, config: &GeneratorConfig) -> Result<GeneratedDocument> {
    Ok(CodegenContext::build(doc, config)?.compile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile_schemas(schemas: serde_json::Value) -> Result<GeneratedDocument> {
        let doc = ApiDocument::from_value(json!({"components": {"schemas": schemas}})).unwrap();
        compile(&doc, &GeneratorConfig::default())
    }

    fn record<'a>(doc: &'a GeneratedDocument, name: &str) -> &'a RecordType {
        doc.declarations
            .iter()
            .filter_map(GeneratedDeclaration::as_record)
            .find(|r| r.name == name)
            .unwrap()
    }

    #[test]
    fn test_primitive_mapping() {
        let doc = compile_schemas(json!({
            "Sample": {"type": "object", "required": ["id"], "properties": {
                "id": {"type": "string"},
                "created_at": {"type": "string", "format": "date-time"},
                "homepage": {"type": "string", "format": "uri"},
                "count": {"type": "integer"},
                "bytes": {"type": "integer", "format": "int64"},
                "score": {"type": "number"},
                "ratio": {"type": "number", "format": "float"},
                "enabled": {"type": "boolean"},
                "tags": {"type": "array", "items": {"type": "string"}}
            }}
        }))
        .unwrap();

        let sample = record(&doc, "GeneratedSample");
        let types: Vec<(&str, String)> = sample
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.rendered_type("?")))
            .collect();
        assert_eq!(
            types,
            vec![
                ("bytes", "Int64?".to_string()),
                ("count", "Int?".to_string()),
                ("createdAt", "Date?".to_string()),
                ("enabled", "Bool?".to_string()),
                ("homepage", "URL?".to_string()),
                ("id", "String".to_string()),
                ("ratio", "Float?".to_string()),
                ("score", "Double?".to_string()),
                ("tags", "[String]?".to_string()),
            ]
        );
        assert!(sample.equatable);
        assert!(sample.needs_wire_names());
    }

    #[test]
    fn test_enums_before_records() {
        let doc = compile_schemas(json!({
            "A": {"type": "object", "properties": {"s": {"$ref": "#/components/schemas/Status"}}},
            "Status": {"type": "string", "enum": ["in_progress", "completed"]}
        }))
        .unwrap();

        assert_eq!(doc.declarations[0].name(), "GeneratedStatus");
        assert_eq!(doc.declarations[1].name(), "GeneratedA");
        let a = record(&doc, "GeneratedA");
        assert_eq!(a.properties[0].type_expr, "GeneratedStatus");
    }

    #[test]
    fn test_placeholder_disables_equatable_transitively() {
        let doc = compile_schemas(json!({
            "Inner": {"type": "object", "properties": {
                "payload": {"anyOf": [{"type": "string"}, {"type": "integer"}]}
            }},
            "Outer": {"type": "object", "properties": {
                "inners": {"type": "array", "items": {"$ref": "#/components/schemas/Inner"}}
            }},
            "Plain": {"type": "object", "properties": {"name": {"type": "string"}}}
        }))
        .unwrap();

        assert_eq!(record(&doc, "GeneratedInner").properties[0].type_expr, "SAOAIJSONValue");
        assert!(!record(&doc, "GeneratedInner").equatable);
        assert!(!record(&doc, "GeneratedOuter").equatable);
        assert!(record(&doc, "GeneratedPlain").equatable);
    }

    #[test]
    fn test_alias_references_resolve_through() {
        let doc = compile_schemas(json!({
            "Id": {"type": "string"},
            "Ids": {"type": "array", "items": {"$ref": "#/components/schemas/Id"}},
            "Loop": {"$ref": "#/components/schemas/Loop"},
            "Holder": {"type": "object", "properties": {
                "ids": {"$ref": "#/components/schemas/Ids"},
                "loop": {"$ref": "#/components/schemas/Loop"},
                "meta": {"type": "object"}
            }}
        }))
        .unwrap();

        assert_eq!(doc.declarations.len(), 1);
        let holder = record(&doc, "GeneratedHolder");
        assert_eq!(holder.properties[0].type_expr, "[String]");
        assert_eq!(holder.properties[1].type_expr, "SAOAIJSONValue");
        assert_eq!(holder.properties[2].type_expr, "SAOAIJSONValue");
    }

    #[test]
    fn test_inline_enum_is_synthesized() {
        let doc = compile_schemas(json!({
            "Widget": {"type": "object", "properties": {
                "size": {"type": "string", "enum": ["small", "large"]}
            }}
        }))
        .unwrap();

        let GeneratedDeclaration::Enum(size) = &doc.declarations[0] else {
            panic!("expected synthesized enum first");
        };
        assert_eq!(size.name, "GeneratedWidgetSize");
        assert_eq!(size.source_name.as_deref(), Some("Widget.size"));
        assert_eq!(record(&doc, "GeneratedWidget").properties[0].type_expr, "GeneratedWidgetSize");
    }

    #[test]
    fn test_inline_enum_collision_falls_back_to_text() {
        let doc = compile_schemas(json!({
            "WidgetSize": {"type": "string", "enum": ["s"]},
            "Widget": {"type": "object", "properties": {
                "size": {"type": "string", "enum": ["small", "large"]}
            }}
        }))
        .unwrap();
        assert_eq!(record(&doc, "GeneratedWidget").properties[0].type_expr, "String");
        assert_eq!(doc.enum_count(), 1);
    }

    #[test]
    fn test_duplicate_generated_names_keep_first() {
        let doc = compile_schemas(json!({
            "OpenAI.Item": {"type": "object", "properties": {"a": {"type": "string"}}},
            "AzureItem": {"type": "object", "properties": {"b": {"type": "string"}}}
        }))
        .unwrap();
        assert_eq!(doc.record_count(), 1);
        assert_eq!(record(&doc, "GeneratedItem").source_name.as_deref(), Some("AzureItem"));
    }

    #[test]
    fn test_reference_to_skipped_duplicate_is_placeholder() {
        let doc = compile_schemas(json!({
            "AzureItem": {"type": "object", "properties": {"b": {"type": "integer"}}},
            "OpenAI.Item": {"type": "object", "properties": {"a": {"type": "string"}}},
            "Holder": {"type": "object", "properties": {
                "item": {"$ref": "#/components/schemas/OpenAI.Item"},
                "kept": {"$ref": "#/components/schemas/AzureItem"}
            }}
        }))
        .unwrap();

        let holder = record(&doc, "GeneratedHolder");
        assert_eq!(holder.property("item").unwrap().type_expr, "SAOAIJSONValue");
        assert_eq!(holder.property("kept").unwrap().type_expr, "GeneratedItem");
        assert!(!holder.equatable);
    }

    #[test]
    fn test_integer_enums_map_to_integers() {
        let doc = compile_schemas(json!({
            "Priority": {"type": "integer", "enum": [10, 20]},
            "Widget": {"type": "object", "properties": {
                "level": {"type": "integer", "enum": [1, 2, 3]},
                "priority": {"$ref": "#/components/schemas/Priority"},
                "wide": {"type": "integer", "format": "int64", "enum": [1]}
            }}
        }))
        .unwrap();

        assert_eq!(doc.enum_count(), 0);
        let widget = record(&doc, "GeneratedWidget");
        assert_eq!(widget.property("level").unwrap().rendered_type("?"), "Int?");
        assert_eq!(widget.property("priority").unwrap().rendered_type("?"), "Int?");
        assert_eq!(widget.property("wide").unwrap().rendered_type("?"), "Int64?");
    }

    #[test]
    fn test_non_ascii_names_are_transliterated() {
        let doc = compile_schemas(json!({
            "Café": {"type": "object", "properties": {"naïve_flag": {"type": "boolean"}}}
        }))
        .unwrap();

        let cafe = record(&doc, "GeneratedCaf");
        assert_eq!(cafe.properties[0].name, "na_veFlag");
        assert_eq!(cafe.properties[0].wire_name, "naïve_flag");

        let parsed = crate::snapshot::parse_swift(&doc.emit_swift());
        assert_eq!(parsed, doc.declarations);
    }

    #[test]
    fn test_keyword_enum_cases_are_escaped() {
        let doc = compile_schemas(json!({
            "Flag": {"type": "string", "enum": ["true", "false", "try"]}
        }))
        .unwrap();

        let code = doc.emit_swift();
        assert!(code.contains("    case `true` = \"true\"\n"));
        assert!(code.contains("    case `false` = \"false\"\n"));
        assert!(code.contains("    case `try` = \"try\"\n"));
    }

    #[test]
    fn test_enum_case_identifiers_are_unique() {
        let doc = compile_schemas(json!({
            "Mode": {"type": "string", "enum": ["a-b", "a.b", "A_B", ""]}
        }))
        .unwrap();
        let mode = doc.declarations[0].as_enum().unwrap();
        let idents: Vec<&str> = mode.cases.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(idents, vec!["a_b", "a_b_2", "a_b_3", "unknown"]);
        assert_eq!(mode.cases[1].value, "a.b");
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let err = compile_schemas(json!({
            "A": {"type": "object", "properties": {"b": {"$ref": "#/components/schemas/Missing"}}}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnresolvableReference { ref from, ref target } if from == "A" && target == "Missing"
        ));
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(
            clean_description("See [the docs](https://example.com)\n\n  for   more."),
            Some("See the docs for more.".to_string())
        );
        assert_eq!(clean_description("- `auto`: pick one"), Some("pick one".to_string()));
        assert_eq!(clean_description("   "), None);

        let long = "word ".repeat(100);
        let cleaned = clean_description(&long).unwrap();
        assert!(cleaned.ends_with("..."));
        assert!(cleaned.chars().count() <= MAX_DESCRIPTION_LEN);
    }
}
