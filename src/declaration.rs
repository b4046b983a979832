//! Generated declarations
//!
//! The logical shape of a generated type. The compiler produces these
//! directly; the snapshot parser recovers them from persisted artifacts.
//! Both paths must agree for the same input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// Current structured snapshot format
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Declaration kind, as reported in kind changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Struct,
    Enum,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Struct => write!(f, "struct"),
            Self::Enum => write!(f, "enum"),
        }
    }
}

/// A record or enumeration declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeneratedDeclaration {
    #[serde(rename = "struct")]
    Record(RecordType),
    Enum(EnumType),
}

impl GeneratedDeclaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Record(r) => &r.name,
            Self::Enum(e) => &e.name,
        }
    }

    pub fn kind(&self) -> DeclarationKind {
        match self {
            Self::Record(_) => DeclarationKind::Struct,
            Self::Enum(_) => DeclarationKind::Enum,
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            Self::Record(r) => Some(r),
            Self::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(e) => Some(e),
            Self::Record(_) => None,
        }
    }
}

/// A record (struct) declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: String,
    /// Raw schema name this record was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: Vec<Property>,
    /// Every property supports structural equality
    pub equatable: bool,
}

impl RecordType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// A wire-name mapping is needed when some identifier differs from its wire name
    pub fn needs_wire_names(&self) -> bool {
        self.properties.iter().any(|p| p.name != p.wire_name)
    }
}

/// A record property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Generated identifier (unescaped)
    pub name: String,
    /// Original schema property name
    pub wire_name: String,
    /// Type expression without the optionality marker
    pub type_expr: String,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    /// Full type expression as declared, e.g. `Int?`
    pub fn rendered_type(&self, optional_marker: &str) -> String {
        if self.optional {
            format!("{}{}", self.type_expr, optional_marker)
        } else {
            self.type_expr.clone()
        }
    }
}

/// An enumeration declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    /// Raw schema name (or `Record.property` for inline enums)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cases: Vec<EnumCase>,
}

/// An enumeration case: identifier plus the exact wire literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumCase {
    pub identifier: String,
    pub value: String,
}

/// Structured form of a generated artifact, persisted beside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub declarations: Vec<GeneratedDeclaration>,
}

impl Snapshot {
    pub fn new(declarations: Vec<GeneratedDeclaration>) -> Self {
        Self { format_version: SNAPSHOT_FORMAT_VERSION, declarations }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)
            .map_err(|e| GeneratorError::malformed(format!("invalid snapshot: {}", e)))?;
        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(GeneratorError::malformed(format!(
                "unsupported snapshot format version {}",
                snapshot.format_version
            )));
        }
        Ok(snapshot)
    }

    /// Declarations keyed by type name; the first declaration of a name wins
    pub fn into_map(self) -> BTreeMap<String, GeneratedDeclaration> {
        let mut map = BTreeMap::new();
        for decl in self.declarations {
            map.entry(decl.name().to_string()).or_insert(decl);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> GeneratedDeclaration {
        GeneratedDeclaration::Record(RecordType {
            name: "GeneratedWidget".to_string(),
            source_name: Some("Widget".to_string()),
            description: None,
            properties: vec![Property {
                name: "displayName".to_string(),
                wire_name: "display_name".to_string(),
                type_expr: "String".to_string(),
                optional: true,
                description: None,
            }],
            equatable: true,
        })
    }

    #[test]
    fn test_rendered_type() {
        let decl = widget();
        let record = decl.as_record().unwrap();
        assert_eq!(record.properties[0].rendered_type("?"), "String?");
        assert!(record.needs_wire_names());
    }

    #[test]
    fn test_snapshot_json_tags_kind() {
        let json = Snapshot::new(vec![widget()]).to_json().unwrap();
        assert!(json.contains("\"kind\": \"struct\""));
        let back = Snapshot::from_json(&json).unwrap();
        assert_eq!(back.declarations, vec![widget()]);
    }

    #[test]
    fn test_rejects_future_format() {
        let err = Snapshot::from_json(r#"{"format_version": 99, "declarations": []}"#).unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedInput(_)));
    }
}
