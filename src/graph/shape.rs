//! Schema Shape Detection
//!
//! Detects structural patterns from raw JSON schemas. This is pure shape detection -
//! NO naming or rendering decisions happen here. The compiler lowers these shapes
//! to declarations and field types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::schema_name_from_ref;

// =============================================================================
// JSON Scalar Kinds (language-agnostic)
// =============================================================================

/// JSON scalar type (before language-specific lowering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl PrimitiveKind {
    pub fn from_json_type(type_str: &str) -> Option<Self> {
        match type_str {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

// =============================================================================
// Property Shape
// =============================================================================

/// Shape of a single property in an object schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyShape {
    /// Property name as it appears on the wire
    pub name: String,
    /// Listed in the enclosing object's `required` set
    pub required: bool,
    /// Raw `description`, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property type shape
    pub shape: SchemaShape,
}

// =============================================================================
// Schema Shape
// =============================================================================

/// Raw schema shape detected from JSON structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaShape {
    /// `{"type": "string", "format": "date-time"}` and friends
    Primitive {
        primitive: PrimitiveKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },

    /// `{"type": "object", "properties": {...}}`; properties in document order
    Object { properties: Vec<PropertyShape> },

    /// `{"type": "array", "items": {...}}`
    Array { items: Box<SchemaShape> },

    /// `{"enum": [...]}` - literal values, stringified
    Enumeration { values: Vec<String> },

    /// `{"$ref": "#/components/schemas/Name"}`
    Reference { target: String },

    /// `anyOf` / `oneOf` / multi-member `allOf` / multi-type `type` arrays
    Union { alternatives: Vec<SchemaShape> },

    /// Anything outside the supported subset
    Unknown { description: String },
}

impl SchemaShape {
    fn unknown(description: impl Into<String>) -> Self {
        Self::Unknown { description: description.into() }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primitive { .. } => "primitive",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::Enumeration { .. } => "enumeration",
            Self::Reference { .. } => "reference",
            Self::Union { .. } => "union",
            Self::Unknown { .. } => "unknown",
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Detect the shape of a schema
pub fn detect_shape(schema: &Value) -> SchemaShape {
    let Some(obj) = schema.as_object() else {
        return SchemaShape::unknown("schema is not an object");
    };

    // $ref wins; siblings are ignored
    if let Some(ref_path) = obj.get("$ref") {
        return match ref_path.as_str().and_then(schema_name_from_ref) {
            Some(target) => SchemaShape::Reference { target },
            None => SchemaShape::unknown(format!("unsupported reference {}", ref_path)),
        };
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(alternatives) = obj.get(key).and_then(Value::as_array) {
            return SchemaShape::Union {
                alternatives: alternatives.iter().map(detect_shape).collect(),
            };
        }
    }

    if let Some(members) = obj.get("allOf").and_then(Value::as_array) {
        return match members.as_slice() {
            [single] => detect_shape(single),
            _ => SchemaShape::Union {
                alternatives: members.iter().map(detect_shape).collect(),
            },
        };
    }

    let type_name = match obj.get("type") {
        None if obj.contains_key("properties") => "object",
        None => "string",
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Array(types)) => {
            let concrete: Vec<&str> = types
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| *t != "null")
                .collect();
            match concrete.as_slice() {
                [single] => *single,
                _ => {
                    return SchemaShape::Union {
                        alternatives: concrete
                            .iter()
                            .map(|t| detect_shape(&json!({ "type": t })))
                            .collect(),
                    }
                }
            }
        }
        Some(other) => return SchemaShape::unknown(format!("unsupported type {}", other)),
    };

    // Only string enumerations become enums; other typed enums keep their primitive
    if type_name == "string" {
        if let Some(literals) = obj.get("enum").and_then(Value::as_array) {
            let values = enum_literals(literals);
            if !values.is_empty() {
                return SchemaShape::Enumeration { values };
            }
        }
    }

    match type_name {
        "object" => SchemaShape::Object { properties: detect_properties(obj) },
        "array" => SchemaShape::Array {
            items: Box::new(
                obj.get("items")
                    .map(detect_shape)
                    .unwrap_or_else(|| SchemaShape::unknown("array without items")),
            ),
        },
        other => match PrimitiveKind::from_json_type(other) {
            Some(primitive) => SchemaShape::Primitive {
                primitive,
                format: obj.get("format").and_then(Value::as_str).map(str::to_string),
            },
            None => SchemaShape::unknown(format!("unsupported type `{}`", other)),
        },
    }
}

fn detect_properties(obj: &Map<String, Value>) -> Vec<PropertyShape> {
    let required: Vec<&str> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = obj.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, prop)| PropertyShape {
            name: name.clone(),
            required: required.contains(&name.as_str()),
            description: prop
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            shape: detect_shape(prop),
        })
        .collect()
}

/// Stringify enum literals; `null` is not a case
fn enum_literals(literals: &[Value]) -> Vec<String> {
    literals
        .iter()
        .filter_map(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}
