//! OpenAPI document wrapper
//!
//! Holds a parsed document as `serde_json::Value` and exposes the handful of
//! sections the pipeline reads. Object keys are kept sorted, so every
//! serialization of a document is reproducible.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{GeneratorError, Result};

/// Section accessors over an OpenAPI document
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    root: Value,
}

impl ApiDocument {
    /// Parse a document from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| GeneratorError::malformed(format!("invalid JSON: {}", e)))?;
        Self::from_value(root)
    }

    /// Wrap an already parsed value, checking the sections the pipeline relies on
    pub fn from_value(root: Value) -> Result<Self> {
        if !root.is_object() {
            return Err(GeneratorError::malformed("document root is not an object"));
        }
        if root.get("paths").is_some_and(|p| !p.is_object()) {
            return Err(GeneratorError::malformed("`paths` is not an object"));
        }
        if let Some(components) = root.get("components") {
            if !components.is_object() {
                return Err(GeneratorError::malformed("`components` is not an object"));
            }
            if components.get("schemas").is_some_and(|s| !s.is_object()) {
                return Err(GeneratorError::malformed("`components.schemas` is not an object"));
            }
        }
        Ok(Self { root })
    }

    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            GeneratorError::MalformedInput(msg) => {
                GeneratorError::malformed(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Write the document as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_pretty_string()?)?;
        Ok(())
    }

    /// Pretty JSON with sorted keys
    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Top-level field by name (`openapi`, `info`, `servers`, ...)
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Operation paths, keyed by path string
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// Named schemas under `components.schemas`
    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
    }

    /// Security schemes under `components.securitySchemes`
    pub fn security_schemes(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("components")
            .and_then(|c| c.get("securitySchemes"))
            .and_then(Value::as_object)
    }

    /// Top-level security requirement list
    pub fn security(&self) -> Option<&Vec<Value>> {
        self.root.get("security").and_then(Value::as_array)
    }

    pub fn path_count(&self) -> usize {
        self.paths().map_or(0, Map::len)
    }

    pub fn schema_count(&self) -> usize {
        self.schemas().map_or(0, Map::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_json() {
        let err = ApiDocument::parse("openapi: 3.0.1").unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedInput(_)));
    }

    #[test]
    fn test_rejects_non_object_schemas() {
        let err = ApiDocument::from_value(json!({"components": {"schemas": []}})).unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedInput(_)));
    }

    #[test]
    fn test_sections() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.0.1",
            "paths": {"/b": {}, "/a": {}},
            "components": {"schemas": {"Widget": {"type": "object"}}},
            "security": [{"ApiKeyAuth": []}]
        }))
        .unwrap();

        assert_eq!(doc.path_count(), 2);
        assert_eq!(doc.schema_count(), 1);
        assert_eq!(doc.security().map(Vec::len), Some(1));
        assert!(doc.security_schemes().is_none());

        let text = doc.to_pretty_string().unwrap();
        assert!(text.find("\"/a\"").unwrap() < text.find("\"/b\"").unwrap());
    }
}
