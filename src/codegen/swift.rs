//! Swift Code Emitter
//!
//! Renders declarations as Swift source using RenderProfile for configuration.
//!
//! Key constraints:
//! - This module ONLY receives GeneratedDeclaration + RenderProfile - no raw JSON
//! - Output must stay recoverable by the snapshot parser

use crate::declaration::{EnumType, GeneratedDeclaration, RecordType};

use super::config::RenderProfile;

/// First lines of every generated document
pub const FILE_HEADER: &str = "// Generated Swift Models from OpenAPI Specification\n\
                               // DO NOT EDIT: This file is automatically generated\n";

/// Doc line naming the source of a struct
pub const MODEL_HEADER: &str = "Generated model for";

/// Doc line naming the source of an enum
pub const ENUM_HEADER: &str = "Generated enum for";

/// Name of the nested wire-name mapping
pub const CODING_KEYS: &str = "CodingKeys";

// =============================================================================
// Public API
// =============================================================================

/// Emit the whole declarations document
pub fn emit_document(declarations: &[GeneratedDeclaration], profile: &RenderProfile) -> String {
    let mut output = String::new();

    output.push_str(FILE_HEADER);
    output.push('\n');
    output.push_str("import Foundation\n");
    output.push('\n');

    for decl in declarations {
        output.push_str(&emit_declaration(decl, profile));
        output.push('\n');
    }

    output
}

/// Emit one declaration
pub fn emit_declaration(decl: &GeneratedDeclaration, profile: &RenderProfile) -> String {
    match decl {
        GeneratedDeclaration::Enum(e) => emit_enum(e, profile),
        GeneratedDeclaration::Record(r) => emit_struct(r, profile),
    }
}

// =============================================================================
// Enum Emission
// =============================================================================

fn emit_enum(decl: &EnumType, profile: &RenderProfile) -> String {
    let mut output = String::new();

    if let Some(source) = &decl.source_name {
        output.push_str(&format!("/// {} {}\n", ENUM_HEADER, source));
    }
    if let Some(description) = &decl.description {
        output.push_str(&format!("/// {}\n", description));
    }

    output.push_str(&format!(
        "public enum {}: {} {{\n",
        decl.name,
        profile.enum_conformances.join(", ")
    ));

    for case in &decl.cases {
        output.push_str(&format!(
            "    case {} = \"{}\"\n",
            profile.escape_keyword(&case.identifier),
            escape_string(&case.value)
        ));
    }

    output.push_str("}\n");
    output
}

// =============================================================================
// Struct Emission
// =============================================================================

fn emit_struct(decl: &RecordType, profile: &RenderProfile) -> String {
    let mut output = String::new();

    if let Some(source) = &decl.source_name {
        output.push_str(&format!("/// {} {}\n", MODEL_HEADER, source));
    }
    if let Some(description) = &decl.description {
        output.push_str(&format!("/// {}\n", description));
    }

    let conformances = if decl.equatable {
        &profile.equatable_conformances
    } else {
        &profile.codable_conformances
    };
    output.push_str(&format!("public struct {}: {} {{\n", decl.name, conformances.join(", ")));

    for prop in &decl.properties {
        if let Some(description) = &prop.description {
            output.push_str(&format!("    /// {}\n", description));
        }
        output.push_str(&format!(
            "    public let {}: {}\n",
            profile.escape_keyword(&prop.name),
            prop.rendered_type(profile.optional_marker())
        ));
        output.push('\n');
    }

    if decl.needs_wire_names() {
        output.push_str(&format!("    private enum {}: String, CodingKey {{\n", CODING_KEYS));
        for prop in &decl.properties {
            let ident = profile.escape_keyword(&prop.name);
            if prop.name == prop.wire_name {
                output.push_str(&format!("        case {}\n", ident));
            } else {
                output.push_str(&format!(
                    "        case {} = \"{}\"\n",
                    ident,
                    escape_string(&prop.wire_name)
                ));
            }
        }
        output.push_str("    }\n");
        output.push('\n');
    }

    output.push_str("}\n");
    output
}

/// Escape a Swift string literal body
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Inverse of [`escape_string`]
pub fn unescape_string(literal: &str) -> String {
    let mut value = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('0') => value.push('\0'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{EnumCase, Property};

    #[test]
    fn test_emit_enum() {
        let decl = GeneratedDeclaration::Enum(EnumType {
            name: "GeneratedStatus".to_string(),
            source_name: Some("Status".to_string()),
            description: None,
            cases: vec![
                EnumCase { identifier: "in_progress".to_string(), value: "in_progress".to_string() },
                EnumCase { identifier: "default".to_string(), value: "default".to_string() },
            ],
        });

        let code = emit_declaration(&decl, &RenderProfile::swift());
        assert_eq!(
            code,
            "/// Generated enum for Status\n\
             public enum GeneratedStatus: String, Codable, CaseIterable {\n    \
             case in_progress = \"in_progress\"\n    \
             case `default` = \"default\"\n\
             }\n"
        );
    }

    #[test]
    fn test_emit_struct_with_coding_keys() {
        let decl = GeneratedDeclaration::Record(RecordType {
            name: "GeneratedWidget".to_string(),
            source_name: Some("Widget".to_string()),
            description: None,
            properties: vec![
                Property {
                    name: "displayName".to_string(),
                    wire_name: "display_name".to_string(),
                    type_expr: "String".to_string(),
                    optional: false,
                    description: Some("Shown to users".to_string()),
                },
                Property {
                    name: "size".to_string(),
                    wire_name: "size".to_string(),
                    type_expr: "Int".to_string(),
                    optional: true,
                    description: None,
                },
            ],
            equatable: true,
        });

        let code = emit_declaration(&decl, &RenderProfile::swift());
        assert!(code.starts_with("/// Generated model for Widget\npublic struct GeneratedWidget: Codable, Equatable {\n"));
        assert!(code.contains("    /// Shown to users\n    public let displayName: String\n\n"));
        assert!(code.contains("    public let size: Int?\n"));
        assert!(code.contains("        case displayName = \"display_name\"\n        case size\n    }\n"));
    }

    #[test]
    fn test_no_coding_keys_when_names_match() {
        let decl = GeneratedDeclaration::Record(RecordType {
            name: "GeneratedBlob".to_string(),
            source_name: None,
            description: None,
            properties: vec![Property {
                name: "data".to_string(),
                wire_name: "data".to_string(),
                type_expr: "SAOAIJSONValue".to_string(),
                optional: true,
                description: None,
            }],
            equatable: false,
        });

        let code = emit_declaration(&decl, &RenderProfile::swift());
        assert!(code.starts_with("public struct GeneratedBlob: Codable {\n"));
        assert!(!code.contains(CODING_KEYS));
    }

    #[test]
    fn test_string_escaping() {
        let raw = "say \"hi\"\\now";
        assert_eq!(escape_string(raw), "say \\\"hi\\\"\\\\now");
        assert_eq!(unescape_string(&escape_string(raw)), raw);
    }
}
