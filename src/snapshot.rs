//! Snapshot Parser
//!
//! Recovers declarations from a persisted artifact. Two sources:
//! - the structured JSON snapshot written beside each generated file (preferred)
//! - the generated Swift text itself (compatibility path for older artifacts)
//!
//! The text parser is line based and lenient: it recognizes the generator's own
//! output shape, tracks brace depth so nested scopes such as `CodingKeys` do not
//! close the enclosing type, and skips anything it does not understand.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::codegen::swift::{unescape_string, CODING_KEYS, ENUM_HEADER, MODEL_HEADER};
use crate::declaration::{
    DeclarationKind, EnumCase, EnumType, GeneratedDeclaration, Property, RecordType, Snapshot,
};
use crate::error::Result;

/// Declarations keyed by type name
pub type DeclarationMap = BTreeMap<String, GeneratedDeclaration>;

/// Suffix of the structured snapshot written beside a generated file
pub const SNAPSHOT_SUFFIX: &str = "snapshot.json";

/// Where a set of declarations was recovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Structured,
    SwiftText,
}

static DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|internal|private|fileprivate|open|final|indirect)\s+)*(struct|enum|class)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*([^{]*?))?\s*\{",
    )
    .expect("valid declaration regex")
});

static PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|internal|private|fileprivate|open)\s+)*(?:let|var)\s+`?([A-Za-z_][A-Za-z0-9_]*)`?\s*:\s*([^=]+?)\s*(?:=.*)?$",
    )
    .expect("valid property regex")
});

static CASE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:indirect\s+)?case\s+(.+)$").expect("valid case regex"));

static CASE_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"`?([A-Za-z_][A-Za-z0-9_]*)`?(?:\s*=\s*"((?:[^"\\]|\\.)*)")?"#)
        .expect("valid case item regex")
});

static DOC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*///\s?(.*)$").expect("valid doc regex"));

static SOURCE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:{}|{})\s+(.+)$",
        regex::escape(MODEL_HEADER),
        regex::escape(ENUM_HEADER)
    ))
    .expect("valid source header regex")
});

// =============================================================================
// Public API
// =============================================================================

/// Parse generated Swift text into a map of declarations
pub fn parse(text: &str) -> DeclarationMap {
    into_map(parse_swift(text))
}

/// Parse generated Swift text, keeping declaration order
pub fn parse_swift(text: &str) -> Vec<GeneratedDeclaration> {
    let mut parser = TextParser::default();
    for line in text.lines() {
        parser.line(line);
    }
    parser.finish()
}

/// Structured JSON or Swift text
pub fn detect_format(text: &str) -> SnapshotFormat {
    if text.trim_start().starts_with('{') {
        SnapshotFormat::Structured
    } else {
        SnapshotFormat::SwiftText
    }
}

/// Load declarations from either source format.
///
/// Structured input that fails to parse is an error; Swift text never fails
/// and yields an empty map when nothing is recognized.
pub fn load_declarations(text: &str) -> Result<(SnapshotFormat, DeclarationMap)> {
    match detect_format(text) {
        SnapshotFormat::Structured => {
            let snapshot = Snapshot::from_json(text)?;
            Ok((SnapshotFormat::Structured, snapshot.into_map()))
        }
        SnapshotFormat::SwiftText => Ok((SnapshotFormat::SwiftText, parse(text))),
    }
}

/// Path of the structured snapshot for a generated file (`Models.swift.snapshot.json`)
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(SNAPSHOT_SUFFIX);
    PathBuf::from(name)
}

/// A snapshot loaded from disk
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Raw text of the file that was named
    pub text: String,
    pub format: SnapshotFormat,
    pub declarations: DeclarationMap,
}

/// Load a generated file, preferring its structured sidecar when present
pub fn load_file(path: &Path) -> Result<LoadedSnapshot> {
    let text = std::fs::read_to_string(path)?;

    let sidecar = sidecar_path(path);
    let (format, declarations) =
        if detect_format(&text) == SnapshotFormat::SwiftText && sidecar.is_file() {
            debug!(path = %sidecar.display(), "Using structured snapshot");
            load_declarations(&std::fs::read_to_string(&sidecar)?)?
        } else {
            load_declarations(&text)?
        };

    debug!(
        path = %path.display(),
        format = ?format,
        declarations = declarations.len(),
        "Loaded snapshot"
    );

    Ok(LoadedSnapshot { text, format, declarations })
}

fn into_map(declarations: Vec<GeneratedDeclaration>) -> DeclarationMap {
    Snapshot::new(declarations).into_map()
}

// =============================================================================
// Text parser
// =============================================================================

/// A type whose body is being read
#[derive(Debug)]
struct OpenType {
    kind: DeclarationKind,
    name: String,
    conformances: Vec<String>,
    docs: Vec<String>,
    properties: Vec<Property>,
    cases: Vec<EnumCase>,
    /// identifier -> wire name, from `CodingKeys`
    wire_names: BTreeMap<String, String>,
}

impl OpenType {
    fn into_declaration(self) -> GeneratedDeclaration {
        let mut docs = self.docs.into_iter();
        let mut source_name = None;
        let mut rest = Vec::new();
        if let Some(first) = docs.next() {
            match SOURCE_HEADER.captures(&first) {
                Some(caps) => source_name = Some(caps[1].trim().to_string()),
                None => rest.push(first),
            }
        }
        rest.extend(docs);
        let description = Some(rest.join(" ")).filter(|d| !d.is_empty());

        match self.kind {
            DeclarationKind::Enum => GeneratedDeclaration::Enum(EnumType {
                name: self.name,
                source_name,
                description,
                cases: self.cases,
            }),
            DeclarationKind::Struct => {
                let equatable = self
                    .conformances
                    .iter()
                    .any(|c| c == "Equatable" || c == "Hashable");
                let wire_names = self.wire_names;
                let properties = self
                    .properties
                    .into_iter()
                    .map(|mut p| {
                        if let Some(wire) = wire_names.get(&p.name) {
                            p.wire_name = wire.clone();
                        }
                        p
                    })
                    .collect();
                GeneratedDeclaration::Record(RecordType {
                    name: self.name,
                    source_name,
                    description,
                    properties,
                    equatable,
                })
            }
        }
    }
}

#[derive(Debug, Default)]
struct TextParser {
    declarations: Vec<GeneratedDeclaration>,
    depth: usize,
    pending_docs: Vec<String>,
    current: Option<OpenType>,
    /// Name of the nested type open at depth 2
    nested: Option<String>,
}

impl TextParser {
    fn line(&mut self, raw: &str) {
        if let Some(caps) = DOC.captures(raw) {
            self.pending_docs.push(caps[1].trim_end().to_string());
            return;
        }

        let code = strip_line_comment(raw);
        if code.trim().is_empty() {
            return;
        }

        match self.depth {
            0 => self.top_level(code),
            1 => self.type_body(code),
            2 => self.nested_body(code),
            _ => {}
        }
        self.pending_docs.clear();

        let delta = brace_delta(code);
        self.depth = (self.depth as i64 + delta).max(0) as usize;

        if self.depth < 2 {
            self.nested = None;
        }
        if self.depth == 0 {
            if let Some(open) = self.current.take() {
                self.declarations.push(open.into_declaration());
            }
        }
    }

    fn top_level(&mut self, code: &str) {
        let Some(caps) = DECL.captures(code) else {
            return;
        };
        let kind = match &caps[1] {
            "enum" => DeclarationKind::Enum,
            _ => DeclarationKind::Struct,
        };
        let conformances = caps
            .get(3)
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        self.current = Some(OpenType {
            kind,
            name: caps[2].to_string(),
            conformances,
            docs: std::mem::take(&mut self.pending_docs),
            properties: Vec::new(),
            cases: Vec::new(),
            wire_names: BTreeMap::new(),
        });
    }

    fn type_body(&mut self, code: &str) {
        if let Some(caps) = DECL.captures(code) {
            self.nested = Some(caps[2].to_string());
            return;
        }
        let docs = std::mem::take(&mut self.pending_docs);
        let Some(open) = self.current.as_mut() else {
            return;
        };

        match open.kind {
            DeclarationKind::Struct => {
                let Some(caps) = PROPERTY.captures(code) else {
                    return;
                };
                let name = caps[1].to_string();
                let declared = caps[2].trim();
                let (type_expr, optional) = match declared.strip_suffix('?') {
                    Some(inner) => (inner.trim_end().to_string(), true),
                    None => (declared.to_string(), false),
                };
                let description = Some(docs.join(" ")).filter(|d| !d.is_empty());
                open.properties.push(Property {
                    wire_name: name.clone(),
                    name,
                    type_expr,
                    optional,
                    description,
                });
            }
            DeclarationKind::Enum => {
                open.cases.extend(parse_case_items(code).into_iter().map(|(identifier, value)| {
                    EnumCase {
                        value: value.unwrap_or_else(|| identifier.clone()),
                        identifier,
                    }
                }));
            }
        }
    }

    fn nested_body(&mut self, code: &str) {
        if self.nested.as_deref() != Some(CODING_KEYS) {
            return;
        }
        let Some(open) = self.current.as_mut() else {
            return;
        };
        for (identifier, wire) in parse_case_items(code) {
            let wire = wire.unwrap_or_else(|| identifier.clone());
            open.wire_names.insert(identifier, wire);
        }
    }

    fn finish(mut self) -> Vec<GeneratedDeclaration> {
        // unterminated trailing type
        if let Some(open) = self.current.take() {
            self.declarations.push(open.into_declaration());
        }
        self.declarations
    }
}

/// `case a = "x", b` -> [(a, Some(x)), (b, None)]
fn parse_case_items(code: &str) -> Vec<(String, Option<String>)> {
    let Some(caps) = CASE_LINE.captures(code) else {
        return Vec::new();
    };
    CASE_ITEM
        .captures_iter(&caps[1])
        .map(|item| {
            (
                item[1].to_string(),
                item.get(2).map(|m| unescape_string(m.as_str())),
            )
        })
        .collect()
}

/// Drop a trailing `//` comment that is not inside a string literal
fn strip_line_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            return &line[..i];
        }
    }
    line
}

/// Net `{` minus `}` outside string literals
fn brace_delta(code: &str) -> i64 {
    let mut delta = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in code.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}
