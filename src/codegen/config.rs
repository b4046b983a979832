//! Codegen Configuration
//!
//! Two-tier configuration:
//! - Global (NamingConfig): Language-agnostic naming rules and the override table
//! - Per-language (RenderProfile): Type mappings, optionality, keyword escaping
//!
//! Key principle: shape detection and reachability are config-free.
//! Only naming and rendering use configuration.

use serde::{Deserialize, Serialize};

// =============================================================================
// Naming Configuration (Language-Agnostic)
// =============================================================================

/// A single exact-name override.
///
/// `from` is matched against the raw schema name first and against the
/// re-joined PascalCase name second. `to` replaces the name before the
/// marker prefix is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameOverride {
    pub from: String,
    pub to: String,
}

impl NameOverride {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

/// Naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Namespace prefixes removed from raw schema names (e.g. `OpenAI.`)
    #[serde(default = "default_strip_prefixes")]
    pub strip_prefixes: Vec<String>,

    /// Vendor tokens removed from raw schema names (e.g. `Azure`)
    #[serde(default = "default_vendor_tokens")]
    pub vendor_tokens: Vec<String>,

    /// Prefix every generated type name carries
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,

    /// Ordered exact-name overrides, first match wins
    #[serde(default = "default_overrides")]
    pub overrides: Vec<NameOverride>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_prefixes: default_strip_prefixes(),
            vendor_tokens: default_vendor_tokens(),
            marker_prefix: default_marker_prefix(),
            overrides: default_overrides(),
        }
    }
}

impl NamingConfig {
    /// Look up an override for an exact name
    pub fn override_for(&self, name: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|o| o.from == name)
            .map(|o| o.to.as_str())
    }
}

fn default_strip_prefixes() -> Vec<String> {
    vec!["OpenAI.".to_string()]
}

fn default_vendor_tokens() -> Vec<String> {
    vec!["Azure".to_string()]
}

fn default_marker_prefix() -> String {
    "Generated".to_string()
}

fn default_overrides() -> Vec<NameOverride> {
    vec![
        NameOverride::new("expires_after", "ExpiresAfter"),
        NameOverride::new("error", "Error"),
        NameOverride::new("CreateEmbeddingRequest", "EmbeddingRequest"),
        NameOverride::new("CreateEmbeddingResponse", "EmbeddingResponse"),
        NameOverride::new("CreateFileRequest", "FileRequest"),
        NameOverride::new("CreateResponse", "ResponseRequest"),
    ]
}

// =============================================================================
// Render Profile (Per-Language)
// =============================================================================

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Swift,
}

/// Language-specific rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderProfile {
    /// Language identifier
    pub language: Language,

    /// Type mappings for JSON scalars and formats
    pub types: TypeMappings,

    /// Record conformances when every property supports equality
    pub equatable_conformances: Vec<String>,

    /// Record conformances when some property is opaque
    pub codable_conformances: Vec<String>,

    /// Enumeration conformances
    pub enum_conformances: Vec<String>,

    /// Prefix used when an enum case identifier would start with a digit
    pub digit_case_prefix: String,

    /// Case identifier used when transliteration leaves nothing
    pub empty_case_identifier: String,
}

/// Type mappings for JSON scalar types and formats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeMappings {
    /// JSON string -> language type
    pub string: String,
    /// JSON integer -> language type
    pub integer: String,
    /// JSON integer with `format: int64`
    pub int64: String,
    /// JSON number -> language type
    pub number: String,
    /// JSON number with `format: float`
    pub float: String,
    /// JSON boolean -> language type
    pub boolean: String,
    /// `format: date-time`
    pub datetime: String,
    /// `format: uri`
    pub uri: String,
    /// Opaque structured value (unions, anonymous objects, unknown shapes)
    pub any: String,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::swift()
    }
}

impl Default for TypeMappings {
    fn default() -> Self {
        RenderProfile::swift().types
    }
}

impl RenderProfile {
    /// Create the default Swift profile
    pub fn swift() -> Self {
        Self {
            language: Language::Swift,
            types: TypeMappings {
                string: "String".to_string(),
                integer: "Int".to_string(),
                int64: "Int64".to_string(),
                number: "Double".to_string(),
                float: "Float".to_string(),
                boolean: "Bool".to_string(),
                datetime: "Date".to_string(),
                uri: "URL".to_string(),
                any: "SAOAIJSONValue".to_string(),
            },
            equatable_conformances: vec!["Codable".to_string(), "Equatable".to_string()],
            codable_conformances: vec!["Codable".to_string()],
            enum_conformances: vec![
                "String".to_string(),
                "Codable".to_string(),
                "CaseIterable".to_string(),
            ],
            digit_case_prefix: "case_".to_string(),
            empty_case_identifier: "unknown".to_string(),
        }
    }
}

// =============================================================================
// Render Helpers
// =============================================================================

impl RenderProfile {
    /// Escape an identifier if it is a reserved word
    pub fn escape_keyword(&self, name: &str) -> String {
        let keywords = match self.language {
            Language::Swift => SWIFT_KEYWORDS,
        };

        if keywords.contains(&name) {
            format!("`{}`", name)
        } else {
            name.to_string()
        }
    }

    /// Wrap a type as an ordered sequence
    pub fn wrap_sequence(&self, inner: &str) -> String {
        match self.language {
            Language::Swift => format!("[{}]", inner),
        }
    }

    /// Marker appended to optional types
    pub fn optional_marker(&self) -> &'static str {
        match self.language {
            Language::Swift => "?",
        }
    }
}

/// Swift reserved words that need backtick escaping when used as identifiers
pub const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func",
    "import", "init", "inout", "internal", "let", "open", "operator", "private",
    "precedencegroup", "protocol", "public", "rethrows", "static", "struct", "subscript",
    "typealias", "var", "break", "case", "catch", "continue", "default", "defer", "do",
    "else", "fallthrough", "for", "guard", "if", "in", "repeat", "return", "throw",
    "switch", "where", "while", "as", "Any", "false", "is", "nil", "self", "Self", "super",
    "throws", "true", "try", "Type", "Protocol",
];
