//! Name Resolution
//!
//! Deterministic naming for generated declarations:
//! - Type names: strip prefixes and vendor tokens, PascalCase, overrides, marker prefix
//! - Member names: camelCase of the same segments
//! - Enum case identifiers: lowercased, transliterated literals
//!
//! Name resolution is language-AGNOSTIC. Keyword escaping is done by RenderProfile.

use super::config::{NamingConfig, RenderProfile};

/// Separators between name segments
const SEGMENT_SEPARATORS: [char; 4] = ['_', '.', '-', ' '];

/// Resolves raw schema, property and literal names to generated identifiers
#[derive(Debug, Clone)]
pub struct NameResolver {
    naming: NamingConfig,
    digit_case_prefix: String,
    empty_case_identifier: String,
}

impl NameResolver {
    pub fn new(naming: NamingConfig, profile: &RenderProfile) -> Self {
        Self {
            naming,
            digit_case_prefix: profile.digit_case_prefix.clone(),
            empty_case_identifier: profile.empty_case_identifier.clone(),
        }
    }

    /// Generated type name for a raw schema name
    pub fn type_name(&self, raw: &str) -> String {
        let base = match self.naming.override_for(raw) {
            Some(renamed) => renamed.to_string(),
            None => {
                let mut stripped = raw.to_string();
                for prefix in &self.naming.strip_prefixes {
                    stripped = stripped.replace(prefix.as_str(), "");
                }
                for token in &self.naming.vendor_tokens {
                    stripped = stripped.replace(token.as_str(), "");
                }
                let joined = to_pascal_case(&stripped);
                match self.naming.override_for(&joined) {
                    Some(renamed) => renamed.to_string(),
                    None => joined,
                }
            }
        };

        let mut name: String = base.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let marker = self.naming.marker_prefix.as_str();

        if name.is_empty() {
            return if marker.is_empty() { "Unnamed".to_string() } else { marker.to_string() };
        }
        if !name.starts_with(marker) {
            name = format!("{}{}", marker, name);
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        name
    }

    /// Generated member identifier for a raw property name (unescaped)
    pub fn member_name(&self, raw: &str) -> String {
        let mut name = String::with_capacity(raw.len());

        for (i, segment) in raw
            .split(SEGMENT_SEPARATORS)
            .filter(|s| !s.is_empty())
            .enumerate()
        {
            if i == 0 {
                let screaming = segment.chars().any(|c| c.is_alphabetic())
                    && !segment.chars().any(|c| c.is_lowercase());
                if screaming {
                    name.push_str(&segment.to_lowercase());
                } else {
                    name.push_str(&lower_first(segment));
                }
            } else {
                name.push_str(&upper_first(segment));
            }
        }

        let mut name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();

        if name.is_empty() {
            return "value".to_string();
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        name
    }

    /// Case identifier for an enum literal (unescaped)
    pub fn enum_case_identifier(&self, literal: &str) -> String {
        let ident: String = literal
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();

        if ident.is_empty() {
            self.empty_case_identifier.clone()
        } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
            format!("{}{}", self.digit_case_prefix, ident)
        } else {
            ident
        }
    }
}

/// PascalCase: capitalize the first character of each segment, keep the rest
pub fn to_pascal_case(s: &str) -> String {
    s.split(SEGMENT_SEPARATORS)
        .filter(|seg| !seg.is_empty())
        .map(upper_first)
        .collect()
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}
