//! Diff Classifier
//!
//! Structural comparison of two declaration sets and the resulting
//! version-bump tier.
//!
//! Severity, first match wins:
//! - major: a type was removed, a type changed kind, or any member was removed
//! - minor: a type or member was added
//! - patch: nothing structural changed
//!
//! A property type change is reported as a removed `Type.prop:old` entry plus
//! an added `Type.prop:new` entry, so it always lands in major.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codegen::config::RenderProfile;
use crate::declaration::{EnumType, GeneratedDeclaration, RecordType};
use crate::snapshot::DeclarationMap;

/// Version-bump tier, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Patch,
    Minor,
    Major,
}

impl Severity {
    /// One-line recommendation for the summary
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Major => "Detected potentially breaking changes (removed items or kind changes).",
            Self::Minor => "Non-breaking additions detected.",
            Self::Patch => "No structural changes beyond patch level.",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// Result of comparing two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub added_types: Vec<String>,
    pub removed_types: Vec<String>,
    pub changed_type_kind: Vec<String>,
    pub added_members: Vec<String>,
    pub removed_members: Vec<String>,
    #[serde(rename = "semver")]
    pub severity: Severity,
}

impl DiffResult {
    /// Severity implied by the collected changes
    pub fn classify(
        added_types: &[String],
        removed_types: &[String],
        changed_type_kind: &[String],
        added_members: &[String],
        removed_members: &[String],
    ) -> Severity {
        if !removed_types.is_empty() || !changed_type_kind.is_empty() || !removed_members.is_empty() {
            Severity::Major
        } else if !added_types.is_empty() || !added_members.is_empty() {
            Severity::Minor
        } else {
            Severity::Patch
        }
    }

    pub fn has_changes(&self) -> bool {
        self.severity != Severity::Patch
    }
}

/// Compare two declaration maps rendered with the default profile
pub fn diff(old: &DeclarationMap, new: &DeclarationMap) -> DiffResult {
    diff_with_profile(old, new, &RenderProfile::default())
}

/// Compare two declaration maps
pub fn diff_with_profile(
    old: &DeclarationMap,
    new: &DeclarationMap,
    profile: &RenderProfile,
) -> DiffResult {
    let old_names: BTreeSet<&String> = old.keys().collect();
    let new_names: BTreeSet<&String> = new.keys().collect();

    let added_types: Vec<String> = new_names.difference(&old_names).map(|s| s.to_string()).collect();
    let removed_types: Vec<String> = old_names.difference(&new_names).map(|s| s.to_string()).collect();

    let mut changed_type_kind = Vec::new();
    let mut added_members = Vec::new();
    let mut removed_members = Vec::new();

    for name in old_names.intersection(&new_names) {
        let (Some(before), Some(after)) = (old.get(*name), new.get(*name)) else {
            continue;
        };
        match (before, after) {
            (GeneratedDeclaration::Record(a), GeneratedDeclaration::Record(b)) => {
                diff_records(a, b, profile, &mut added_members, &mut removed_members);
            }
            (GeneratedDeclaration::Enum(a), GeneratedDeclaration::Enum(b)) => {
                diff_enums(a, b, &mut added_members, &mut removed_members);
            }
            _ => changed_type_kind.push(name.to_string()),
        }
    }

    let severity = DiffResult::classify(
        &added_types,
        &removed_types,
        &changed_type_kind,
        &added_members,
        &removed_members,
    );

    tracing::debug!(
        added_types = added_types.len(),
        removed_types = removed_types.len(),
        kind_changes = changed_type_kind.len(),
        added_members = added_members.len(),
        removed_members = removed_members.len(),
        severity = %severity,
        "Classified snapshot diff"
    );

    DiffResult {
        added_types,
        removed_types,
        changed_type_kind,
        added_members,
        removed_members,
        severity,
    }
}

fn diff_records(
    old: &RecordType,
    new: &RecordType,
    profile: &RenderProfile,
    added: &mut Vec<String>,
    removed: &mut Vec<String>,
) {
    let t = &old.name;
    let old_props: BTreeSet<&str> = old.properties.iter().map(|p| p.name.as_str()).collect();
    let new_props: BTreeSet<&str> = new.properties.iter().map(|p| p.name.as_str()).collect();

    added.extend(new_props.difference(&old_props).map(|p| format!("{}.{}", t, p)));
    removed.extend(old_props.difference(&new_props).map(|p| format!("{}.{}", t, p)));

    let marker = profile.optional_marker();
    for prop in old_props.intersection(&new_props) {
        let (Some(before), Some(after)) = (old.property(prop), new.property(prop)) else {
            continue;
        };
        let before_type = before.rendered_type(marker);
        let after_type = after.rendered_type(marker);
        if before_type != after_type {
            removed.push(format!("{}.{}:{}", t, prop, before_type));
            added.push(format!("{}.{}:{}", t, prop, after_type));
        }
    }
}

fn diff_enums(old: &EnumType, new: &EnumType, added: &mut Vec<String>, removed: &mut Vec<String>) {
    let t = &old.name;
    let old_cases: BTreeSet<&str> = old.cases.iter().map(|c| c.identifier.as_str()).collect();
    let new_cases: BTreeSet<&str> = new.cases.iter().map(|c| c.identifier.as_str()).collect();

    added.extend(new_cases.difference(&old_cases).map(|c| format!("{}.case.{}", t, c)));
    removed.extend(old_cases.difference(&new_cases).map(|c| format!("{}.case.{}", t, c)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{EnumCase, Property};

    fn prop(name: &str, type_expr: &str, optional: bool) -> Property {
        Property {
            name: name.to_string(),
            wire_name: name.to_string(),
            type_expr: type_expr.to_string(),
            optional,
            description: None,
        }
    }

    fn record(name: &str, properties: Vec<Property>) -> GeneratedDeclaration {
        GeneratedDeclaration::Record(RecordType {
            name: name.to_string(),
            source_name: None,
            description: None,
            properties,
            equatable: true,
        })
    }

    fn enumeration(name: &str, cases: &[&str]) -> GeneratedDeclaration {
        GeneratedDeclaration::Enum(EnumType {
            name: name.to_string(),
            source_name: None,
            description: None,
            cases: cases
                .iter()
                .map(|c| EnumCase { identifier: c.to_string(), value: c.to_string() })
                .collect(),
        })
    }

    fn map(decls: Vec<GeneratedDeclaration>) -> DeclarationMap {
        decls.into_iter().map(|d| (d.name().to_string(), d)).collect()
    }

    #[test]
    fn test_identical_is_patch() {
        let a = map(vec![record("Widget", vec![prop("name", "String", false)])]);
        let result = diff(&a, &a.clone());
        assert_eq!(result.severity, Severity::Patch);
        assert!(!result.has_changes());
    }

    #[test]
    fn test_added_optional_property_is_minor() {
        let old = map(vec![record("Widget", vec![prop("name", "String", false)])]);
        let new = map(vec![record(
            "Widget",
            vec![prop("name", "String", false), prop("size", "Int", true)],
        )]);

        let result = diff(&old, &new);
        assert_eq!(result.added_members, vec!["Widget.size"]);
        assert!(result.removed_members.is_empty());
        assert_eq!(result.severity, Severity::Minor);
    }

    #[test]
    fn test_type_change_is_paired_and_major() {
        let old = map(vec![record("Widget", vec![prop("name", "String", false)])]);
        let new = map(vec![record("Widget", vec![prop("name", "Double", false)])]);

        let result = diff(&old, &new);
        assert_eq!(result.removed_members, vec!["Widget.name:String"]);
        assert_eq!(result.added_members, vec!["Widget.name:Double"]);
        assert_eq!(result.severity, Severity::Major);
    }

    #[test]
    fn test_optionality_change_is_major() {
        let old = map(vec![record("Widget", vec![prop("name", "String", false)])]);
        let new = map(vec![record("Widget", vec![prop("name", "String", true)])]);

        let result = diff(&old, &new);
        assert_eq!(result.removed_members, vec!["Widget.name:String"]);
        assert_eq!(result.added_members, vec!["Widget.name:String?"]);
        assert_eq!(result.severity, Severity::Major);
    }

    #[test]
    fn test_removed_type_is_major_despite_additions() {
        let old = map(vec![record("Gadget", vec![]), record("Widget", vec![])]);
        let new = map(vec![record("Widget", vec![prop("size", "Int", true)]), record("Gizmo", vec![])]);

        let result = diff(&old, &new);
        assert_eq!(result.removed_types, vec!["Gadget"]);
        assert_eq!(result.added_types, vec!["Gizmo"]);
        assert_eq!(result.severity, Severity::Major);
    }

    #[test]
    fn test_kind_change() {
        let old = map(vec![record("Mode", vec![])]);
        let new = map(vec![enumeration("Mode", &["a"])]);

        let result = diff(&old, &new);
        assert_eq!(result.changed_type_kind, vec!["Mode"]);
        assert!(result.added_members.is_empty());
        assert_eq!(result.severity, Severity::Major);
    }

    #[test]
    fn test_enum_cases() {
        let old = map(vec![enumeration("Status", &["in_progress", "completed"])]);
        let new = map(vec![enumeration("Status", &["completed", "failed", "queued"])]);

        let result = diff(&old, &new);
        assert_eq!(result.added_members, vec!["Status.case.failed", "Status.case.queued"]);
        assert_eq!(result.removed_members, vec!["Status.case.in_progress"]);
    }

    #[test]
    fn test_severity_monotonicity() {
        let base = map(vec![record("Widget", vec![prop("name", "String", false)])]);
        assert_eq!(diff(&base, &base).severity, Severity::Patch);

        let mut with_addition = base.clone();
        with_addition.insert("Extra".to_string(), enumeration("Extra", &["x"]));
        assert_eq!(diff(&base, &with_addition).severity, Severity::Minor);

        let empty = DeclarationMap::new();
        assert_eq!(diff(&base, &empty).severity, Severity::Major);
        // unparseable old snapshot looks like pure additions
        assert_eq!(diff(&empty, &base).severity, Severity::Minor);
    }

    #[test]
    fn test_severity_ordering_and_serde() {
        assert!(Severity::Major > Severity::Minor);
        assert!(Severity::Minor > Severity::Patch);
        let json = serde_json::to_string(&Severity::Minor).unwrap();
        assert_eq!(json, "\"minor\"");
    }
}
