//! Change reports
//!
//! Wraps a [`DiffResult`] with artifact identity (checksums, raw text change)
//! and renders the two report artifacts: a JSON descriptor and a Markdown
//! summary.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::checksum::Checksum;
use crate::diff::DiffResult;
use crate::error::Result;
use crate::version::SchemaVersion;

/// Line-level text change counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub insertions: usize,
    pub deletions: usize,
}

impl TextStats {
    pub fn changed(&self) -> bool {
        self.insertions > 0 || self.deletions > 0
    }
}

/// Count inserted and deleted lines between two texts
pub fn text_changes(old: &str, new: &str) -> TextStats {
    let diff = TextDiff::from_lines(old, new);
    let mut stats = TextStats::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.insertions += 1,
            ChangeTag::Delete => stats.deletions += 1,
            ChangeTag::Equal => {}
        }
    }

    stats
}

/// Full comparison report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    #[serde(flatten)]
    pub diff: DiffResult,

    /// Whether the raw artifact text changed at all
    pub raw_model_file_changed: bool,

    pub old_checksum: Checksum,
    pub new_checksum: Checksum,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_version: Option<String>,
}

impl ChangeReport {
    /// Build a report, computing the raw change flag from the texts
    pub fn new(diff: DiffResult, old_text: &str, new_text: &str) -> Self {
        let stats = text_changes(old_text, new_text);
        Self {
            diff,
            raw_model_file_changed: stats.changed(),
            old_checksum: Checksum::of_text(old_text),
            new_checksum: Checksum::of_text(new_text),
            text_stats: Some(stats),
            current_version: None,
            next_version: None,
        }
    }

    /// Use an externally supplied raw change flag instead of the computed one
    pub fn with_raw_changed(mut self, changed: Option<bool>) -> Self {
        if let Some(changed) = changed {
            self.raw_model_file_changed = changed;
        }
        self
    }

    /// Record the current version and the version the change calls for
    pub fn with_current_version(mut self, current: &SchemaVersion) -> Self {
        self.current_version = Some(current.version_string());
        self.next_version = Some(current.bump(self.diff.severity).version_string());
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            format!("Raw model file changed: {}", self.raw_model_file_changed),
            format!("Recommended semantic version bump: {}", self.diff.severity),
        ];
        if let (Some(current), Some(next)) = (&self.current_version, &self.next_version) {
            lines.push(format!("Next version: {} -> {}", current, next));
        }
        lines.push(String::new());

        let sections: [(&str, &[String]); 5] = [
            ("Added Types", self.diff.added_types.as_slice()),
            ("Removed Types", self.diff.removed_types.as_slice()),
            ("Changed Type Kind (struct<->enum)", self.diff.changed_type_kind.as_slice()),
            ("Added Members / Enum Cases", self.diff.added_members.as_slice()),
            ("Removed Members / Enum Cases", self.diff.removed_members.as_slice()),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            lines.push(format!("### {}", title));
            lines.extend(items.iter().map(|item| format!("- {}", item)));
            lines.push(String::new());
        }

        lines.push(format!("> {}", self.diff.severity.recommendation()));

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Severity;

    fn minor_diff() -> DiffResult {
        DiffResult {
            added_types: vec!["GeneratedGizmo".to_string()],
            removed_types: vec![],
            changed_type_kind: vec![],
            added_members: vec!["GeneratedWidget.size".to_string()],
            removed_members: vec![],
            severity: Severity::Minor,
        }
    }

    #[test]
    fn test_text_changes() {
        let stats = text_changes("a\nb\n", "a\nc\nd\n");
        assert_eq!(stats, TextStats { insertions: 2, deletions: 1 });
        assert!(!text_changes("same\n", "same\n").changed());
    }

    #[test]
    fn test_raw_flag_override() {
        let report = ChangeReport::new(minor_diff(), "x\n", "x\n");
        assert!(!report.raw_model_file_changed);
        let report = report.with_raw_changed(Some(true));
        assert!(report.raw_model_file_changed);
        let report = report.with_raw_changed(None);
        assert!(report.raw_model_file_changed);
    }

    #[test]
    fn test_json_keys() {
        let report = ChangeReport::new(minor_diff(), "a\n", "b\n");
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        for key in [
            "added_types",
            "removed_types",
            "changed_type_kind",
            "added_members",
            "removed_members",
            "semver",
            "raw_model_file_changed",
            "old_checksum",
            "new_checksum",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["semver"], "minor");
        assert!(value.get("next_version").is_none());
    }

    #[test]
    fn test_markdown_summary() {
        let current = SchemaVersion::parse("1.4.2").unwrap();
        let report = ChangeReport::new(minor_diff(), "a\n", "b\n").with_current_version(&current);
        let md = report.to_markdown();

        assert!(md.starts_with("Raw model file changed: true\nRecommended semantic version bump: minor\n"));
        assert!(md.contains("Next version: 1.4.2 -> 1.5.0\n"));
        assert!(md.contains("### Added Types\n- GeneratedGizmo\n"));
        assert!(md.contains("### Added Members / Enum Cases\n- GeneratedWidget.size\n"));
        assert!(!md.contains("### Removed Types"));
        assert!(md.ends_with("> Non-breaking additions detected.\n"));
    }
}
