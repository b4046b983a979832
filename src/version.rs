//! Artifact versioning utilities

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diff::Severity;
use crate::error::{GeneratorError, Result};

/// Version of a published set of generated models
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Semantic version (e.g., "1.2.3")
    pub version: Version,
}

impl SchemaVersion {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Create from a version string
    pub fn parse(version_str: &str) -> Result<Self> {
        // Strip leading 'v' if present
        let trimmed = version_str.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let version = Version::parse(trimmed)
            .map_err(|e| GeneratorError::InvalidVersion(format!("{}: {}", version_str, e)))?;
        Ok(Self::new(version))
    }

    /// Get the version string (e.g., "1.2.3")
    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    /// Get the tag string (e.g., "v1.2.3")
    pub fn tag_string(&self) -> String {
        format!("v{}", self.version)
    }

    /// Bump major version
    pub fn bump_major(&self) -> Self {
        Self::new(Version::new(self.version.major + 1, 0, 0))
    }

    /// Bump minor version
    pub fn bump_minor(&self) -> Self {
        Self::new(Version::new(self.version.major, self.version.minor + 1, 0))
    }

    /// Bump patch version
    pub fn bump_patch(&self) -> Self {
        Self::new(Version::new(
            self.version.major,
            self.version.minor,
            self.version.patch + 1,
        ))
    }

    /// Next version for a classified change
    pub fn bump(&self, severity: Severity) -> Self {
        match severity {
            Severity::Major => self.bump_major(),
            Severity::Minor => self.bump_minor(),
            Severity::Patch => self.bump_patch(),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)
    }
}
