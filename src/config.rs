//! Configuration management for the model generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (modelgen.toml)
//! - Environment variables (MODELGEN__*)
//!
//! ## Example config file (modelgen.toml):
//! ```toml
//! [prune]
//! keep_paths = ["/responses", "/files", "/files/{file_id}", "/embeddings"]
//! extra_security_schemes = ["ApiKeyAuth"]
//!
//! [naming]
//! strip_prefixes = ["OpenAI."]
//! vendor_tokens = ["Azure"]
//! marker_prefix = "Generated"
//!
//! [[naming.overrides]]
//! from = "error"
//! to = "Error"
//!
//! [render.types]
//! any = "SAOAIJSONValue"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::codegen::config::{NamingConfig, RenderProfile};

/// Main configuration for the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Pruning settings
    #[serde(default)]
    pub prune: PruneConfig,

    /// Naming conventions
    #[serde(default)]
    pub naming: NamingConfig,

    /// Target language rendering
    #[serde(default)]
    pub render: RenderProfile,
}

/// Pruning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Operation paths to keep
    #[serde(default = "default_keep_paths")]
    pub keep_paths: Vec<String>,

    /// Security schemes kept whenever the source defines them
    #[serde(default = "default_extra_security_schemes")]
    pub extra_security_schemes: Vec<String>,
}

fn default_keep_paths() -> Vec<String> {
    ["/responses", "/embeddings", "/files", "/files/{file_id}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_extra_security_schemes() -> Vec<String> {
    vec!["ApiKeyAuth".to_string()]
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            keep_paths: default_keep_paths(),
            extra_security_schemes: default_extra_security_schemes(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "modelgen.toml",
            ".modelgen.toml",
            "config/modelgen.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // MODELGEN__NAMING__MARKER_PREFIX=Gen
        builder = builder.add_source(
            Environment::with_prefix("MODELGEN")
                .separator("__")
                .try_parsing(true)
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Parse configuration from a TOML string (no files, no environment)
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, config_crate::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
