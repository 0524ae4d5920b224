//! # Configuration
//!
//! Site layout and schema source settings, read from a YAML file.
//!
//! Lookup order: `--config <file>` if given, else `potion.yaml` in the
//! working directory if present, else built-in defaults matching the site's
//! directory convention. Command-line flags override whatever was loaded.
//!
//! ```yaml
//! potions_dir: src/statics/potions
//! schemas_dir: src/statics/schemas
//! site_origin: https://uipotion.com/schema/
//! schema_url: http://localhost:8080/schemas/
//! http_timeout_secs: 10
//! ```

use std::path::{Path, PathBuf};

use potion_core::{RefRules, DEFAULT_SITE_ORIGIN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "potion.yaml";

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid configuration YAML.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
}

/// Toolkit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PotionConfig {
    /// Root of the potion tree, one subfolder per category.
    pub potions_dir: PathBuf,
    /// Root of the local schema tree.
    pub schemas_dir: PathBuf,
    /// Origin under which schemas declare their `$id`s.
    pub site_origin: String,
    /// Fetch schemas from this URL instead of `schemas_dir`.
    pub schema_url: Option<String>,
    /// Per-request timeout for `schema_url` fetches. Unset means no timeout.
    pub http_timeout_secs: Option<u64>,
}

impl Default for PotionConfig {
    fn default() -> Self {
        Self {
            potions_dir: PathBuf::from("src/statics/potions"),
            schemas_dir: PathBuf::from("src/statics/schemas"),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            schema_url: None,
            http_timeout_secs: None,
        }
    }
}

impl PotionConfig {
    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given, else from `potion.yaml` under `cwd` if
    /// it exists, else defaults.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    /// Reference rules for this site origin.
    pub fn ref_rules(&self) -> RefRules {
        RefRules::new(self.site_origin.clone())
    }
}
