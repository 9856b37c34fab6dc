use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::{HighlightMode, DEFAULT_PREVIEW_LIMIT};

/// Failures reading a config or snapshot document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("preview_limit must be at least 1")]
    ZeroPreviewLimit,
}

/// Tunables for a resolution pass.
///
/// Typically loaded from a `.yaml` or `.json` file next to the snapshot;
/// every field has a default so an empty document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub highlight_mode: HighlightMode,
    /// Candidate targets shown for an ambiguous branch.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
    /// Bind operands to recovered variables.
    #[serde(default = "default_true")]
    pub show_variables: bool,
    /// Overrides the snapshot's architecture when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

fn default_true() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            highlight_mode: HighlightMode::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            show_variables: true,
            arch: None,
        }
    }
}

impl ResolverConfig {
    /// Load and validate a config from YAML or JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load_document(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_limit == 0 {
            return Err(ConfigError::ZeroPreviewLimit);
        }
        Ok(())
    }
}

/// Parse a YAML (`.yaml`/`.yml`) or JSON (anything else) document.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })
    } else {
        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }
}
