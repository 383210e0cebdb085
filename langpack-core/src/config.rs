//! Persisted configuration
//!
//! Stored as YAML in the platform config directory, e.g.
//! `~/.config/langpack/config.yaml` on Linux.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::LanguageLayout;

/// Default catalog API base URL
pub const DEFAULT_API_URL: &str = "https://api.langpack.dev/translations";

/// Default core product version sent to the catalog
pub const DEFAULT_PRODUCT_VERSION: &str = "6.5";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangpackConfig {
    /// Host application content root
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Catalog API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Core product version
    #[serde(default = "default_product_version")]
    pub product_version: String,

    /// HTTP timeout for catalog and package requests
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_product_version() -> String {
    DEFAULT_PRODUCT_VERSION.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for LangpackConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            api_url: default_api_url(),
            product_version: default_product_version(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl LangpackConfig {
    /// Load from the default config location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_config_path()?)
    }

    /// Load from a specific path; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save to a specific path, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// `config.yaml` inside the platform config directory
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("dev", "langpack", "langpack")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("langpack")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join("config.yaml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn layout(&self) -> LanguageLayout {
        LanguageLayout::new(&self.content_dir)
    }
}
