//! Extension manifest parsing (manifest.yaml)
//!
//! Plugins and themes may carry a manifest naming the extension and its
//! version. The version is forwarded to the catalog so it can serve the
//! matching translations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An extension manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionManifest {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Installed version
    #[serde(default)]
    pub version: Option<String>,
}

impl ExtensionManifest {
    /// Parse manifest from YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).context("Failed to parse extension manifest YAML")
    }

    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid manifest: {}", path.display()))
    }
}
