//! Active-locale setting (languages/settings.yaml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ActivationStore, BASE_LOCALE};

/// Persisted language settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Active locale; absent means the base locale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// YAML-file activation store
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file inside a languages root
    pub fn in_languages_root(root: &Path) -> Self {
        Self::new(root.join("settings.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings or return defaults if the file does not exist
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path.display()))?;

        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", self.path.display()))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(settings).context("Failed to serialize settings")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))?;

        Ok(())
    }
}

impl ActivationStore for SettingsFile {
    fn active_locale(&self) -> Result<String> {
        let settings = self.load()?;
        Ok(settings
            .locale
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| BASE_LOCALE.to_string()))
    }

    fn set_active_locale(&self, locale: Option<&str>) -> Result<()> {
        let mut settings = self.load()?;
        settings.locale = locale.map(str::to_string);
        self.save(&settings)?;

        tracing::info!(
            "Active locale set to {}",
            locale.unwrap_or(BASE_LOCALE)
        );
        Ok(())
    }
}
