//! Filesystem-backed installed state and file store

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{
    parse_po_revision, Category, FileStore, InstalledState, InstalledTranslation, LanguageLayout,
    Target, BASE_LOCALE,
};
use crate::catalog::ExtensionManifest;

/// Reads installation state straight from the content directory
#[derive(Debug, Clone)]
pub struct FsStore {
    layout: LanguageLayout,
    product_version: String,
}

impl FsStore {
    pub fn new(layout: LanguageLayout, product_version: impl Into<String>) -> Self {
        Self {
            layout,
            product_version: product_version.into(),
        }
    }

    pub fn layout(&self) -> &LanguageLayout {
        &self.layout
    }

    fn extension_targets(&self, dir: &Path) -> Result<Vec<Target>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut targets = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read extension directory: {}", dir.display()))?
        {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(slug) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            let manifest_path = entry.path().join("manifest.yaml");
            let target = if manifest_path.exists() {
                let manifest = ExtensionManifest::from_file(&manifest_path)?;
                Target {
                    name: manifest.name.unwrap_or_else(|| slug.clone()),
                    version: manifest.version,
                    slug,
                }
            } else {
                Target {
                    name: slug.clone(),
                    version: None,
                    slug,
                }
            };
            targets.push(target);
        }

        targets.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(targets)
    }
}

impl InstalledState for FsStore {
    fn targets(&self, category: Category) -> Result<Vec<Target>> {
        match self.layout.extension_dir(category) {
            Some(dir) => self.extension_targets(&dir),
            None => Ok(vec![Target::core(&self.product_version)]),
        }
    }

    fn installed_locales(&self, category: Category, target: &Target) -> Result<BTreeSet<String>> {
        let mut locales = BTreeSet::new();
        locales.insert(BASE_LOCALE.to_string());

        let dir = self.layout.language_dir(category);
        if !dir.exists() {
            return Ok(locales);
        }

        for name in self
            .list_directory(&dir)
            .with_context(|| format!("Failed to read language directory: {}", dir.display()))?
        {
            if let Some(locale) = self.layout.installed_locale(category, target, &name) {
                locales.insert(locale.to_string());
            }
        }

        Ok(locales)
    }

    fn installed_translations(
        &self,
        category: Category,
        target: &Target,
    ) -> Result<Vec<InstalledTranslation>> {
        let locales = self.installed_locales(category, target)?;

        Ok(locales
            .into_iter()
            .filter(|locale| locale != BASE_LOCALE)
            .map(|locale| {
                let po_path = self.layout.po_path(category, target, &locale);
                let revision = std::fs::read_to_string(&po_path)
                    .ok()
                    .and_then(|content| parse_po_revision(&content));
                if revision.is_none() {
                    tracing::debug!("No revision readable from {}", po_path.display());
                }
                InstalledTranslation {
                    target: target.clone(),
                    locale,
                    revision,
                }
            })
            .collect())
    }

    fn language_dir(&self, category: Category) -> PathBuf {
        self.layout.language_dir(category)
    }

    fn owned_files(
        &self,
        category: Category,
        target: &Target,
        locale: &str,
        listing: &[String],
    ) -> Vec<String> {
        self.layout.owned_files(category, target, locale, listing)
    }
}

impl FileStore for FsStore {
    fn list_directory(&self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_file(&self, path: &Path) -> bool {
        match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to delete {}: {}", path.display(), e);
                false
            }
        }
    }
}
