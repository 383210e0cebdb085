//! On-disk naming of language package files

use regex::Regex;
use std::path::{Path, PathBuf};

use super::{Category, Target};

/// Extensions of the fixed files every package ships
const PACKAGE_EXTENSIONS: &[&str] = &[".po", ".mo", ".l10n.php"];

/// Extra file families only the core product ships
const CORE_PREFIXES: &[&str] = &["admin-", "admin-network-", "continents-cities-"];

/// Resolves where packages live and which files belong to which package
#[derive(Debug, Clone)]
pub struct LanguageLayout {
    content_dir: PathBuf,
}

impl LanguageLayout {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Root of all language packages
    pub fn languages_root(&self) -> PathBuf {
        self.content_dir.join("languages")
    }

    /// Directory holding the packages of one category
    pub fn language_dir(&self, category: Category) -> PathBuf {
        match category.language_subdir() {
            Some(sub) => self.languages_root().join(sub),
            None => self.languages_root(),
        }
    }

    /// Directory holding the extensions of one category
    pub fn extension_dir(&self, category: Category) -> Option<PathBuf> {
        category
            .extension_dir()
            .map(|sub| self.content_dir.join(sub))
    }

    /// Path of the translation source file of an installed package
    pub fn po_path(&self, category: Category, target: &Target, locale: &str) -> PathBuf {
        self.language_dir(category)
            .join(format!("{}{locale}.po", file_prefix(category, target)))
    }

    /// The subset of `listing` owned by the (target, locale) package
    ///
    /// Owned files are the fixed package files plus generated JSON assets
    /// named `<prefix><locale>-<md5>.json`. Nothing else is ever returned.
    pub fn owned_files(
        &self,
        category: Category,
        target: &Target,
        locale: &str,
        listing: &[String],
    ) -> Vec<String> {
        let prefix = file_prefix(category, target);

        let mut stems = vec![format!("{prefix}{locale}")];
        if category == Category::Core {
            stems.extend(CORE_PREFIXES.iter().map(|p| format!("{p}{locale}")));
        }

        let expected: Vec<String> = stems
            .iter()
            .flat_map(|stem| PACKAGE_EXTENSIONS.iter().map(move |ext| format!("{stem}{ext}")))
            .collect();

        let asset_pattern = format!(
            "^{}{}-[0-9a-f]{{32}}\\.json$",
            regex::escape(&prefix),
            regex::escape(locale)
        );
        let assets = Regex::new(&asset_pattern).ok();

        listing
            .iter()
            .filter(|name| {
                expected.iter().any(|e| e == *name)
                    || assets.as_ref().is_some_and(|re| re.is_match(name))
            })
            .cloned()
            .collect()
    }

    /// Locale of a compiled package file, if `file_name` is one for `target`
    pub fn installed_locale<'a>(
        &self,
        category: Category,
        target: &Target,
        file_name: &'a str,
    ) -> Option<&'a str> {
        let prefix = file_prefix(category, target);
        let locale = file_name.strip_prefix(prefix.as_str())?.strip_suffix(".mo")?;

        if locale.is_empty() || locale.contains('-') {
            return None;
        }
        Some(locale)
    }
}

fn file_prefix(category: Category, target: &Target) -> String {
    if category.is_extension() {
        format!("{}-", target.slug)
    } else {
        String::new()
    }
}

/// Extract the `PO-Revision-Date` header of a PO file
pub fn parse_po_revision(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim().trim_matches('"');
        let value = line.strip_prefix("PO-Revision-Date:")?;
        let value = value.trim().trim_end_matches("\\n").trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
