//! Local installation state
//!
//! Everything the engine knows about what is on disk goes through the
//! seams defined here:
//!
//! - [`InstalledState`] enumerates targets and the locales installed for them
//! - [`FileStore`] lists and deletes files in a language directory
//! - [`ActivationStore`] reads and writes the single active-locale setting
//!
//! # Layout
//!
//! ```text
//! <content_dir>/
//!     ├── plugins/<slug>/manifest.yaml   ← extension targets
//!     ├── themes/<slug>/manifest.yaml
//!     └── languages/                     ← core packages
//!            ├── settings.yaml           ← active locale
//!            ├── plugins/                ← plugin packages
//!            └── themes/                 ← theme packages
//! ```

mod activation;
mod fs;
mod layout;

pub use activation::{Settings, SettingsFile};
pub use fs::FsStore;
pub use layout::{parse_po_revision, LanguageLayout};

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// The source-language locale, always implicitly installed
pub const BASE_LOCALE: &str = "en_US";

/// Slug of the implicit core target
pub const CORE_TARGET_SLUG: &str = "default";

/// Package category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Plugin,
    Theme,
}

/// Category → language subdirectory (relative to the languages root)
const LANGUAGE_SUBDIRS: [(Category, Option<&str>); 3] = [
    (Category::Core, None),
    (Category::Plugin, Some("plugins")),
    (Category::Theme, Some("themes")),
];

/// Category → extension directory (relative to the content root)
const EXTENSION_DIRS: [(Category, Option<&str>); 3] = [
    (Category::Core, None),
    (Category::Plugin, Some("plugins")),
    (Category::Theme, Some("themes")),
];

fn lookup(table: &[(Category, Option<&'static str>)], category: Category) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == category)
        .and_then(|(_, dir)| *dir)
}

impl Category {
    /// Subdirectory of the languages root holding this category's packages
    pub fn language_subdir(self) -> Option<&'static str> {
        lookup(&LANGUAGE_SUBDIRS, self)
    }

    /// Subdirectory of the content root holding this category's extensions
    pub fn extension_dir(self) -> Option<&'static str> {
        lookup(&EXTENSION_DIRS, self)
    }

    /// Path segment used by the catalog API
    pub fn api_segment(self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Plugin => "plugins",
            Category::Theme => "themes",
        }
    }

    pub fn is_extension(self) -> bool {
        self != Category::Core
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Core => "core",
            Category::Plugin => "plugin",
            Category::Theme => "theme",
        };
        f.write_str(name)
    }
}

/// The core product, a plugin, or a theme a language pack applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub slug: String,
    pub name: String,
    pub version: Option<String>,
}

impl Target {
    /// The implicit core target
    pub fn core(product_version: &str) -> Self {
        Self {
            slug: CORE_TARGET_SLUG.to_string(),
            name: "core".to_string(),
            version: Some(product_version.to_string()),
        }
    }

    pub fn is_core(&self) -> bool {
        self.slug == CORE_TARGET_SLUG
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core() {
            f.write_str("core")
        } else {
            write!(f, "'{}'", self.slug)
        }
    }
}

/// An installed translation and the revision stamped into its source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTranslation {
    pub target: Target,
    pub locale: String,
    pub revision: Option<String>,
}

/// Installed-state reader
///
/// Results are recomputed on every call; implementations must not cache
/// across calls since install and uninstall change the answer.
pub trait InstalledState: Send + Sync {
    /// All targets of a category (core has exactly one)
    fn targets(&self, category: Category) -> Result<Vec<Target>>;

    /// Locales present for a target, always including [`BASE_LOCALE`]
    fn installed_locales(&self, category: Category, target: &Target) -> Result<BTreeSet<String>>;

    /// Installed translations other than the base locale, with revisions
    fn installed_translations(
        &self,
        category: Category,
        target: &Target,
    ) -> Result<Vec<InstalledTranslation>>;

    /// Directory holding this category's package files
    fn language_dir(&self, category: Category) -> PathBuf;

    /// The names in `listing` that belong to the (target, locale) package
    fn owned_files(
        &self,
        category: Category,
        target: &Target,
        locale: &str,
        listing: &[String],
    ) -> Vec<String>;
}

/// File store primitives used only for removal
pub trait FileStore: Send + Sync {
    /// File names (not paths) of the regular files in `path`
    fn list_directory(&self, path: &Path) -> std::io::Result<Vec<String>>;

    /// Delete one file, reporting whether it is gone
    fn delete_file(&self, path: &Path) -> bool;
}

/// The single global active-locale setting
pub trait ActivationStore: Send + Sync {
    /// Currently active locale ([`BASE_LOCALE`] when unset)
    fn active_locale(&self) -> Result<String>;

    /// Persist the active locale; `None` clears the setting
    fn set_active_locale(&self, locale: Option<&str>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_directory_table() {
        assert_eq!(Category::Core.language_subdir(), None);
        assert_eq!(Category::Plugin.language_subdir(), Some("plugins"));
        assert_eq!(Category::Theme.language_subdir(), Some("themes"));
        assert_eq!(Category::Core.extension_dir(), None);
        assert_eq!(Category::Theme.extension_dir(), Some("themes"));
    }

    #[test]
    fn test_target_display() {
        let core = Target::core("6.5");
        assert!(core.is_core());
        assert_eq!(core.to_string(), "core");

        let plugin = Target {
            slug: "akismet".to_string(),
            name: "Akismet".to_string(),
            version: None,
        };
        assert_eq!(plugin.to_string(), "'akismet'");
    }
}
