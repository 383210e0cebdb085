//! Catalog providers
//!
//! The catalog is the remote, authoritative list of translations offered
//! for a target. [`HttpCatalog`] talks to a translations API shaped like:
//!
//! ```text
//! GET {api_url}/{core|plugins|themes}/1.0/?version=6.5&slug=akismet
//!
//! {"translations": [{"language": "nl_NL", "updated": "2024-03-01 10:15:00",
//!   "english_name": "Dutch", "native_name": "Nederlands",
//!   "package": "https://.../akismet-nl_NL.tar.gz", "digest": "sha256:..."}]}
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{normalize_catalog, parse_timestamp, TranslationRecord, UpdateRecord};
use crate::store::{Category, InstalledTranslation, Target};

/// Remote catalog of translations
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Translations offered for one target, normalized (base locale
    /// injected, naturally sorted)
    async fn fetch_catalog(
        &self,
        category: Category,
        target: &Target,
    ) -> Result<Vec<TranslationRecord>>;

    /// Pending updates among the given installed translations
    ///
    /// Never reports a locale that is not in `installed`.
    async fn fetch_pending_updates(
        &self,
        category: Category,
        installed: &[InstalledTranslation],
    ) -> Result<Vec<UpdateRecord>>;
}

/// Wire format of a catalog response
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    translations: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    language: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    updated: String,
    english_name: String,
    native_name: String,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

impl From<CatalogEntry> for TranslationRecord {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            locale: entry.language,
            english_name: entry.english_name,
            native_name: entry.native_name,
            updated: entry.updated,
            version: entry.version,
            package: entry.package,
            digest: entry.digest,
        }
    }
}

/// Parse and normalize a catalog response body
pub fn parse_catalog(body: &str) -> Result<Vec<TranslationRecord>> {
    let response: CatalogResponse =
        serde_json::from_str(body).context("Failed to parse catalog response")?;

    Ok(normalize_catalog(
        response.translations.into_iter().map(Into::into).collect(),
    ))
}

/// Pending updates: installed translations whose catalog record is newer
/// than the revision stamped into the installed source file
pub fn find_updates(
    category: Category,
    catalog: &[TranslationRecord],
    installed: &[InstalledTranslation],
) -> Vec<UpdateRecord> {
    installed
        .iter()
        .filter_map(|translation| {
            let record = catalog.iter().find(|r| r.locale == translation.locale)?;
            let remote = parse_timestamp(&record.updated)?;
            let local = parse_timestamp(translation.revision.as_deref()?)?;

            (remote > local).then(|| UpdateRecord {
                category,
                slug: translation.target.slug.clone(),
                locale: translation.locale.clone(),
                name: translation.target.name.clone(),
                version: translation.target.version.clone(),
            })
        })
        .collect()
}

/// Catalog provider backed by the translations HTTP API
pub struct HttpCatalog {
    client: reqwest::Client,
    api_url: String,
    product_version: String,
}

impl HttpCatalog {
    pub fn new(api_url: &str, product_version: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("langpack/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            product_version: product_version.to_string(),
        })
    }

    /// Catalog endpoint for one target
    pub fn catalog_url(&self, category: Category, target: &Target) -> String {
        let mut url = format!(
            "{}/{}/1.0/?version={}",
            self.api_url,
            category.api_segment(),
            self.product_version
        );
        if category.is_extension() {
            url.push_str(&format!("&slug={}", target.slug));
            if let Some(version) = &target.version {
                url.push_str(&format!("&{}_version={}", category, version));
            }
        }
        url
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    async fn fetch_catalog(
        &self,
        category: Category,
        target: &Target,
    ) -> Result<Vec<TranslationRecord>> {
        let url = self.catalog_url(category, target);
        tracing::debug!("Fetching {} catalog for {} from {}", category, target, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch translation catalog from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch translation catalog: HTTP {} from {}",
                response.status(),
                url
            );
        }

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        parse_catalog(&body).with_context(|| format!("Invalid translation catalog from {url}"))
    }

    async fn fetch_pending_updates(
        &self,
        category: Category,
        installed: &[InstalledTranslation],
    ) -> Result<Vec<UpdateRecord>> {
        let mut by_target: Vec<(&Target, Vec<InstalledTranslation>)> = Vec::new();
        for translation in installed {
            match by_target
                .iter_mut()
                .find(|(t, _)| t.slug == translation.target.slug)
            {
                Some((_, group)) => group.push(translation.clone()),
                None => by_target.push((&translation.target, vec![translation.clone()])),
            }
        }

        let mut updates = Vec::new();
        for (target, translations) in by_target {
            let catalog = self
                .fetch_catalog(category, target)
                .await
                .with_context(|| format!("Update check failed for {target}"))?;
            updates.extend(find_updates(category, &catalog, &translations));
        }

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(slug: &str, locale: &str, revision: Option<&str>) -> InstalledTranslation {
        InstalledTranslation {
            target: Target {
                slug: slug.to_string(),
                name: slug.to_string(),
                version: Some("1.0".to_string()),
            },
            locale: locale.to_string(),
            revision: revision.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_catalog_injects_base() {
        let body = r#"{"translations": [
            {"language": "nl_NL", "version": "6.5", "updated": "2024-03-01 10:15:00",
             "english_name": "Dutch", "native_name": "Nederlands",
             "package": "https://example.com/nl_NL.tar.gz"},
            {"language": "de_DE", "updated": "2024-02-01 08:00:00",
             "english_name": "German", "native_name": "Deutsch"}
        ]}"#;

        let records = parse_catalog(body).unwrap();
        let locales: Vec<&str> = records.iter().map(|r| r.locale.as_str()).collect();
        assert_eq!(locales, vec!["de_DE", "en_US", "nl_NL"]);
        assert_eq!(
            records[2].package.as_deref(),
            Some("https://example.com/nl_NL.tar.gz")
        );
        assert!(records[0].package.is_none());
    }

    #[test]
    fn test_parse_catalog_rejects_garbage() {
        assert!(parse_catalog("<html>").is_err());
    }

    #[test]
    fn test_find_updates_compares_revisions() {
        let body = r#"{"translations": [
            {"language": "nl_NL", "updated": "2024-03-01 10:15:00",
             "english_name": "Dutch", "native_name": "Nederlands"},
            {"language": "de_DE", "updated": "2024-02-01 08:00:00",
             "english_name": "German", "native_name": "Deutsch"},
            {"language": "fr_FR", "updated": "2024-02-01 08:00:00",
             "english_name": "French", "native_name": "Français"}
        ]}"#;
        let catalog = parse_catalog(body).unwrap();

        let installed = vec![
            translation("akismet", "nl_NL", Some("2024-01-01 00:00:00+0000")),
            translation("akismet", "de_DE", Some("2024-02-01 08:00:00+0000")),
            translation("akismet", "fr_FR", None),
            translation("akismet", "sv_SE", Some("2020-01-01 00:00:00+0000")),
        ];

        let updates = find_updates(Category::Plugin, &catalog, &installed);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].locale, "nl_NL");
        assert_eq!(updates[0].slug, "akismet");
        assert_eq!(updates[0].version.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn test_pending_updates_fail_when_catalog_unreachable() {
        let catalog =
            HttpCatalog::new("http://127.0.0.1:1", "6.5", Duration::from_secs(5)).unwrap();
        let installed = vec![InstalledTranslation {
            target: Target::core("6.5"),
            locale: "nl_NL".to_string(),
            revision: Some("2024-01-01 00:00:00+0000".to_string()),
        }];

        let err = catalog
            .fetch_pending_updates(Category::Core, &installed)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("Update check failed"));
    }

    #[test]
    fn test_catalog_url() {
        let catalog =
            HttpCatalog::new("https://api.example.com/translations/", "6.5", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            catalog.catalog_url(Category::Core, &Target::core("6.5")),
            "https://api.example.com/translations/core/1.0/?version=6.5"
        );

        let target = Target {
            slug: "akismet".to_string(),
            name: "Akismet".to_string(),
            version: Some("5.3".to_string()),
        };
        assert_eq!(
            catalog.catalog_url(Category::Plugin, &target),
            "https://api.example.com/translations/plugins/1.0/?version=6.5&slug=akismet&plugin_version=5.3"
        );
    }
}
