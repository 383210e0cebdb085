//! Language package installation from the catalog
//!
//! Handles downloading, verifying, and extracting language packages
//! into the category's language directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::CatalogProvider;
use crate::store::{Category, LanguageLayout, Target};

/// Why a package could not be installed
#[derive(Error, Debug)]
pub enum InstallError {
    /// The catalog offers no package for this locale and target
    #[error("No '{locale}' language package is available for {target}.")]
    NotFound { locale: String, target: String },

    /// Download, verification, or extraction failed
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Downloads and unpacks one package into the local store
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn install_package(
        &self,
        category: Category,
        target: &Target,
        locale: &str,
    ) -> std::result::Result<(), InstallError>;
}

/// Installer for catalog packages served over HTTP as `.tar.gz`
pub struct HttpInstaller {
    client: reqwest::Client,
    catalog: Arc<dyn CatalogProvider>,
    layout: LanguageLayout,
}

impl HttpInstaller {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        layout: LanguageLayout,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("langpack/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            catalog,
            layout,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to download language package")?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed: HTTP {} for {}", response.status(), url);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read download response")?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PackageInstaller for HttpInstaller {
    async fn install_package(
        &self,
        category: Category,
        target: &Target,
        locale: &str,
    ) -> std::result::Result<(), InstallError> {
        let catalog = self.catalog.fetch_catalog(category, target).await?;

        let not_found = || InstallError::NotFound {
            locale: locale.to_string(),
            target: target.to_string(),
        };
        let record = catalog
            .iter()
            .find(|r| r.locale == locale)
            .ok_or_else(not_found)?;
        let url = record.package.as_deref().ok_or_else(not_found)?;

        tracing::info!("Downloading {} package for {} from {}", locale, target, url);
        let bytes = self.download(url).await?;

        if let Some(expected) = &record.digest {
            verify_digest(&bytes, expected)?;
            tracing::debug!("Verified digest: {}", expected);
        }

        let dest = self.layout.language_dir(category);
        let written = extract_package(&bytes, &dest)?;

        tracing::info!(
            "Installed {} for {} ({} files in {})",
            locale,
            target,
            written,
            dest.display()
        );
        Ok(())
    }
}

/// Verify the SHA256 digest (`sha256:<hex>`) of downloaded content
pub fn verify_digest(bytes: &[u8], expected: &str) -> Result<()> {
    let actual = format!("sha256:{}", hex::encode(Sha256::digest(bytes)));

    if actual != expected {
        anyhow::bail!(
            "Digest verification failed!\nExpected: {}\nActual: {}",
            expected,
            actual
        );
    }

    Ok(())
}

/// Extract the regular files of a `.tar.gz` package, flattened, into `dest`
///
/// Entries are written by bare file name only, so nothing lands outside
/// `dest`. Returns the number of files written.
pub fn extract_package(bytes: &[u8], dest: &Path) -> Result<usize> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create language directory: {}", dest.display()))?;

    let cursor = Cursor::new(bytes);
    let gz_decoder = flate2::read::GzDecoder::new(cursor);
    let mut archive = tar::Archive::new(gz_decoder);

    let mut written = 0;
    for entry in archive.entries().context("Failed to read package archive")? {
        let mut entry = entry.context("Failed to read package entry")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = {
            let path = entry.path().context("Invalid path in package")?;
            path.file_name().map(|n| n.to_os_string())
        };
        let Some(name) = name else {
            continue;
        };

        entry
            .unpack(dest.join(&name))
            .with_context(|| format!("Failed to extract {name:?}"))?;
        written += 1;
    }

    if written == 0 {
        anyhow::bail!("Language package contained no files");
    }

    Ok(written)
}
