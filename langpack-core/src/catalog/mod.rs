//! Translation catalog - discovery, reconciliation and installation
//!
//! This module provides functionality for reading the remote translation
//! catalog, merging it with local state, and installing packages from it.
//!
//! # Overview
//!
//! - Fetch the translations offered for a target ([`CatalogProvider`])
//! - Derive `status` / `update` for every offered locale ([`reconcile`])
//! - Filter reconciled records by field values ([`RecordFilter`])
//! - Download and unpack packages ([`PackageInstaller`])
//!
//! # Architecture
//!
//! ```text
//! Translations API
//!     │
//!     ├── {category}/1.0/?slug=..  ← Lists translations per target
//!     └── packages/*.tar.gz        ← Packaged translations
//!            │
//!            ▼
//!     Reconciler + Lifecycle Executor
//!            │
//!            ▼
//!     <content_dir>/languages/     ← Installed packages
//! ```

mod installer;
mod manifest;
mod provider;
mod reconcile;
mod record;

pub use installer::{extract_package, verify_digest, HttpInstaller, InstallError, PackageInstaller};
pub use manifest::ExtensionManifest;
pub use provider::{find_updates, parse_catalog, CatalogProvider, HttpCatalog};
pub use reconcile::{reconcile, Field, RecordFilter, Scope};
pub use record::{
    natural_cmp, normalize_catalog, parse_timestamp, ReconciledRecord, Status, TranslationRecord,
    UpdateRecord, UpdateState,
};
