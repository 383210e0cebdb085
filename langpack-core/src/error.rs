//! Engine error types with clear, actionable messages

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a lifecycle command before or while it runs
///
/// Per-item failures inside a batch are never surfaced through this type;
/// they are recorded as operation results instead.
#[derive(Error, Debug)]
pub enum LangpackError {
    /// Bad or contradictory arguments, reported before any I/O
    #[error("{0}")]
    Validation(String),

    /// The catalog offers no package for this locale
    #[error("Language '{locale}' not found for {target}.")]
    LocaleNotFound { locale: String, target: String },

    /// The locale is not present on disk for the target
    #[error("Language '{locale}' not installed for {target}.")]
    NotInstalled { locale: String, target: String },

    /// The language directory could not be listed
    #[error("Cannot read language directory {path}.\n\nNothing can be removed safely without a file listing.")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external collaborator (catalog, store, settings) failed
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LangpackError>;
