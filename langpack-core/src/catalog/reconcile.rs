//! Catalog reconciliation and record filtering
//!
//! Reconciliation merges a normalized catalog with the locally installed
//! locale set, the pending updates and the active locale. It is a pure
//! function: no I/O, and output order equals catalog order.

use std::collections::BTreeSet;

use super::{ReconciledRecord, Status, TranslationRecord, UpdateRecord, UpdateState};
use crate::error::LangpackError;
use crate::store::Category;

/// Restricts update matching to one target of one category
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub category: Category,
    pub slug: &'a str,
}

/// Derive `status` and `update` for every catalog record
pub fn reconcile(
    catalog: &[TranslationRecord],
    installed: &BTreeSet<String>,
    pending: &[UpdateRecord],
    active_locale: &str,
    scope: Option<Scope<'_>>,
) -> Vec<ReconciledRecord> {
    catalog
        .iter()
        .map(|record| {
            let status = if record.locale == active_locale {
                Status::Active
            } else if installed.contains(&record.locale) {
                Status::Installed
            } else {
                Status::Uninstalled
            };

            let has_update = pending.iter().any(|u| {
                u.locale == record.locale
                    && scope.map_or(true, |s| u.category == s.category && u.slug == s.slug)
            });

            ReconciledRecord {
                target: scope
                    .filter(|s| s.category.is_extension())
                    .map(|s| s.slug.to_string()),
                locale: record.locale.clone(),
                english_name: record.english_name.clone(),
                native_name: record.native_name.clone(),
                status,
                update: if has_update {
                    UpdateState::Available
                } else {
                    UpdateState::None
                },
                updated: record.updated.clone(),
            }
        })
        .collect()
}

/// A filterable field of a reconciled record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Target,
    Locale,
    EnglishName,
    NativeName,
    Status,
    Update,
    Updated,
}

/// Field name → accessor table
const FIELDS: &[(&str, Field)] = &[
    ("target", Field::Target),
    ("locale", Field::Locale),
    ("language", Field::Locale),
    ("english_name", Field::EnglishName),
    ("native_name", Field::NativeName),
    ("status", Field::Status),
    ("update", Field::Update),
    ("updated", Field::Updated),
];

impl Field {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().replace('-', "_");
        FIELDS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, field)| *field)
    }

    pub fn value(self, record: &ReconciledRecord) -> &str {
        match self {
            Field::Target => record.target.as_deref().unwrap_or(""),
            Field::Locale => &record.locale,
            Field::EnglishName => &record.english_name,
            Field::NativeName => &record.native_name,
            Field::Status => record.status.as_str(),
            Field::Update => record.update.as_str(),
            Field::Updated => &record.updated,
        }
    }
}

/// Conjunction of per-field "value is one of" predicates
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    predicates: Vec<(Field, BTreeSet<String>)>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain a field to a comma-separated set of accepted values
    pub fn constrain(mut self, name: &str, accepted: &str) -> Result<Self, LangpackError> {
        let field = Field::from_name(name)
            .ok_or_else(|| LangpackError::Validation(format!("Unknown field '{name}'.")))?;

        let values: BTreeSet<String> = accepted
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        self.predicates.push((field, values));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, record: &ReconciledRecord) -> bool {
        self.predicates
            .iter()
            .all(|(field, accepted)| accepted.contains(field.value(record)))
    }

    pub fn apply(&self, records: Vec<ReconciledRecord>) -> Vec<ReconciledRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
