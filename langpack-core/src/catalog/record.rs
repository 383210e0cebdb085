//! Translation records and catalog normalization
//!
//! A catalog response lists every translation offered for one target.
//! Before use it is normalized: the synthetic base-locale record is
//! injected exactly once and the records are sorted naturally and
//! case-insensitively by locale.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::store::{Category, BASE_LOCALE};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub locale: String,
    pub english_name: String,
    pub native_name: String,

    /// Last update timestamp; empty for the synthetic base locale
    #[serde(default)]
    pub updated: String,

    /// Package version as published by the catalog
    #[serde(default)]
    pub version: Option<String>,

    /// Download URL of the package archive
    #[serde(default)]
    pub package: Option<String>,

    /// `sha256:<hex>` digest of the package archive
    #[serde(default)]
    pub digest: Option<String>,
}

impl TranslationRecord {
    /// The synthetic record for the base locale
    pub fn base() -> Self {
        Self {
            locale: BASE_LOCALE.to_string(),
            english_name: "English (United States)".to_string(),
            native_name: "English (United States)".to_string(),
            updated: String::new(),
            version: None,
            package: None,
            digest: None,
        }
    }
}

/// Derived installation status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Installed,
    Uninstalled,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Installed => "installed",
            Status::Uninstalled => "uninstalled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived update availability of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Available,
    None,
}

impl UpdateState {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateState::Available => "available",
            UpdateState::None => "none",
        }
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pending update surfaced by the catalog provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRecord {
    pub category: Category,
    pub slug: String,
    pub locale: String,
    pub name: String,
    pub version: Option<String>,
}

/// A catalog record enriched with local state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRecord {
    /// Target slug, set for extension catalogs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub locale: String,
    pub english_name: String,
    pub native_name: String,
    pub status: Status,
    pub update: UpdateState,
    pub updated: String,
}

/// Inject the base locale (exactly once) and sort naturally by locale
pub fn normalize_catalog(mut records: Vec<TranslationRecord>) -> Vec<TranslationRecord> {
    records.retain(|r| r.locale != BASE_LOCALE);
    records.push(TranslationRecord::base());

    records.sort_by(|a, b| natural_cmp(&a.locale, &b.locale));
    records.dedup_by(|a, b| a.locale == b.locale);
    records
}

/// Case-insensitive natural ordering (digit runs compare numerically)
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let ord = ln
                    .trim_start_matches('0')
                    .len()
                    .cmp(&rn.trim_start_matches('0').len())
                    .then_with(|| ln.trim_start_matches('0').cmp(rn.trim_start_matches('0')));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

/// Parse the timestamp formats used by catalogs and PO headers
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    for format in ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M%z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    None
}
