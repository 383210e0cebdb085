//! Per-item outcomes and batch accounting

use serde::{Serialize, Serializer};
use std::fmt;

use crate::catalog::UpdateRecord;

/// What happened to one (target, locale) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    AlreadyInstalled,
    NotAvailable,
    Uninstalled,
    PartiallyUninstalled,
    FailedToUninstall,
    AlreadyUninstalled,
    NotInstalled,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Installed => "installed",
            Outcome::AlreadyInstalled => "already installed",
            Outcome::NotAvailable => "not available",
            Outcome::Uninstalled => "uninstalled",
            Outcome::PartiallyUninstalled => "partially uninstalled",
            Outcome::FailedToUninstall => "failed to uninstall",
            Outcome::AlreadyUninstalled => "already uninstalled",
            Outcome::NotInstalled => "not installed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How an outcome counts in the tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Error,
    Skip,
}

/// One row per processed (target, locale) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub name: String,
    pub locale: String,
    pub status: Outcome,
    #[serde(skip)]
    pub kind: OutcomeKind,
}

/// Overall result of a command, mapped to the exit code by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Warning,
    Error,
}

/// Success / error / skip counters for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTally {
    pub successes: usize,
    pub errors: usize,
    pub skips: usize,
    pub total: usize,
}

impl BatchTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.successes += 1,
            OutcomeKind::Error => self.errors += 1,
            OutcomeKind::Skip => self.skips += 1,
        }
    }

    /// Every requested pair has been accounted for
    pub fn is_complete(&self) -> bool {
        self.successes + self.errors + self.skips == self.total
    }

    pub fn status(&self) -> RunStatus {
        match (self.errors, self.successes) {
            (0, _) => RunStatus::Success,
            (_, 0) => RunStatus::Error,
            _ => RunStatus::Warning,
        }
    }

    /// One-line report, e.g. `Installed 2 of 3 languages (1 skipped).`
    pub fn summary(&self, verb: &str) -> String {
        let noun = if self.total == 1 { "language" } else { "languages" };

        if self.total == 0 {
            return "No languages to process.".to_string();
        }

        if self.errors > 0 {
            let mut detail = format!("{} failed", self.errors);
            if self.skips > 0 {
                detail.push_str(&format!(", {} skipped", self.skips));
            }
            return if self.successes > 0 {
                format!(
                    "Only {} of {} {noun} {verb} ({detail}).",
                    self.successes, self.total
                )
            } else {
                format!("No {noun} {verb} ({detail}).")
            };
        }

        let skipped = if self.skips > 0 {
            format!(" ({} skipped)", self.skips)
        } else {
            String::new()
        };
        format!(
            "{} {} of {} {noun}{skipped}.",
            capitalize(verb),
            self.successes,
            self.total
        )
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result of activating a locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Activated { locale: String },
    AlreadyActive { locale: String },
}

impl Activation {
    pub fn status(&self) -> RunStatus {
        match self {
            Activation::Activated { .. } => RunStatus::Success,
            Activation::AlreadyActive { .. } => RunStatus::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Activation::Activated { locale } => format!("Language activated: {locale}."),
            Activation::AlreadyActive { locale } => format!("Language '{locale}' is already active."),
        }
    }
}

/// Results and tally of an install or uninstall batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<OperationResult>,
    pub tally: BatchTally,
    pub activation: Option<Activation>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            results: Vec::new(),
            tally: BatchTally::new(total),
            activation: None,
        }
    }

    pub fn push(&mut self, name: &str, locale: &str, status: Outcome, kind: OutcomeKind) {
        self.tally.record(kind);
        self.results.push(OperationResult {
            name: name.to_string(),
            locale: locale.to_string(),
            status,
            kind,
        });
    }
}

/// Result of an uninstall command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallRun {
    Completed(BatchReport),
    /// Stopped on the active locale; nothing from this run is reported
    Aborted { locale: String, target: String },
}

impl UninstallRun {
    pub fn status(&self) -> RunStatus {
        match self {
            UninstallRun::Completed(report) => report.tally.status(),
            UninstallRun::Aborted { .. } => RunStatus::Warning,
        }
    }
}

/// One attempted update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    #[serde(flatten)]
    pub update: UpdateRecord,
    pub updated: bool,
}

/// Result of an update command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRun {
    UpToDate,
    DryRun(Vec<UpdateRecord>),
    Applied(Vec<UpdateResult>),
}

impl UpdateRun {
    pub fn status(&self) -> RunStatus {
        match self {
            UpdateRun::UpToDate | UpdateRun::DryRun(_) => RunStatus::Success,
            UpdateRun::Applied(results) => {
                let successes = results.iter().filter(|r| r.updated).count();
                if successes == results.len() {
                    RunStatus::Success
                } else if successes > 0 {
                    RunStatus::Warning
                } else {
                    RunStatus::Error
                }
            }
        }
    }

    pub fn summary(&self) -> String {
        match self {
            UpdateRun::UpToDate => "Translations are up to date.".to_string(),
            UpdateRun::DryRun(updates) => {
                format!("Found {} translation update(s) available.", updates.len())
            }
            UpdateRun::Applied(results) => {
                let successes = results.iter().filter(|r| r.updated).count();
                if successes == 0 {
                    "No translations updated.".to_string()
                } else {
                    format!("Updated {}/{} translations.", successes, results.len())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(successes: usize, errors: usize, skips: usize) -> BatchTally {
        BatchTally {
            successes,
            errors,
            skips,
            total: successes + errors + skips,
        }
    }

    #[test]
    fn test_outcome_strings() {
        assert_eq!(Outcome::AlreadyInstalled.to_string(), "already installed");
        assert_eq!(
            serde_json::to_string(&Outcome::PartiallyUninstalled).unwrap(),
            "\"partially uninstalled\""
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(tally(2, 0, 1).status(), RunStatus::Success);
        assert_eq!(tally(0, 0, 3).status(), RunStatus::Success);
        assert_eq!(tally(1, 1, 0).status(), RunStatus::Warning);
        assert_eq!(tally(0, 2, 1).status(), RunStatus::Error);
        assert_eq!(BatchTally::new(0).status(), RunStatus::Success);
    }

    #[test]
    fn test_summaries() {
        assert_eq!(
            tally(2, 0, 1).summary("installed"),
            "Installed 2 of 3 languages (1 skipped)."
        );
        assert_eq!(
            tally(1, 1, 1).summary("uninstalled"),
            "Only 1 of 3 languages uninstalled (1 failed, 1 skipped)."
        );
        assert_eq!(
            tally(0, 1, 0).summary("uninstalled"),
            "No language uninstalled (1 failed)."
        );
        assert_eq!(BatchTally::new(0).summary("installed"), "No languages to process.");
    }

    #[test]
    fn test_update_run_status() {
        let record = UpdateRecord {
            category: crate::store::Category::Core,
            slug: "default".to_string(),
            locale: "nl_NL".to_string(),
            name: "core".to_string(),
            version: None,
        };
        let result = |updated| UpdateResult {
            update: record.clone(),
            updated,
        };

        assert_eq!(UpdateRun::UpToDate.status(), RunStatus::Success);
        assert_eq!(
            UpdateRun::Applied(vec![result(true), result(true)]).status(),
            RunStatus::Success
        );
        assert_eq!(
            UpdateRun::Applied(vec![result(true), result(false)]).status(),
            RunStatus::Warning
        );
        assert_eq!(
            UpdateRun::Applied(vec![result(false)]).status(),
            RunStatus::Error
        );
    }
}
