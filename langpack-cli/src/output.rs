//! Result rendering for the language commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use langpack_core::catalog::{ReconciledRecord, UpdateRecord};
use langpack_core::lifecycle::{OperationResult, RunStatus, UpdateResult};

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
    Count,
}

impl OutputFormat {
    fn is_machine(self) -> bool {
        self != OutputFormat::Table
    }
}

/// Table row for catalog listings
#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Language")]
    locale: String,
    #[tabled(rename = "English Name")]
    english_name: String,
    #[tabled(rename = "Native Name")]
    native_name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Update")]
    update: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Table row for extension catalog listings
#[derive(Tabled)]
struct TargetRecordRow {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(inline)]
    record: RecordRow,
}

impl From<&ReconciledRecord> for RecordRow {
    fn from(record: &ReconciledRecord) -> Self {
        Self {
            locale: record.locale.clone(),
            english_name: record.english_name.clone(),
            native_name: record.native_name.clone(),
            status: record.status.to_string(),
            update: record.update.to_string(),
            updated: record.updated.clone(),
        }
    }
}

/// Table row for install / uninstall results
#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Locale")]
    locale: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Table row for pending updates
#[derive(Tabled)]
struct UpdateRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Locale")]
    locale: String,
}

impl From<&UpdateRecord> for UpdateRow {
    fn from(update: &UpdateRecord) -> Self {
        Self {
            name: update.name.clone(),
            version: update.version.clone().unwrap_or_default(),
            locale: update.locale.clone(),
        }
    }
}

/// Table row for applied updates
#[derive(Tabled)]
struct UpdateResultRow {
    #[tabled(inline)]
    update: UpdateRow,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Render `items` in `format`; `rows` builds the table view
fn render<T, R>(items: &[T], format: OutputFormat, rows: impl FnOnce(&[T]) -> Vec<R>) -> Result<String>
where
    T: Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => Table::new(rows(items))
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(items).context("Failed to serialize JSON output")?
        }
        OutputFormat::Yaml => {
            serde_yaml_ng::to_string(items).context("Failed to serialize YAML output")?
        }
        OutputFormat::Count => items.len().to_string(),
    })
}

pub fn render_records(records: &[ReconciledRecord], format: OutputFormat) -> Result<String> {
    let with_target = records.iter().any(|r| r.target.is_some());

    if with_target {
        render(records, format, |records| {
            records
                .iter()
                .map(|r| TargetRecordRow {
                    target: r.target.clone().unwrap_or_default(),
                    record: RecordRow::from(r),
                })
                .collect()
        })
    } else {
        render(records, format, |records| {
            records.iter().map(RecordRow::from).collect()
        })
    }
}

pub fn render_results(results: &[OperationResult], format: OutputFormat) -> Result<String> {
    render(results, format, |results| {
        results
            .iter()
            .map(|r| ResultRow {
                name: r.name.clone(),
                locale: r.locale.clone(),
                status: r.status.to_string(),
            })
            .collect()
    })
}

pub fn render_updates(updates: &[UpdateRecord], format: OutputFormat) -> Result<String> {
    render(updates, format, |updates| {
        updates.iter().map(UpdateRow::from).collect()
    })
}

pub fn render_update_results(results: &[UpdateResult], format: OutputFormat) -> Result<String> {
    render(results, format, |results| {
        results
            .iter()
            .map(|r| UpdateResultRow {
                update: UpdateRow::from(&r.update),
                updated: if r.updated { "yes" } else { "no" }.to_string(),
            })
            .collect()
    })
}

/// Print a status line in the style `Success: ...` / `Warning: ...`
///
/// Success lines go to stdout for table output only, so machine formats
/// stay parseable.
pub fn report(status: RunStatus, message: &str, format: OutputFormat) {
    match status {
        RunStatus::Success if format.is_machine() => eprintln!("Success: {message}"),
        RunStatus::Success => println!("Success: {message}"),
        RunStatus::Warning => eprintln!("Warning: {message}"),
        RunStatus::Error => eprintln!("Error: {message}"),
    }
}
