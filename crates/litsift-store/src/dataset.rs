//! Stage dataset persistence: CSV load/save with atomic replacement
//!
//! The dedup dataset carries the fixed canonical schema below; the
//! screening snapshots carry whatever columns their upload produced.
//! Writes always go through a `.tmp` sibling followed by a rename, so
//! readers never observe a partial file.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use litsift_core::CanonicalRecord;

/// Batch identifier column name used by old datasets. Renamed to
/// `search_id` on load; the file is rewritten under the new name on
/// the next persist.
const LEGACY_SEARCH_ID_COLUMN: &str = "search_round";

/// On-disk column order of the dedup dataset.
pub const DEDUP_COLUMNS: [&str; 10] = [
    "database",
    "title",
    "journal",
    "year",
    "abstract",
    "abstract_source",
    "search_id",
    "search_start_year",
    "search_end_year",
    "run_date",
];

/// One row of the cumulative dedup dataset.
///
/// Field order defines the on-disk column order:
/// `database, title, journal, year, abstract, abstract_source,
/// search_id, search_start_year, search_end_year, run_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub database: Option<String>,
    pub title: String,
    pub journal: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub abstract_source: Option<String>,
    pub search_id: u32,
    pub search_start_year: Option<i32>,
    pub search_end_year: Option<i32>,
    pub run_date: NaiveDate,
}

/// Load a dedup dataset. A missing or empty file yields an empty
/// dataset; anything unreadable propagates.
///
/// Legacy batch-id columns are migrated in memory during the read, so
/// callers only ever see `search_id`.
pub fn load_dataset(path: &Path) -> Result<Vec<StoredRecord>> {
    if !path.exists() || fs::metadata(path)?.len() == 0 {
        return Ok(Vec::new());
    }

    let file =
        File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let mut headers = reader
        .headers()
        .with_context(|| format!("failed to read headers of {}", path.display()))?
        .clone();

    let has_current = headers.iter().any(|h| h == "search_id");
    if !has_current && headers.iter().any(|h| h == LEGACY_SEARCH_ID_COLUMN) {
        log::info!(
            "{}: migrating legacy column '{LEGACY_SEARCH_ID_COLUMN}' to 'search_id'",
            path.display()
        );
        headers = headers
            .iter()
            .map(|h| {
                if h == LEGACY_SEARCH_ID_COLUMN {
                    "search_id"
                } else {
                    h
                }
            })
            .collect();
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record =
            result.with_context(|| format!("failed to read row in {}", path.display()))?;
        let row: StoredRecord = record
            .deserialize(Some(&headers))
            .with_context(|| format!("malformed dataset row in {}", path.display()))?;
        records.push(row);
    }
    Ok(records)
}

/// Persist a dedup dataset as a single atomic replacement.
pub fn save_dataset(path: &Path, records: &[StoredRecord]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        if records.is_empty() {
            // serialize() emits the header with the first record, so a
            // dataset with no rows needs the header written by hand
            writer.write_record(&DEDUP_COLUMNS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace dataset {}", path.display()))?;
    Ok(())
}

/// Persist a screening snapshot: the four optional canonical fields
/// plus every custom passthrough column, one row per record.
pub fn save_snapshot(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    // Union of custom columns across rows, in stable order.
    let mut extra_columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.extras.keys() {
            if !extra_columns.contains(key) {
                extra_columns.push(key.clone());
            }
        }
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;

        let mut header = vec!["title", "authors", "journal", "year", "abstract"];
        header.extend(extra_columns.iter().map(String::as_str));
        writer.write_record(&header)?;

        for record in records {
            let mut row = vec![
                record.title.clone(),
                record.authors.clone().unwrap_or_default(),
                record.journal.clone().unwrap_or_default(),
                record.year.clone().unwrap_or_default(),
                record.abstract_text.clone().unwrap_or_default(),
            ];
            for column in &extra_columns {
                row.push(
                    record
                        .extras
                        .get(column)
                        .and_then(|v| v.clone())
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&row)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace snapshot {}", path.display()))?;
    Ok(())
}

/// Count the data rows of any stage file. Missing or empty files
/// count as zero.
pub fn row_count(path: &Path) -> Result<usize> {
    if !path.exists() || fs::metadata(path)?.len() == 0 {
        return Ok(0);
    }
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));
    let mut count = 0;
    for result in reader.records() {
        result.with_context(|| format!("failed to read row in {}", path.display()))?;
        count += 1;
    }
    Ok(count)
}
