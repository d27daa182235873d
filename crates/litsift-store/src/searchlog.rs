//! Provenance log: one entry per import action, kept alongside the
//! stage datasets

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// One import action. Search-specific fields (database, strategy,
/// coverage years, dedup count) are None for screening imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRun {
    /// Batch identifier stamped on the merged records. None for
    /// screening stages, which replace rather than merge.
    pub search_id: Option<u32>,
    pub database: Option<String>,
    /// Verbatim query text, recorded only for the dedup stage.
    pub search_strategy: Option<String>,
    pub search_start_year: Option<i32>,
    pub search_end_year: Option<i32>,
    pub run_date: NaiveDate,
    /// Row count as uploaded, before any drops.
    pub records_raw: usize,
    /// Rows actually added by the merge. None for screening stages.
    pub records_deduplicated: Option<usize>,
    pub import_stage: Stage,
}

/// Load the provenance log. A missing file is an empty log.
pub fn load_log(path: &Path) -> Result<Vec<SearchRun>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let runs: Vec<SearchRun> = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(runs)
}

/// Append one run to the log, rewriting the file atomically.
pub fn append_run(path: &Path, run: SearchRun) -> Result<()> {
    let mut runs = load_log(path)?;
    runs.push(run);

    let json = serde_json::to_string_pretty(&runs).context("failed to serialize search log")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
