//! Dedup merge: fold a batch of candidate records into the cumulative
//! dataset, matched by normalized title

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use litsift_core::{CanonicalRecord, normalize_title};

use crate::dataset::{StoredRecord, load_dataset, save_dataset};

/// What one merge did to the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Records actually appended (after empty/duplicate drops).
    pub added: usize,
    /// Batch identifier stamped on every appended record.
    pub search_id: u32,
}

/// Merge candidates into the dataset at `path`.
///
/// The batch identifier is max(existing) + 1, or 1 for an empty
/// dataset, and is scoped to this one dataset. Candidates with empty
/// trimmed titles are dropped, as are titles already present before
/// the batch started. The identity set is a snapshot of pre-batch
/// state: duplicate titles inside one batch are not deduplicated
/// against each other, matching the established dataset semantics.
///
/// The full dataset is rewritten in a single atomic replacement; a
/// persistence failure propagates to the caller.
pub fn merge_records(
    path: &Path,
    candidates: &[CanonicalRecord],
    search_start_year: Option<i32>,
    search_end_year: Option<i32>,
    run_date: NaiveDate,
) -> Result<MergeOutcome> {
    let mut records = load_dataset(path)?;

    let search_id = records.iter().map(|r| r.search_id).max().unwrap_or(0) + 1;
    let existing_titles: HashSet<String> =
        records.iter().map(|r| normalize_title(&r.title)).collect();

    let mut added = 0;
    for candidate in candidates {
        let title = candidate.title.trim();
        if title.is_empty() {
            log::debug!("skipping record with empty title");
            continue;
        }
        if existing_titles.contains(&normalize_title(title)) {
            log::debug!("skipping duplicate title: {title}");
            continue;
        }

        records.push(StoredRecord {
            database: candidate.database.clone(),
            title: title.to_string(),
            journal: candidate.journal.clone(),
            year: candidate.year.clone(),
            abstract_text: candidate.abstract_text.clone(),
            abstract_source: Some(candidate.abstract_source.clone()),
            search_id,
            search_start_year,
            search_end_year,
            run_date,
        });
        added += 1;
    }

    save_dataset(path, &records)?;
    log::info!(
        "{}: batch {search_id} added {added} of {} records",
        path.display(),
        candidates.len()
    );
    Ok(MergeOutcome { added, search_id })
}
