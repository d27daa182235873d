//! Per-project store facade
//!
//! One directory per project under the store root. Stage 0 imports
//! merge through the dedup dataset; screening imports replace their
//! stage file wholesale after progression validation. Every accepted
//! import appends a provenance entry; rejected imports write nothing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use litsift_core::CanonicalRecord;

use crate::dataset::{row_count, save_snapshot};
use crate::error::ImportError;
use crate::merge::merge_records;
use crate::searchlog::{SearchRun, append_run, load_log};
use crate::stage::Stage;

const SEARCH_LOG_FILE: &str = "search-log.json";

/// Search provenance for a dedup-stage import. Required up front so a
/// merge can never land without its database label, verbatim query,
/// and coverage years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMeta {
    pub database: String,
    pub search_strategy: String,
    pub search_start_year: i32,
    pub search_end_year: i32,
}

/// What one accepted import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub stage: Stage,
    /// Row count as uploaded.
    pub records_raw: usize,
    /// Rows now in the stage file from this import. For the dedup
    /// stage this is the post-drop count; for screening it equals
    /// `records_raw`.
    pub records_added: usize,
    /// Batch identifier, dedup stage only.
    pub search_id: Option<u32>,
}

/// Current state of one project, for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    /// Current row count per stage, in pipeline order. None = stage
    /// never imported.
    pub stage_rows: Vec<(Stage, Option<usize>)>,
    /// Raw records uploaded per database across all dedup imports.
    pub raw_by_database: BTreeMap<String, usize>,
}

/// File-backed store of per-project stage datasets.
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open (or create) a store rooted at `root`.
    pub fn new(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("failed to create store root {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join(project)
    }

    pub fn stage_path(&self, project: &str, stage: Stage) -> PathBuf {
        self.project_dir(project).join(stage.file_name())
    }

    fn log_path(&self, project: &str) -> PathBuf {
        self.project_dir(project).join(SEARCH_LOG_FILE)
    }

    /// Import a search export into the dedup stage: merge, dedup by
    /// title, append a provenance entry.
    pub fn import_search(
        &self,
        project: &str,
        records: &[CanonicalRecord],
        meta: &SearchMeta,
    ) -> Result<ImportOutcome> {
        let dir = self.project_dir(project);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create project dir {}", dir.display()))?;

        let run_date = today();
        let outcome = merge_records(
            &self.stage_path(project, Stage::Dedup),
            records,
            Some(meta.search_start_year),
            Some(meta.search_end_year),
            run_date,
        )?;

        append_run(
            &self.log_path(project),
            SearchRun {
                search_id: Some(outcome.search_id),
                database: Some(meta.database.clone()),
                search_strategy: Some(meta.search_strategy.clone()),
                search_start_year: Some(meta.search_start_year),
                search_end_year: Some(meta.search_end_year),
                run_date,
                records_raw: records.len(),
                records_deduplicated: Some(outcome.added),
                import_stage: Stage::Dedup,
            },
        )?;

        Ok(ImportOutcome {
            stage: Stage::Dedup,
            records_raw: records.len(),
            records_added: outcome.added,
            search_id: Some(outcome.search_id),
        })
    }

    /// Import a screening snapshot into stage 1 or 2, replacing the
    /// stage file wholesale.
    ///
    /// Validated against the previous stage before anything is
    /// written: the previous stage must exist, and the upload may not
    /// carry more rows than it. Rejections leave the store untouched.
    pub fn import_screening(
        &self,
        project: &str,
        stage: Stage,
        records: &[CanonicalRecord],
    ) -> Result<ImportOutcome> {
        let Some(previous) = stage.previous() else {
            anyhow::bail!("stage '{stage}' takes search imports, not screening snapshots");
        };

        let previous_path = self.stage_path(project, previous);
        if !previous_path.exists() {
            return Err(ImportError::StageOrderViolation { required: previous }.into());
        }
        let previous_rows = row_count(&previous_path)?;
        if records.len() > previous_rows {
            return Err(ImportError::RecordCountExceeded {
                uploaded: records.len(),
                previous: previous_rows,
            }
            .into());
        }

        save_snapshot(&self.stage_path(project, stage), records)?;
        log::info!(
            "{project}/{stage}: snapshot replaced with {} records",
            records.len()
        );

        append_run(
            &self.log_path(project),
            SearchRun {
                search_id: None,
                database: None,
                search_strategy: None,
                search_start_year: None,
                search_end_year: None,
                run_date: today(),
                records_raw: records.len(),
                records_deduplicated: None,
                import_stage: stage,
            },
        )?;

        Ok(ImportOutcome {
            stage,
            records_raw: records.len(),
            records_added: records.len(),
            search_id: None,
        })
    }

    /// Current row count of a stage file. None = never imported.
    pub fn stage_row_count(&self, project: &str, stage: Stage) -> Result<Option<usize>> {
        let path = self.stage_path(project, stage);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(row_count(&path)?))
    }

    /// All provenance entries for a project, oldest first.
    pub fn search_log(&self, project: &str) -> Result<Vec<SearchRun>> {
        load_log(&self.log_path(project))
    }

    /// Stage row counts plus raw upload totals per searched database.
    pub fn summary(&self, project: &str) -> Result<ProjectSummary> {
        let mut stage_rows = Vec::new();
        for stage in Stage::all() {
            stage_rows.push((stage, self.stage_row_count(project, stage)?));
        }

        let mut raw_by_database = BTreeMap::new();
        for run in self.search_log(project)? {
            if run.import_stage != Stage::Dedup {
                continue;
            }
            if let Some(db) = run.database {
                *raw_by_database.entry(db).or_insert(0) += run.records_raw;
            }
        }

        Ok(ProjectSummary {
            stage_rows,
            raw_by_database,
        })
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as ExtrasMap;

    fn candidate(title: &str) -> CanonicalRecord {
        CanonicalRecord {
            database: Some("PubMed".into()),
            title: title.into(),
            authors: None,
            journal: None,
            year: None,
            abstract_text: None,
            abstract_source: "csv_import".into(),
            extras: ExtrasMap::new(),
        }
    }

    fn candidates(titles: &[&str]) -> Vec<CanonicalRecord> {
        titles.iter().map(|t| candidate(t)).collect()
    }

    fn meta() -> SearchMeta {
        SearchMeta {
            database: "PubMed".into(),
            search_strategy: "cancer AND screening".into(),
            search_start_year: 2000,
            search_end_year: 2020,
        }
    }

    #[test]
    fn search_import_merges_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        let outcome = store
            .import_search("p1", &candidates(&["A", "B", "C"]), &meta())
            .unwrap();
        assert_eq!(outcome.records_added, 3);
        assert_eq!(outcome.search_id, Some(1));

        let log = store.search_log("p1").unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].records_raw, 3);
        assert_eq!(log[0].records_deduplicated, Some(3));
        assert_eq!(log[0].search_strategy.as_deref(), Some("cancer AND screening"));
    }

    #[test]
    fn screening_before_search_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        let err = store
            .import_screening("p1", Stage::TitleAbstract, &candidates(&["A"]))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ImportError>(),
            Some(&ImportError::StageOrderViolation {
                required: Stage::Dedup
            })
        );

        // Nothing written: no stage file, no provenance entry
        assert!(!store.stage_path("p1", Stage::TitleAbstract).exists());
        assert!(store.search_log("p1").unwrap().is_empty());
    }

    #[test]
    fn oversized_screening_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        store
            .import_search("p1", &candidates(&["A", "B"]), &meta())
            .unwrap();
        let err = store
            .import_screening("p1", Stage::TitleAbstract, &candidates(&["A", "B", "C"]))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ImportError>(),
            Some(&ImportError::RecordCountExceeded {
                uploaded: 3,
                previous: 2
            })
        );

        assert!(!store.stage_path("p1", Stage::TitleAbstract).exists());
        assert_eq!(store.search_log("p1").unwrap().len(), 1);
    }

    #[test]
    fn screening_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        store
            .import_search("p1", &candidates(&["A", "B", "C"]), &meta())
            .unwrap();
        store
            .import_screening("p1", Stage::TitleAbstract, &candidates(&["A", "B"]))
            .unwrap();
        // Replacement, not merge: a smaller re-upload wins outright
        store
            .import_screening("p1", Stage::TitleAbstract, &candidates(&["A"]))
            .unwrap();

        assert_eq!(
            store.stage_row_count("p1", Stage::TitleAbstract).unwrap(),
            Some(1)
        );
    }

    #[test]
    fn full_text_requires_title_abstract() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        store.import_search("p1", &candidates(&["A"]), &meta()).unwrap();
        let err = store
            .import_screening("p1", Stage::FullText, &candidates(&["A"]))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ImportError>(),
            Some(&ImportError::StageOrderViolation {
                required: Stage::TitleAbstract
            })
        );
    }

    #[test]
    fn screening_import_to_dedup_stage_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();
        let err = store
            .import_screening("p1", Stage::Dedup, &candidates(&["A"]))
            .unwrap_err();
        assert!(err.downcast_ref::<ImportError>().is_none());
    }

    #[test]
    fn stage_row_count_distinguishes_missing_from_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();
        assert_eq!(store.stage_row_count("p1", Stage::Dedup).unwrap(), None);

        store.import_search("p1", &candidates(&[]), &meta()).unwrap();
        assert_eq!(store.stage_row_count("p1", Stage::Dedup).unwrap(), Some(0));
    }

    #[test]
    fn projects_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        store.import_search("p1", &candidates(&["A"]), &meta()).unwrap();
        let outcome = store.import_search("p2", &candidates(&["A"]), &meta()).unwrap();

        // Same title, different project: both kept, ids independent
        assert_eq!(outcome.records_added, 1);
        assert_eq!(outcome.search_id, Some(1));
    }

    #[test]
    fn summary_aggregates_raw_counts_per_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path()).unwrap();

        store
            .import_search("p1", &candidates(&["A", "B"]), &meta())
            .unwrap();
        let mut scopus = meta();
        scopus.database = "Scopus".into();
        store
            .import_search("p1", &candidates(&["B", "C"]), &scopus)
            .unwrap();
        store
            .import_screening("p1", Stage::TitleAbstract, &candidates(&["A"]))
            .unwrap();

        let summary = store.summary("p1").unwrap();
        assert_eq!(summary.raw_by_database.get("PubMed"), Some(&2));
        assert_eq!(summary.raw_by_database.get("Scopus"), Some(&2));
        assert_eq!(summary.stage_rows[0], (Stage::Dedup, Some(3)));
        assert_eq!(summary.stage_rows[1], (Stage::TitleAbstract, Some(1)));
        assert_eq!(summary.stage_rows[2], (Stage::FullText, None));
    }
}
