//! litsift-store: Per-project stage datasets for screening pipelines
//!
//! Persists one flat CSV dataset per pipeline stage under a project
//! directory, plus a JSON provenance log of every import. The dedup
//! stage is cumulative (repeated search exports merge into it, matched
//! by normalized title); the screening stages are wholesale snapshot
//! replacements, validated against the previous stage before any write.
//!
//! Directory layout:
//! ```text
//! {root}/
//! └── {project}/
//!     ├── dedup.csv
//!     ├── after-title-abstract.csv
//!     ├── after-full-text.csv
//!     └── search-log.json
//! ```

pub mod dataset;
pub mod error;
pub mod merge;
pub mod project;
pub mod searchlog;
pub mod stage;

pub use dataset::{
    DEDUP_COLUMNS, StoredRecord, load_dataset, row_count, save_dataset, save_snapshot,
};
pub use error::ImportError;
pub use merge::{MergeOutcome, merge_records};
pub use project::{ImportOutcome, ProjectStore, ProjectSummary, SearchMeta};
pub use searchlog::SearchRun;
pub use stage::Stage;
