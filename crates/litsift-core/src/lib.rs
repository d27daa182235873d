//! Litsift Core - Common infrastructure for literature-search imports
//!
//! This crate provides the pieces shared by every import path: the
//! canonical record model, column alias resolution for arbitrary
//! export headers, and row normalization.

pub mod columns;
pub mod logging;
pub mod normalize;
pub mod record;

// Re-exports for convenience
pub use columns::{ColumnMapping, ResolvedColumns, normalize_header, resolve_columns};
pub use logging::init_logging;
pub use normalize::{RawRow, normalize_rows};
pub use record::{ABSTRACT_SOURCE_CSV, CanonicalRecord, normalize_title};
