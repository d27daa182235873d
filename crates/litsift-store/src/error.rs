//! Import rejection kinds

use crate::stage::Stage;

/// A rejected import. Rejections happen before any dataset or
/// provenance write, so the store is untouched when one surfaces.
///
/// Per-record skips (empty title, duplicate title) are not errors;
/// the merge drops those rows silently.
#[derive(Debug, PartialEq, Eq)]
pub enum ImportError {
    /// No column was resolved or selected for the title field.
    MissingTitleMapping,
    /// An import targeted a stage whose predecessor has no dataset yet.
    StageOrderViolation { required: Stage },
    /// A screening upload carried more rows than the previous stage.
    RecordCountExceeded { uploaded: usize, previous: usize },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitleMapping => {
                write!(f, "a title column is required but none was mapped")
            }
            Self::StageOrderViolation { required } => {
                write!(f, "previous stage '{required}' must be registered first")
            }
            Self::RecordCountExceeded { uploaded, previous } => {
                write!(
                    f,
                    "{uploaded} records exceed the previous stage ({previous})"
                )
            }
        }
    }
}

impl std::error::Error for ImportError {}
