//! Pipeline stage enumeration and ordering

use std::fmt;

use serde::{Deserialize, Serialize};

/// Screening pipeline stage, in pipeline order.
///
/// The ordering is load-bearing: an import into a stage is only valid
/// once its predecessor has a dataset, and may never carry more rows
/// than the predecessor holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Raw search results, merged and deduplicated across imports.
    #[serde(rename = "dedup")]
    Dedup,
    /// Studies included after title/abstract screening.
    #[serde(rename = "after-title-abstract")]
    TitleAbstract,
    /// Studies included after full-text screening.
    #[serde(rename = "after-full-text")]
    FullText,
}

impl Stage {
    /// All stages in pipeline order.
    pub fn all() -> [Stage; 3] {
        [Self::Dedup, Self::TitleAbstract, Self::FullText]
    }

    /// Zero-based pipeline position.
    pub fn index(self) -> usize {
        match self {
            Self::Dedup => 0,
            Self::TitleAbstract => 1,
            Self::FullText => 2,
        }
    }

    /// The stage that must be registered before this one.
    pub fn previous(self) -> Option<Stage> {
        match self {
            Self::Dedup => None,
            Self::TitleAbstract => Some(Self::Dedup),
            Self::FullText => Some(Self::TitleAbstract),
        }
    }

    /// Dataset file name inside a project directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Dedup => "dedup.csv",
            Self::TitleAbstract => "after-title-abstract.csv",
            Self::FullText => "after-full-text.csv",
        }
    }

    /// Short name used in logs and tables (matches the serde name).
    pub fn name(self) -> &'static str {
        match self {
            Self::Dedup => "dedup",
            Self::TitleAbstract => "after-title-abstract",
            Self::FullText => "after-full-text",
        }
    }

    /// Human-readable description for status output.
    pub fn description(self) -> &'static str {
        match self {
            Self::Dedup => "Merged search results (deduplicated)",
            Self::TitleAbstract => "Included after title/abstract screening",
            Self::FullText => "Included after full-text screening",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
