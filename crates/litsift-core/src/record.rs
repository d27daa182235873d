//! Canonical bibliographic record model

use std::collections::BTreeMap;

/// Provenance tag for records that arrived through a tabular import.
pub const ABSTRACT_SOURCE_CSV: &str = "csv_import";

/// A bibliographic record after column normalization, before merging.
///
/// Field values pass through exactly as exported - no type coercion is
/// applied to `year` or anything else. The title is kept verbatim here;
/// [`normalize_title`] produces the identity key used for dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Origin label (which database was searched). None for screening
    /// snapshots, which carry no search provenance.
    pub database: Option<String>,
    /// May be empty after trimming; filtering happens downstream.
    pub title: String,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub year: Option<String>,
    pub abstract_text: Option<String>,
    pub abstract_source: String,
    /// Custom passthrough columns, in a stable order.
    pub extras: BTreeMap<String, Option<String>>,
}

impl CanonicalRecord {
    /// Identity key for dedup: lowercased, whitespace-trimmed title.
    pub fn title_key(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Normalize a title into its dedup identity: lowercase + trim.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_trims_and_lowercases() {
        assert_eq!(normalize_title("  Foo Bar "), "foo bar");
        assert_eq!(normalize_title("foo bar"), "foo bar");
    }

    #[test]
    fn normalize_title_empty_after_trim() {
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn title_key_matches_normalized() {
        let rec = CanonicalRecord {
            database: Some("PubMed".into()),
            title: " Deep Learning ".into(),
            authors: None,
            journal: None,
            year: None,
            abstract_text: None,
            abstract_source: ABSTRACT_SOURCE_CSV.into(),
            extras: BTreeMap::new(),
        };
        assert_eq!(rec.title_key(), "deep learning");
    }
}
