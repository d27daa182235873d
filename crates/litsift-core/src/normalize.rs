//! Row normalization: apply a column mapping to raw tabular rows

use std::collections::BTreeMap;

use crate::columns::ColumnMapping;
use crate::record::{ABSTRACT_SOURCE_CSV, CanonicalRecord};

/// One raw row as parsed from an upload: header -> cell value.
pub type RawRow = BTreeMap<String, String>;

/// Normalize raw rows into canonical records.
///
/// Deterministic, one output record per input row. Rows with empty
/// titles are kept - the merge step filters them. Values are copied
/// as given, with no validation or coercion.
pub fn normalize_rows(
    rows: &[RawRow],
    mapping: &ColumnMapping,
    database: Option<&str>,
) -> Vec<CanonicalRecord> {
    rows.iter()
        .map(|row| {
            let get = |col: &str| row.get(col).cloned();
            let get_opt = |col: &Option<String>| col.as_deref().and_then(get);

            let mut extras = BTreeMap::new();
            for field in &mapping.custom {
                extras.insert(field.clone(), get(field));
            }

            CanonicalRecord {
                database: database.map(str::to_string),
                title: get(&mapping.title).unwrap_or_default(),
                authors: get_opt(&mapping.authors),
                journal: get_opt(&mapping.journal),
                year: get_opt(&mapping.year),
                abstract_text: get_opt(&mapping.abstract_col),
                abstract_source: ABSTRACT_SOURCE_CSV.to_string(),
                extras,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapping() -> ColumnMapping {
        let mut m = ColumnMapping::new("Title");
        m.journal = Some("Source".into());
        m.year = Some("PY".into());
        m.abstract_col = Some("Abstract".into());
        m
    }

    #[test]
    fn one_record_per_row() {
        let rows = vec![
            row(&[("Title", "A"), ("Source", "Nature"), ("PY", "2019")]),
            row(&[("Title", "B")]),
        ];
        let records = normalize_rows(&rows, &mapping(), Some("PubMed"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].journal.as_deref(), Some("Nature"));
        assert_eq!(records[0].year.as_deref(), Some("2019"));
        assert_eq!(records[0].database.as_deref(), Some("PubMed"));
        assert_eq!(records[1].journal, None);
    }

    #[test]
    fn abstract_source_is_fixed() {
        let records = normalize_rows(&[row(&[("Title", "A")])], &mapping(), None);
        assert_eq!(records[0].abstract_source, ABSTRACT_SOURCE_CSV);
        assert_eq!(records[0].database, None);
    }

    #[test]
    fn empty_title_rows_pass_through() {
        let rows = vec![row(&[("Source", "Nature")])];
        let records = normalize_rows(&rows, &mapping(), Some("PubMed"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "");
    }

    #[test]
    fn year_passes_through_unvalidated() {
        let rows = vec![row(&[("Title", "A"), ("PY", "circa 1998")])];
        let records = normalize_rows(&rows, &mapping(), None);
        assert_eq!(records[0].year.as_deref(), Some("circa 1998"));
    }

    #[test]
    fn custom_fields_copied_or_null() {
        let mut m = mapping();
        m.custom = vec!["DOI".into(), "Notes".into()];
        let rows = vec![row(&[("Title", "A"), ("DOI", "10.1/x")])];
        let records = normalize_rows(&rows, &m, None);
        assert_eq!(
            records[0].extras.get("DOI"),
            Some(&Some("10.1/x".to_string()))
        );
        assert_eq!(records[0].extras.get("Notes"), Some(&None));
    }
}
