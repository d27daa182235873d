//! Column alias resolution for arbitrary export headers
//!
//! Reference managers and databases disagree on header spellings
//! ("Article Title", "publication_title", "TI", ...). Each canonical
//! field keeps a fixed set of known normalized spellings; resolution
//! is a suggestion only and the caller's explicit mapping always wins.

/// Known spellings per canonical field, compared after [`normalize_header`].
const TITLE_ALIASES: &[&str] = &[
    "title",
    "articletitle",
    "documenttitle",
    "publicationtitle",
    "itemtitle",
    "ti",
];

const ABSTRACT_ALIASES: &[&str] = &[
    "abstract",
    "abstracttext",
    "abstractnote",
    "summary",
    "description",
    "ab",
];

const JOURNAL_ALIASES: &[&str] = &[
    "journal",
    "journal/book",
    "source",
    "sourcetitle",
    "publicationname",
    "containertitle",
    "so",
];

const YEAR_ALIASES: &[&str] = &["year", "publicationyear", "py", "date", "issued"];

/// Normalize a raw header for alias comparison: lowercase, strip
/// spaces and underscores.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect()
}

/// Resolver output: the raw header chosen for each canonical field,
/// or None where no alias matched. Never an error - an unresolved
/// title simply means the caller must pick a column explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub title: Option<String>,
    pub abstract_col: Option<String>,
    pub journal: Option<String>,
    pub year: Option<String>,
}

/// Guess canonical columns from raw headers.
///
/// A field resolves to the first raw header (in input order) whose
/// normalized form is in that field's alias set.
pub fn resolve_columns(headers: &[String]) -> ResolvedColumns {
    let find = |aliases: &[&str]| {
        headers
            .iter()
            .find(|h| aliases.contains(&normalize_header(h).as_str()))
            .cloned()
    };

    ResolvedColumns {
        title: find(TITLE_ALIASES),
        abstract_col: find(ABSTRACT_ALIASES),
        journal: find(JOURNAL_ALIASES),
        year: find(YEAR_ALIASES),
    }
}

/// Final column mapping for one import. Ephemeral, never persisted.
///
/// The title column is required by construction; everything else is
/// optional. `custom` lists extra source columns carried through
/// verbatim into the normalized records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub title: String,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub year: Option<String>,
    pub abstract_col: Option<String>,
    pub custom: Vec<String>,
}

impl ColumnMapping {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: None,
            journal: None,
            year: None,
            abstract_col: None,
            custom: Vec::new(),
        }
    }
}

impl ResolvedColumns {
    /// Promote resolver suggestions to a final mapping.
    ///
    /// Returns None when no title column was resolved - the caller
    /// must then supply one explicitly before normalization.
    pub fn into_mapping(self) -> Option<ColumnMapping> {
        let title = self.title?;
        Some(ColumnMapping {
            title,
            authors: None,
            journal: self.journal,
            year: self.year,
            abstract_col: self.abstract_col,
            custom: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(hs: &[&str]) -> Vec<String> {
        hs.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn normalize_header_strips_spaces_and_underscores() {
        assert_eq!(normalize_header("Article Title"), "articletitle");
        assert_eq!(normalize_header("publication_year"), "publicationyear");
        assert_eq!(normalize_header("TI"), "ti");
    }

    #[test]
    fn resolves_common_export_headers() {
        let resolved = resolve_columns(&headers(&[
            "Article Title",
            "Abstract Note",
            "Source Title",
            "Publication Year",
        ]));
        assert_eq!(resolved.title.as_deref(), Some("Article Title"));
        assert_eq!(resolved.abstract_col.as_deref(), Some("Abstract Note"));
        assert_eq!(resolved.journal.as_deref(), Some("Source Title"));
        assert_eq!(resolved.year.as_deref(), Some("Publication Year"));
    }

    #[test]
    fn first_matching_header_wins() {
        let resolved = resolve_columns(&headers(&["TI", "Title"]));
        assert_eq!(resolved.title.as_deref(), Some("TI"));
    }

    #[test]
    fn unresolved_fields_are_none_not_errors() {
        let resolved = resolve_columns(&headers(&["DOI", "ISSN"]));
        assert_eq!(resolved, ResolvedColumns::default());
    }

    #[test]
    fn into_mapping_requires_title() {
        let resolved = resolve_columns(&headers(&["Abstract", "Year"]));
        assert!(resolved.into_mapping().is_none());

        let resolved = resolve_columns(&headers(&["Title", "Year"]));
        let mapping = resolved.into_mapping().unwrap();
        assert_eq!(mapping.title, "Title");
        assert_eq!(mapping.year.as_deref(), Some("Year"));
        assert!(mapping.authors.is_none());
    }

    #[test]
    fn journal_slash_book_alias() {
        let resolved = resolve_columns(&headers(&["Journal/Book"]));
        assert_eq!(resolved.journal.as_deref(), Some("Journal/Book"));
    }
}
