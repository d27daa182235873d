//! `litsift import` - import a CSV export into a project stage

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};

use litsift_core::{ColumnMapping, RawRow, normalize_rows, resolve_columns};
use litsift_store::{ImportError, ProjectStore, SearchMeta, Stage};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    /// Search results to merge & deduplicate
    Dedup,
    /// Studies included after title/abstract screening
    TitleAbstract,
    /// Studies included after full-text screening
    FullText,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Dedup => Stage::Dedup,
            StageArg::TitleAbstract => Stage::TitleAbstract,
            StageArg::FullText => Stage::FullText,
        }
    }
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Project identifier
    #[arg(short, long)]
    pub project: String,

    /// Pipeline stage this CSV belongs to
    #[arg(short, long, value_enum)]
    pub stage: StageArg,

    /// CSV file exported from the database
    pub file: PathBuf,

    /// Database searched (required for the dedup stage)
    #[arg(long)]
    pub database: Option<String>,

    /// Verbatim search query (required for the dedup stage)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Search coverage start year (required for the dedup stage)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Search coverage end year (required for the dedup stage)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Column holding the title (overrides alias resolution)
    #[arg(long)]
    pub title_column: Option<String>,

    /// Column holding the authors
    #[arg(long)]
    pub authors_column: Option<String>,

    /// Column holding the journal/source
    #[arg(long)]
    pub journal_column: Option<String>,

    /// Column holding the publication year
    #[arg(long)]
    pub year_column: Option<String>,

    /// Column holding the abstract
    #[arg(long)]
    pub abstract_column: Option<String>,

    /// Additional columns to carry through, comma-separated
    #[arg(long)]
    pub custom_columns: Option<String>,
}

pub fn run(args: ImportArgs, config: &Config) -> Result<()> {
    let (headers, rows) = read_csv(&args.file)?;
    log::info!(
        "{}: {} rows, {} columns",
        args.file.display(),
        rows.len(),
        headers.len()
    );

    let mapping = build_mapping(&args, &headers)?;
    let stage = Stage::from(args.stage);

    let store = ProjectStore::new(&config.projects.dir)?;
    let outcome = match stage {
        Stage::Dedup => {
            let meta = search_meta(&args)?;
            let records = normalize_rows(&rows, &mapping, Some(&meta.database));
            store.import_search(&args.project, &records, &meta)?
        }
        _ => {
            let records = normalize_rows(&rows, &mapping, None);
            store.import_screening(&args.project, stage, &records)?
        }
    };

    match outcome.search_id {
        Some(id) => println!(
            "Imported {} of {} records into '{}' (batch {id})",
            outcome.records_added, outcome.records_raw, outcome.stage
        ),
        None => println!(
            "Registered {} records for '{}'",
            outcome.records_added, outcome.stage
        ),
    }
    Ok(())
}

/// Read a CSV into header names and header -> value row maps.
fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<RawRow>)> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read headers of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.with_context(|| format!("failed to read row in {}", path.display()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok((headers, rows))
}

/// Resolver suggestions, overridden by any explicit column flags.
fn build_mapping(args: &ImportArgs, headers: &[String]) -> Result<ColumnMapping> {
    let check = |col: &Option<String>| -> Result<Option<String>> {
        if let Some(name) = col {
            if !headers.iter().any(|h| h == name) {
                bail!("column '{name}' not found in the uploaded CSV");
            }
        }
        Ok(col.clone())
    };

    let resolved = resolve_columns(headers);

    let title = match check(&args.title_column)?.or(resolved.title) {
        Some(title) => title,
        None => return Err(ImportError::MissingTitleMapping.into()),
    };

    let mut mapping = ColumnMapping::new(title);
    mapping.authors = check(&args.authors_column)?;
    mapping.journal = check(&args.journal_column)?.or(resolved.journal);
    mapping.year = check(&args.year_column)?.or(resolved.year);
    mapping.abstract_col = check(&args.abstract_column)?.or(resolved.abstract_col);
    if let Some(raw) = &args.custom_columns {
        mapping.custom = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    Ok(mapping)
}

/// The dedup stage records search provenance; all four fields are
/// required before any merge happens.
fn search_meta(args: &ImportArgs) -> Result<SearchMeta> {
    let Some(database) = args.database.clone().filter(|s| !s.trim().is_empty()) else {
        bail!("--database is required for the dedup stage");
    };
    let Some(search_strategy) = args.strategy.clone().filter(|s| !s.trim().is_empty()) else {
        bail!("--strategy is required for the dedup stage");
    };
    let (Some(search_start_year), Some(search_end_year)) = (args.start_year, args.end_year) else {
        bail!("--start-year and --end-year are required for the dedup stage");
    };
    Ok(SearchMeta {
        database,
        search_strategy,
        search_start_year,
        search_end_year,
    })
}
