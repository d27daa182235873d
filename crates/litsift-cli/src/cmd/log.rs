//! `litsift log` - provenance log for a project

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use litsift_store::ProjectStore;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Project identifier
    #[arg(short, long)]
    pub project: String,
}

pub fn run(args: LogArgs, config: &Config) -> Result<()> {
    let store = ProjectStore::new(&config.projects.dir)?;
    let runs = store.search_log(&args.project)?;

    if runs.is_empty() {
        eprintln!("No imports registered for '{}'.", args.project);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Batch").fg(Color::Cyan),
            Cell::new("Stage").fg(Color::Cyan),
            Cell::new("Database").fg(Color::Cyan),
            Cell::new("Coverage").fg(Color::Cyan),
            Cell::new("Date").fg(Color::Cyan),
            Cell::new("Raw").fg(Color::Cyan),
            Cell::new("Added").fg(Color::Cyan),
        ]);

    let dash = || "-".to_string();
    for run in &runs {
        let coverage = match (run.search_start_year, run.search_end_year) {
            (Some(start), Some(end)) => format!("{start}-{end}"),
            _ => dash(),
        };
        table.add_row(vec![
            run.search_id.map(|id| id.to_string()).unwrap_or_else(dash),
            run.import_stage.to_string(),
            run.database.clone().unwrap_or_else(dash),
            coverage,
            run.run_date.to_string(),
            run.records_raw.to_string(),
            run.records_deduplicated
                .map(|n| n.to_string())
                .unwrap_or_else(dash),
        ]);
    }
    println!("{table}");

    Ok(())
}
