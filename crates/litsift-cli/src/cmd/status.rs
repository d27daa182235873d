//! `litsift status` - stage record counts for a project

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use litsift_store::ProjectStore;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Project identifier
    #[arg(short, long)]
    pub project: String,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let store = ProjectStore::new(&config.projects.dir)?;
    let summary = store.summary(&args.project)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Stage").fg(Color::Cyan),
            Cell::new("Records").fg(Color::Cyan),
        ]);
    for (stage, rows) in &summary.stage_rows {
        let count = match rows {
            Some(n) => n.to_string(),
            None => "not imported".to_string(),
        };
        table.add_row(vec![stage.description().to_string(), count]);
    }
    println!("{table}");

    if !summary.raw_by_database.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Database").fg(Color::Cyan),
                Cell::new("Raw records uploaded").fg(Color::Cyan),
            ]);
        for (database, raw) in &summary.raw_by_database {
            table.add_row(vec![database.clone(), raw.to_string()]);
        }
        println!("{table}");
    }

    Ok(())
}
