//! litsift - Track literature-search imports across screening stages
//!
//! Merges repeated database search exports into one deduplicated
//! dataset per project and validates screening snapshots against the
//! previous pipeline stage.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "litsift")]
#[command(about = "Track literature-search imports across screening stages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./litsift.toml or ~/.config/litsift/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Projects directory (overrides config)
    #[arg(long, global = true)]
    projects_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Import a CSV export into a project stage
    Import(cmd::import::ImportArgs),
    /// Show stage record counts for a project
    Status(cmd::status::StatusArgs),
    /// Show the provenance log for a project
    Log(cmd::log::LogArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    litsift_core::init_logging(cli.quiet, cli.debug);

    let mut config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };
    if let Some(dir) = cli.projects_dir {
        config.projects.dir = dir;
    }

    match cli.command {
        Command::Import(args) => cmd::import::run(args, &config),
        Command::Status(args) => cmd::status::run(args, &config),
        Command::Log(args) => cmd::log::run(args, &config),
        Command::Config => {
            println!("projects dir: {}", config.projects.dir.display());
            Ok(())
        }
    }
}
