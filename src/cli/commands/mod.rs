//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `run`: the full pipeline and the per-corpus loaders
//! - `stats`: target-store row counts and config scaffolding

mod run;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use run::{cmd_logs, cmd_run, cmd_songs};
pub use stats::{cmd_init_config, cmd_stats};

use crate::config;
use crate::db;

/// Songplay ETL CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: song corpus, sentinels, log corpus
    Run {
        /// Root of the song-metadata corpus (overrides config)
        #[arg(long)]
        song_data: Option<PathBuf>,
        /// Root of the activity-log corpus (overrides config)
        #[arg(long)]
        log_data: Option<PathBuf>,
        /// Database file path (overrides config)
        #[arg(long, env = "SONGPLAY_ETL_DB")]
        db: Option<PathBuf>,
    },
    /// Load only the song-metadata corpus
    Songs {
        /// Corpus root (overrides config)
        path: Option<PathBuf>,
        /// Database file path (overrides config)
        #[arg(long, env = "SONGPLAY_ETL_DB")]
        db: Option<PathBuf>,
    },
    /// Load only the activity-log corpus (seeds sentinels first)
    Logs {
        /// Corpus root (overrides config)
        path: Option<PathBuf>,
        /// Database file path (overrides config)
        #[arg(long, env = "SONGPLAY_ETL_DB")]
        db: Option<PathBuf>,
    },
    /// Report row counts for the five target tables
    Stats {
        /// Database file path (overrides config)
        #[arg(long, env = "SONGPLAY_ETL_DB")]
        db: Option<PathBuf>,
    },
    /// Write a default config file to the OS config directory
    InitConfig,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = config::load();

    match &cli.command {
        Commands::Run {
            song_data,
            log_data,
            db,
        } => {
            let song_root = song_data.clone().unwrap_or_else(|| config.corpus.song_data.clone());
            let log_root = log_data.clone().unwrap_or_else(|| config.corpus.log_data.clone());
            cmd_run(&rt, &song_root, &log_root, &resolve_db_url(db, &config))
        }
        Commands::Songs { path, db } => {
            let root = path.clone().unwrap_or_else(|| config.corpus.song_data.clone());
            cmd_songs(&rt, &root, &resolve_db_url(db, &config))
        }
        Commands::Logs { path, db } => {
            let root = path.clone().unwrap_or_else(|| config.corpus.log_data.clone());
            cmd_logs(&rt, &root, &resolve_db_url(db, &config))
        }
        Commands::Stats { db } => cmd_stats(&rt, &resolve_db_url(db, &config)),
        Commands::InitConfig => cmd_init_config(),
    }
}

/// CLI flag beats config file beats the default filename.
fn resolve_db_url(flag: &Option<PathBuf>, config: &config::Config) -> String {
    let path = flag.clone().or_else(|| config.database.path.clone());
    db::db_url(path.as_deref())
}
