//! Songplay ETL - a one-shot batch loader for a listening-history star schema.
//!
//! Walks a song-metadata corpus and an activity-log corpus of
//! newline-delimited JSON files and loads them into five relational tables
//! (songs, artists, users, time, songplays), then exits. Re-runs are safe:
//! every keyed insert is insert-if-absent.

pub mod cli;
pub mod coerce;
pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod model;
pub mod records;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("songplay_etl=info".parse()?))
        .init();

    cli::run_command(&args)
}
