//! Command-line interface for songplay-etl.
//!
//! This module provides the CLI commands for running the load pipeline,
//! loading one corpus at a time, and inspecting the target store.

mod commands;

pub use commands::{Cli, Commands, run_command};
