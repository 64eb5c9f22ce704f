//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Flatten a directory of match documents and write the tables
//! - `inspect` - Flatten one document and print its rows
//! - `summary` - Validation queries over written tables

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{inspect, run_pipeline, RunReport, Runner};
