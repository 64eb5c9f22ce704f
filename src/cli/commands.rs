//! CLI commands and argument parsing

use crate::types::{CompressionCodec, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cricsheet match JSON to analytic tables
#[derive(Parser, Debug)]
#[command(name = "cricsheet-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten a directory of match documents and write the four tables
    Run {
        /// Directory of Cricsheet JSON files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output destination (local path or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path and
        /// az://container/path
        #[arg(short, long)]
        output: Option<String>,

        /// Table file format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Number of flattening workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// Maximum rows per part file
        #[arg(long)]
        chunk_rows: Option<usize>,

        /// Parquet compression codec
        #[arg(long)]
        compression: Option<CompressionCodec>,

        /// Succeed on an empty input directory
        #[arg(long)]
        allow_empty: bool,
    },

    /// Flatten a single document and print its rows
    Inspect {
        /// Match JSON file
        file: PathBuf,
    },

    /// Run validation queries over written tables
    Summary {
        /// Directory (or cloud URL) the tables were written to
        #[arg(short, long)]
        input: Option<String>,

        /// Format the tables were written in (defaults to the configured one)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Also copy the tables into this DuckDB database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Number of top batters to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}
