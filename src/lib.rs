// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # cricsheet-etl
//!
//! Flattens Cricsheet cricket match JSON documents into four analytic
//! tables: `players`, `matches`, `innings` and `deliveries`.
//!
//! ## Features
//!
//! - **Failure isolation**: a malformed document is logged and skipped, it never
//!   leaves partial rows behind or aborts the batch
//! - **Deterministic registry**: first document to name a player identifier wins
//! - **Parallel flattening**: documents flatten on blocking workers, commits stay
//!   in source order
//! - **Arrow output**: Parquet or JSON-lines part files on local disk or cloud storage
//! - **Validation**: DuckDB summary queries over the written tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cricsheet_etl::batch::{BatchConfig, BatchCoordinator};
//! use cricsheet_etl::source::DirectorySource;
//!
//! #[tokio::main]
//! async fn main() -> cricsheet_etl::Result<()> {
//!     let source = DirectorySource::new("data/all_json");
//!     let output = BatchCoordinator::new(BatchConfig::new().with_workers(4))
//!         .run(&source)
//!         .await?;
//!
//!     println!("{} deliveries", output.tables.deliveries.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────────────────────┐   ┌─────────────┐
//! │   Source     │──▶│        Batch Coordinator        │──▶│   Output    │
//! │ Directory    │   │ flatten (workers) ─▶ commit     │   │ Arrow       │
//! │ Memory       │   │ registry merge, row append      │   │ Parquet     │
//! └──────────────┘   └─────────────────────────────────┘   │ JSON lines  │
//!                                                          └─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Typed access to match documents
pub mod document;

/// Player registries
pub mod registry;

/// Document -> row flattening
pub mod flatten;

/// Document sources
pub mod source;

/// Batch coordination and reporting
pub mod batch;

/// Arrow/Parquet output
pub mod output;

/// Pipeline configuration
pub mod config;

/// Summary queries via DuckDB
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use batch::{BatchConfig, BatchCoordinator, BatchOutput, BatchReport};
pub use config::PipelineConfig;
pub use flatten::{flatten_document, flatten_str, FlattenedDocument};
pub use registry::{merge, DocumentRegistry, PlayerRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
