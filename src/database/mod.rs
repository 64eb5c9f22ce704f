//! Summary queries over written tables via DuckDB
//!
//! DuckDB reads the Parquet part files directly (local or cloud) and runs the
//! validation queries used to sanity-check a load.

mod engine;

pub use engine::{BatterRuns, GroupCount, Summary, SummaryEngine, TableCount};
