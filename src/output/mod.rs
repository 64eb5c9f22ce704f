//! Output module
//!
//! Turns the row collections into files.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Fixed Arrow schemas per table and row -> RecordBatch conversion
//! - Encoding parts as Parquet or JSON lines
//! - Writing parts to local or cloud storage (S3, R2, GCS, Azure)

mod destination;
mod schema;
mod sink;
mod writer;

pub use destination::{part_path, Destination, Scheme};
pub use schema::{
    deliveries_batch, deliveries_schema, innings_batch, innings_schema, matches_batch,
    matches_schema, part_count, players_batch, players_schema, table_chunk, table_schema,
};
pub use sink::{write_tables, StoreSink, TableSink, TableSummary};
pub use writer::{encode_jsonl, encode_parquet, ParquetWriterConfig, PartEncoder};

#[cfg(test)]
mod tests;
