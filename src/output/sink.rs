//! Table sinks
//!
//! A sink receives finished record batches one part at a time. `write_tables`
//! chunks a whole `TableSet` and feeds every table to a sink, building each
//! chunk's RecordBatch only when it is about to be written.

use super::destination::Destination;
use super::schema::{part_count, table_chunk};
use super::writer::PartEncoder;
use crate::batch::TableSet;
use crate::error::Result;
use crate::types::{OutputFormat, Table};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

/// Receives table parts
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Remove parts left by an earlier run, returning how many were removed
    async fn clear_table(&self, table: Table) -> Result<usize>;

    /// Write one part of a table, returning where it went
    async fn write_part(&self, table: Table, part: usize, batch: &RecordBatch) -> Result<String>;
}

/// Sink writing encoded parts to an object store destination
#[derive(Debug, Clone)]
pub struct StoreSink {
    destination: Destination,
    encoder: PartEncoder,
}

impl StoreSink {
    pub fn new(destination: Destination, encoder: PartEncoder) -> Self {
        Self {
            destination,
            encoder,
        }
    }

    /// Parse a destination URL and create a sink for it
    pub fn open(url: &str, encoder: PartEncoder) -> Result<Self> {
        Ok(Self::new(Destination::parse(url)?, encoder))
    }

    pub fn format(&self) -> OutputFormat {
        self.encoder.format()
    }
}

#[async_trait]
impl TableSink for StoreSink {
    async fn clear_table(&self, table: Table) -> Result<usize> {
        let removed = self.destination.clear_table(table).await?;
        if removed > 0 {
            debug!(table = %table, removed, "Removed stale parts");
        }
        Ok(removed)
    }

    async fn write_part(&self, table: Table, part: usize, batch: &RecordBatch) -> Result<String> {
        let data = self.encoder.encode(batch)?;
        let size = data.len();
        let written = self
            .destination
            .write_part(table, part, self.encoder.format().extension(), data)
            .await?;
        debug!(
            table = %table,
            part,
            rows = batch.num_rows(),
            bytes = size,
            path = %written,
            "Wrote part"
        );
        Ok(written)
    }
}

/// What was written for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub rows: usize,
    pub parts: Vec<String>,
}

/// Write all four tables to a sink in chunks of at most `chunk_rows` rows
///
/// Every table gets at least one part, even with zero rows. Parts already
/// under a table's directory are removed first so a rerun with fewer rows
/// leaves only its own parts.
pub async fn write_tables(
    sink: &dyn TableSink,
    tables: &TableSet,
    chunk_rows: usize,
) -> Result<Vec<TableSummary>> {
    let mut summaries = Vec::with_capacity(Table::ALL.len());

    for table in Table::ALL {
        let rows = tables.row_count(table);
        let count = part_count(rows, chunk_rows);
        let mut parts = Vec::with_capacity(count);

        sink.clear_table(table).await?;
        for part in 0..count {
            let batch = table_chunk(tables, table, part, chunk_rows)?;
            parts.push(sink.write_part(table, part, &batch).await?);
        }

        info!(table = %table, rows, parts = count, "Table written");
        summaries.push(TableSummary {
            table: table.name().to_string(),
            rows,
            parts,
        });
    }

    Ok(summaries)
}
