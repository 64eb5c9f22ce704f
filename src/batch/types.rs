//! Batch types
//!
//! Configuration, row collections and the report handed to the operator.

use crate::flatten::{DeliveryRow, InningsRow, MatchRow, PlayerRow};
use crate::types::Table;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of blocking workers flattening documents (1 = inline)
    pub workers: usize,
    /// Whether an empty document set is a valid run
    pub allow_empty: bool,
    /// Log progress every N documents (0 = never)
    pub progress_every: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            allow_empty: false,
            progress_every: 5000,
        }
    }
}

impl BatchConfig {
    /// Create a new batch config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of workers (at least 1)
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Accept an empty document set
    #[must_use]
    pub fn with_allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Set the progress logging interval
    #[must_use]
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }
}

/// A document that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentError {
    pub document_id: String,
    pub message: String,
}

impl DocumentError {
    pub fn new(document_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            message: message.into(),
        }
    }
}

/// Row collections for the four tables
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub players: Vec<PlayerRow>,
    pub matches: Vec<MatchRow>,
    pub innings: Vec<InningsRow>,
    pub deliveries: Vec<DeliveryRow>,
}

impl TableSet {
    /// Number of rows in a table
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Players => self.players.len(),
            Table::Matches => self.matches.len(),
            Table::Innings => self.innings.len(),
            Table::Deliveries => self.deliveries.len(),
        }
    }
}

/// Statistics from a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    /// Documents enumerated by the source
    pub documents_seen: usize,
    /// Documents whose rows were kept
    pub documents_processed: usize,
    /// Documents skipped because of an error
    pub documents_failed: usize,
    pub players: usize,
    pub matches: usize,
    pub innings: usize,
    pub deliveries: usize,
    /// Simultaneous wickets not represented in delivery rows
    pub extra_wickets_dropped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// The operator-facing summary of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: BatchStats,
    pub errors: Vec<DocumentError>,
}

impl BatchReport {
    /// True when documents were seen but none could be processed
    pub fn is_total_failure(&self) -> bool {
        self.stats.documents_seen > 0 && self.stats.documents_processed == 0
    }
}

/// Rows plus report from a completed batch
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub tables: TableSet,
    pub report: BatchReport,
}
