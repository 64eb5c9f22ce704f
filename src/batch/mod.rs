//! Batch coordination
//!
//! Drives flattening over a whole document source.
//!
//! # Overview
//!
//! The batch module provides:
//! - `BatchCoordinator` - loads, flattens and commits documents one by one
//! - `BatchConfig` - worker count, empty-batch policy, progress interval
//! - `BatchReport` - counts per table plus the per-document error log
//!
//! Each document is flattened into a self-contained `FlattenedDocument`
//! first and only then committed (registry merge + row append). A document
//! that fails anywhere is recorded in the error log and contributes nothing.
//! Commits always happen on the coordinator in source order, so the player
//! registry stays first-write-wins even with several workers.

mod types;

pub use types::{BatchConfig, BatchOutput, BatchReport, BatchStats, DocumentError, TableSet};

use crate::error::{Error, Result};
use crate::flatten::{flatten_str, FlattenedDocument};
use crate::registry::PlayerRegistry;
use crate::source::{DocumentSource, SourceDocument};
use chrono::Utc;
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Load and flatten one document
fn load_and_flatten(doc: SourceDocument) -> Result<FlattenedDocument> {
    let id = doc.id().to_string();
    let text = doc.load()?;
    flatten_str(&id, &text)
}

/// Accumulates rows and errors across a batch
pub struct BatchCoordinator {
    config: BatchConfig,
    registry: PlayerRegistry,
    tables: TableSet,
    stats: BatchStats,
    errors: Vec<DocumentError>,
    started_at: chrono::DateTime<Utc>,
    started: Instant,
}

impl BatchCoordinator {
    /// Create a coordinator with the given configuration
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            registry: PlayerRegistry::new(),
            tables: TableSet::default(),
            stats: BatchStats::default(),
            errors: Vec::new(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Statistics so far
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Error log so far
    pub fn errors(&self) -> &[DocumentError] {
        &self.errors
    }

    /// The global player registry so far
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Process a document given its JSON text.
    ///
    /// Returns `true` if the document's rows were kept.
    pub fn process(&mut self, document_id: &str, text: &str) -> bool {
        let outcome = flatten_str(document_id, text);
        self.commit(document_id, outcome)
    }

    /// Commit the outcome of flattening one document
    fn commit(&mut self, document_id: &str, outcome: Result<FlattenedDocument>) -> bool {
        self.stats.documents_seen += 1;

        let kept = match outcome {
            Ok(flat) => {
                let new_players = self.registry.absorb(&flat.registry);
                if flat.extra_wickets_dropped > 0 {
                    debug!(
                        document = document_id,
                        dropped = flat.extra_wickets_dropped,
                        "Kept first wicket only on multi-wicket deliveries"
                    );
                }
                debug!(
                    document = document_id,
                    innings = flat.innings.len(),
                    deliveries = flat.deliveries.len(),
                    new_players,
                    "Flattened document"
                );

                self.stats.documents_processed += 1;
                self.stats.extra_wickets_dropped += flat.extra_wickets_dropped;
                self.tables.matches.push(flat.match_row);
                self.tables.innings.extend(flat.innings);
                self.tables.deliveries.extend(flat.deliveries);
                true
            }
            Err(e) => {
                warn!(document = document_id, error = %e, "Skipping document");
                self.stats.documents_failed += 1;
                self.errors.push(DocumentError::new(document_id, e.to_string()));
                false
            }
        };

        let every = self.config.progress_every;
        if every > 0 && self.stats.documents_seen % every == 0 {
            info!(
                documents = self.stats.documents_seen,
                deliveries = self.tables.deliveries.len(),
                "Progress"
            );
        }

        kept
    }

    /// Run the whole source through the coordinator
    pub async fn run(mut self, source: &dyn DocumentSource) -> Result<BatchOutput> {
        let documents = source.documents()?;
        info!(
            source = %source.describe(),
            documents = documents.len(),
            workers = self.config.workers,
            "Starting batch"
        );

        if documents.is_empty() && !self.config.allow_empty {
            return Err(Error::EmptyBatch);
        }

        if self.config.workers <= 1 {
            for doc in documents {
                let id = doc.id().to_string();
                let outcome = load_and_flatten(doc);
                self.commit(&id, outcome);
            }
        } else {
            let mut results = futures::stream::iter(documents)
                .map(|doc| {
                    let id = doc.id().to_string();
                    let task = tokio::task::spawn_blocking(move || load_and_flatten(doc));
                    async move { (id, task.await) }
                })
                .buffered(self.config.workers);

            while let Some((id, joined)) = results.next().await {
                let outcome = joined.unwrap_or_else(|e| {
                    Err(Error::Worker {
                        message: e.to_string(),
                    })
                });
                self.commit(&id, outcome);
            }
        }

        let output = self.finish();
        let stats = &output.report.stats;
        info!(
            matches = stats.matches,
            innings = stats.innings,
            deliveries = stats.deliveries,
            players = stats.players,
            errors = stats.documents_failed,
            duration_ms = stats.duration_ms,
            "Batch complete"
        );
        Ok(output)
    }

    /// Finish the batch and produce the four tables plus the report
    pub fn finish(mut self) -> BatchOutput {
        self.tables.players = self.registry.to_rows();

        self.stats.players = self.tables.players.len();
        self.stats.matches = self.tables.matches.len();
        self.stats.innings = self.tables.innings.len();
        self.stats.deliveries = self.tables.deliveries.len();
        self.stats.duration_ms = self.started.elapsed().as_millis() as u64;

        BatchOutput {
            tables: self.tables,
            report: BatchReport {
                started_at: self.started_at,
                finished_at: Utc::now(),
                stats: self.stats,
                errors: self.errors,
            },
        }
    }
}
