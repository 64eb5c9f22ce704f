//! In-memory document source

use super::{DocumentSource, SourceDocument};
use crate::error::Result;

/// Documents held in memory as (id, JSON text) pairs
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<(String, String)>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    #[must_use]
    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.push((id.into(), text.into()));
        self
    }

    /// Add a document from a JSON value
    #[must_use]
    pub fn with_json(self, id: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with_document(id, value.to_string())
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the source is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }

    fn documents(&self) -> Result<Vec<SourceDocument>> {
        Ok(self
            .documents
            .iter()
            .map(|(id, text)| SourceDocument::inline(id.clone(), text.clone()))
            .collect())
    }
}
