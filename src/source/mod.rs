//! Document sources
//!
//! A source enumerates match documents as (identifier, loader) pairs.
//! Enumeration failure is fatal for a batch; loading a single document
//! happens later, per document, so an unreadable file only skips that file.
//!
//! # Overview
//!
//! - `DirectorySource` - every `*.json` file in a directory, id = file stem
//! - `MemorySource` - in-memory documents for tests and embedding callers

mod directory;
mod memory;

pub use directory::DirectorySource;
pub use memory::MemorySource;

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Where a document's text comes from
#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Inline(String),
}

/// A document handle produced by a source
#[derive(Debug, Clone)]
pub struct SourceDocument {
    id: String,
    origin: Origin,
}

impl SourceDocument {
    /// A document backed by a file
    pub fn from_file(id: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            id: id.into(),
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    /// A document held in memory
    pub fn inline(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            origin: Origin::Inline(text.into()),
        }
    }

    /// Document identifier (becomes the match id)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read the document's JSON text
    pub fn load(self) -> Result<String> {
        match self.origin {
            Origin::Inline(text) => Ok(text),
            Origin::File(path) => std::fs::read_to_string(&path).map_err(|e| {
                Error::document_read(&self.id, format!("{}: {e}", path.display()))
            }),
        }
    }
}

/// A supplier of match documents
pub trait DocumentSource: Send + Sync {
    /// Human-readable description for logging
    fn describe(&self) -> String;

    /// Enumerate all documents, in processing order
    fn documents(&self) -> Result<Vec<SourceDocument>>;
}

#[cfg(test)]
mod tests;
