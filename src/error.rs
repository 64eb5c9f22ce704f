//! Error types for cricsheet-etl
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Per-document failures are captured as `Error` values and stringified into
//! the batch error log; they never abort a batch.

use thiserror::Error;

/// The main error type for cricsheet-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Document Errors
    // ============================================================================
    #[error("Expected '{path}' to be {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing required block '{path}'")]
    MissingBlock { path: String },

    #[error("Failed to read document '{id}': {message}")]
    DocumentRead { id: String, message: String },

    // ============================================================================
    // Batch Errors
    // ============================================================================
    #[error("No documents found in source")]
    EmptyBatch,

    #[error("All {failed} documents failed to process")]
    AllDocumentsFailed { failed: usize },

    #[error("Worker failed: {message}")]
    Worker { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("Database error: {message}")]
    Database { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a wrong-type error for a document path
    pub fn wrong_type(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::WrongType {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a missing block error
    pub fn missing_block(path: impl Into<String>) -> Self {
        Self::MissingBlock { path: path.into() }
    }

    /// Create a document read error
    pub fn document_read(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentRead {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

/// Result type alias for cricsheet-etl
pub type Result<T> = std::result::Result<T, Error>;
