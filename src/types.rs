//! Common types used throughout cricsheet-etl
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Tables
// ============================================================================

/// The four relational tables produced by the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Players,
    Matches,
    Innings,
    Deliveries,
}

impl Table {
    /// All tables, in the order they are written
    pub const ALL: [Table; 4] = [
        Table::Players,
        Table::Matches,
        Table::Innings,
        Table::Deliveries,
    ];

    /// Table name as used in output paths and SQL
    pub fn name(self) -> &'static str {
        match self {
            Table::Players => "players",
            Table::Matches => "matches",
            Table::Innings => "innings",
            Table::Deliveries => "deliveries",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// File format for written tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Apache Parquet (default)
    #[default]
    Parquet,
    /// Newline-delimited JSON
    Jsonl,
}

impl OutputFormat {
    /// File extension for part files
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

// ============================================================================
// Compression
// ============================================================================

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}
