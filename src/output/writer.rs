//! Table part encoding
//!
//! Encodes Arrow RecordBatches as Parquet or JSON-lines bytes, ready to be
//! handed to a storage destination.

use crate::error::{Error, Result};
use crate::types::{CompressionCodec, OutputFormat};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

/// Configuration for Parquet encoding
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl ParquetWriterConfig {
    /// Get dictionary encoding enabled
    #[must_use]
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Get statistics enabled
    #[must_use]
    pub fn is_statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Get compression
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression from a configured codec
    #[must_use]
    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.compression = match codec {
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Zstd => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            CompressionCodec::Gzip => Compression::GZIP(parquet::basic::GzipLevel::default()),
            CompressionCodec::None => Compression::UNCOMPRESSED,
        };
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder =
                builder.set_statistics_enabled(parquet::file::properties::EnabledStatistics::None);
        }

        builder.build()
    }
}

/// Encode a RecordBatch as an in-memory Parquet file
pub fn encode_parquet(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut buf = Vec::new();
    let props = config.build_properties();

    let mut writer =
        ArrowWriter::try_new(&mut buf, batch.schema(), Some(props)).map_err(|e| Error::Output {
            message: format!("Failed to create Parquet writer: {e}"),
        })?;

    writer.write(batch).map_err(|e| Error::Output {
        message: format!("Failed to write batch: {e}"),
    })?;

    writer.close().map_err(|e| Error::Output {
        message: format!("Failed to close Parquet writer: {e}"),
    })?;

    Ok(Bytes::from(buf))
}

/// Encode a RecordBatch as newline-delimited JSON.
///
/// Null columns are omitted from each line.
pub fn encode_jsonl(batch: &RecordBatch) -> Result<Bytes> {
    let mut buf = Vec::new();
    {
        let mut writer = arrow::json::LineDelimitedWriter::new(&mut buf);
        writer.write(batch)?;
        writer.finish()?;
    }
    Ok(Bytes::from(buf))
}

/// Encodes table parts in the configured format
#[derive(Debug, Clone, Default)]
pub struct PartEncoder {
    format: OutputFormat,
    parquet: ParquetWriterConfig,
}

impl PartEncoder {
    /// Create an encoder for a format
    pub fn new(format: OutputFormat, parquet: ParquetWriterConfig) -> Self {
        Self { format, parquet }
    }

    /// Output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Parquet settings, used when the format is Parquet
    pub fn parquet(&self) -> &ParquetWriterConfig {
        &self.parquet
    }

    /// Encode one part
    pub fn encode(&self, batch: &RecordBatch) -> Result<Bytes> {
        match self.format {
            OutputFormat::Parquet => encode_parquet(batch, &self.parquet),
            OutputFormat::Jsonl => encode_jsonl(batch),
        }
    }
}
