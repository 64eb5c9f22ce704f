//! Pipeline configuration
//!
//! Settings for a run, loadable from YAML. Every field has a default so an
//! empty file (or no file at all) is a valid configuration. Command-line
//! flags are layered on top with [`PipelineConfig::apply`].

use crate::batch::BatchConfig;
use crate::error::{Error, Result};
use crate::output::{ParquetWriterConfig, PartEncoder};
use crate::types::{CompressionCodec, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete configuration for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory of Cricsheet JSON documents
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Destination for the tables (local path or s3://, r2://, gs://, az:// URL)
    #[serde(default = "default_output")]
    pub output: String,

    /// File format of written tables
    #[serde(default)]
    pub format: OutputFormat,

    /// Number of flattening workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum rows per part file
    #[serde(default = "default_chunk_rows")]
    pub chunk_rows: usize,

    /// Treat an empty input directory as a successful run
    #[serde(default)]
    pub allow_empty: bool,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Maximum rows per Parquet row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,

    /// Parquet dictionary encoding
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Parquet column statistics
    #[serde(default = "default_true")]
    pub statistics: bool,

    /// Log progress every N documents (0 disables)
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_input() -> PathBuf {
    PathBuf::from("./data")
}

fn default_output() -> String {
    "./output".to_string()
}

fn default_workers() -> usize {
    1
}

fn default_chunk_rows() -> usize {
    2_000_000
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_progress_every() -> usize {
    5000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            format: OutputFormat::default(),
            workers: default_workers(),
            chunk_rows: default_chunk_rows(),
            allow_empty: false,
            compression: CompressionCodec::default(),
            row_group_size: default_row_group_size(),
            dictionary: true,
            statistics: true,
            progress_every: default_progress_every(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<String>,
    pub format: Option<OutputFormat>,
    pub workers: Option<usize>,
    pub chunk_rows: Option<usize>,
    pub allow_empty: Option<bool>,
    pub compression: Option<CompressionCodec>,
}

impl PipelineConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes as null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Layer command-line values over this configuration
    pub fn apply(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(input) = overrides.input {
            self.input = input;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        if let Some(chunk_rows) = overrides.chunk_rows {
            self.chunk_rows = chunk_rows;
        }
        if let Some(allow_empty) = overrides.allow_empty {
            self.allow_empty = allow_empty;
        }
        if let Some(compression) = overrides.compression {
            self.compression = compression;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::invalid_value("workers", "must be at least 1"));
        }
        if self.chunk_rows == 0 {
            return Err(Error::invalid_value("chunk_rows", "must be at least 1"));
        }
        if self.row_group_size == 0 {
            return Err(Error::invalid_value("row_group_size", "must be at least 1"));
        }
        if self.output.trim().is_empty() {
            return Err(Error::invalid_value("output", "cannot be empty"));
        }
        Ok(())
    }

    /// Batch settings for the coordinator
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new()
            .with_workers(self.workers)
            .with_allow_empty(self.allow_empty)
            .with_progress_every(self.progress_every)
    }

    /// Encoder for table parts
    pub fn part_encoder(&self) -> PartEncoder {
        let parquet = ParquetWriterConfig::new()
            .with_codec(self.compression)
            .with_row_group_size(self.row_group_size)
            .with_dictionary(self.dictionary)
            .with_statistics(self.statistics);
        PartEncoder::new(self.format, parquet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.format, OutputFormat::Parquet);
        assert_eq!(config.workers, 1);
        assert_eq!(config.chunk_rows, 2_000_000);
        assert_eq!(config.progress_every, 5000);
        assert_eq!(config.compression, CompressionCodec::Snappy);
        assert_eq!(config.row_group_size, 1024 * 1024);
        assert!(config.dictionary);
        assert!(config.statistics);
        assert!(!config.allow_empty);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(PipelineConfig::from_yaml("").unwrap(), PipelineConfig::default());
        assert_eq!(PipelineConfig::from_yaml("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
input: /data/cricsheet
output: s3://lake/cricket
format: jsonl
workers: 8
chunk_rows: 500000
allow_empty: true
compression: zstd
"#;
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.input, PathBuf::from("/data/cricsheet"));
        assert_eq!(config.output, "s3://lake/cricket");
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert_eq!(config.workers, 8);
        assert_eq!(config.chunk_rows, 500_000);
        assert!(config.allow_empty);
        assert_eq!(config.compression, CompressionCodec::Zstd);
        assert_eq!(config.progress_every, 5000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            PipelineConfig::from_yaml("wrokers: 4"),
            Err(Error::YamlParse(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let err = PipelineConfig::from_yaml("workers: 0").unwrap_err();
        assert!(err.to_string().contains("workers"));

        let err = PipelineConfig::from_yaml("chunk_rows: 0").unwrap_err();
        assert!(err.to_string().contains("chunk_rows"));

        let err = PipelineConfig::from_yaml("row_group_size: 0").unwrap_err();
        assert!(err.to_string().contains("row_group_size"));
    }

    #[test]
    fn test_overrides_win() {
        let config = PipelineConfig::from_yaml("workers: 2\noutput: ./a")
            .unwrap()
            .apply(ConfigOverrides {
                output: Some("./b".to_string()),
                format: Some(OutputFormat::Jsonl),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.workers, 2);
        assert_eq!(config.output, "./b");
        assert_eq!(config.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl.yaml");
        std::fs::write(&path, "progress_every: 10\n").unwrap();

        let config = PipelineConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.progress_every, 10);

        let missing = PipelineConfig::from_file(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_derived_settings() {
        let config = PipelineConfig {
            workers: 4,
            allow_empty: true,
            format: OutputFormat::Jsonl,
            ..Default::default()
        };
        let batch = config.batch_config();
        assert_eq!(batch.workers, 4);
        assert!(batch.allow_empty);
        assert_eq!(config.part_encoder().format(), OutputFormat::Jsonl);
    }

    #[test]
    fn test_parquet_settings_reach_encoder() {
        let yaml = "compression: gzip\nrow_group_size: 250\ndictionary: false\nstatistics: false\n";
        let encoder = PipelineConfig::from_yaml(yaml).unwrap().part_encoder();

        let settings = encoder.parquet();
        assert_eq!(settings.row_group_size(), 250);
        assert!(!settings.is_dictionary_enabled());
        assert!(!settings.is_statistics_enabled());
        assert!(matches!(
            settings.compression(),
            parquet::basic::Compression::GZIP(_)
        ));
    }
}
