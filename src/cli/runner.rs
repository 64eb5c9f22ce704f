//! CLI runner - executes commands

use crate::batch::{BatchCoordinator, BatchReport};
use crate::cli::commands::{Cli, Commands};
use crate::config::{ConfigOverrides, PipelineConfig};
use crate::database::SummaryEngine;
use crate::error::{Error, Result};
use crate::flatten::flatten_str;
use crate::output::{write_tables, StoreSink, TableSummary};
use crate::registry::{merge, PlayerRegistry};
use crate::source::{DirectorySource, DocumentSource};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Printed at the end of `run`
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub output: String,
    #[serde(flatten)]
    pub batch: BatchReport,
    pub tables: Vec<TableSummary>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                input,
                output,
                format,
                workers,
                chunk_rows,
                compression,
                allow_empty,
            } => {
                let overrides = ConfigOverrides {
                    input: input.clone(),
                    output: output.clone(),
                    format: *format,
                    workers: *workers,
                    chunk_rows: *chunk_rows,
                    // A bare flag can only switch the setting on
                    allow_empty: allow_empty.then_some(true),
                    compression: *compression,
                };
                let config = self.load_config()?.apply(overrides)?;
                let report = run_pipeline(&config, &DirectorySource::new(&config.input)).await?;
                print_json(&report);

                if report.batch.is_total_failure() {
                    return Err(Error::AllDocumentsFailed {
                        failed: report.batch.stats.documents_failed,
                    });
                }
                Ok(())
            }
            Commands::Inspect { file } => {
                print_json(&inspect(file)?);
                Ok(())
            }
            Commands::Summary {
                input,
                format,
                database,
                top,
            } => {
                let config = self.load_config()?;
                let root = input.clone().unwrap_or(config.output);
                let format = format.unwrap_or(config.format);
                let engine = match database {
                    Some(path) => SummaryEngine::materialize(&root, format, path)?,
                    None => SummaryEngine::open(&root, format)?,
                };
                info!(root = engine.root(), "Running summary queries");
                print_json(&engine.summary(*top)?);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<PipelineConfig> {
        PipelineConfig::load(self.cli.config.as_deref())
    }
}

/// Flatten every document of a source and write the tables
///
/// A batch where every document failed writes nothing; the returned report
/// says so through [`BatchReport::is_total_failure`].
pub async fn run_pipeline(
    config: &PipelineConfig,
    source: &dyn DocumentSource,
) -> Result<RunReport> {
    let output = BatchCoordinator::new(config.batch_config())
        .run(source)
        .await?;

    let tables = if output.report.is_total_failure() {
        Vec::new()
    } else {
        let sink = StoreSink::open(&config.output, config.part_encoder())?;
        write_tables(&sink, &output.tables, config.chunk_rows).await?
    };

    Ok(RunReport {
        output: config.output.clone(),
        batch: output.report,
        tables,
    })
}

/// Flatten one file and return its rows as JSON
pub fn inspect(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::document_read(path.display().to_string(), e.to_string())
        }
    })?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let flat = flatten_str(&id, &text)?;
    let players = merge(PlayerRegistry::new(), &flat.registry).to_rows();

    Ok(json!({
        "match": flat.match_row,
        "innings": flat.innings,
        "deliveries": flat.deliveries,
        "players": players,
        "extra_wickets_dropped": flat.extra_wickets_dropped,
    }))
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}
