//! Tests for output module

use super::*;
use crate::batch::{BatchConfig, BatchCoordinator, TableSet};
use crate::error::Result;
use crate::flatten::{DeliveryRow, InningsRow, MatchRow, PlayerRow};
use crate::types::{CompressionCodec, OutputFormat, Table};
use arrow::array::{Array, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;
use tempfile::tempdir;

fn sample_tables() -> TableSet {
    let doc = json!({
        "meta": {"data_version": "1.1.0"},
        "info": {
            "teams": ["India", "Australia"],
            "match_type": "ODI",
            "dates": ["2023-11-19"],
            "player_of_match": ["TM Head"],
            "registry": {"people": {"TM Head": "p1", "JJ Bumrah": "p2", "M Labuschagne": "p3"}}
        },
        "innings": [{
            "team": "Australia",
            "target": {"runs": 241, "overs": 50},
            "overs": [{
                "over": 0,
                "deliveries": [
                    {"batter": "TM Head", "bowler": "JJ Bumrah", "non_striker": "M Labuschagne",
                     "runs": {"batter": 4, "extras": 0, "total": 4}},
                    {"batter": "TM Head", "bowler": "JJ Bumrah", "non_striker": "M Labuschagne",
                     "runs": {"batter": 0, "extras": 1, "total": 1}, "extras": {"wides": 1}},
                    {"batter": "TM Head", "bowler": "JJ Bumrah", "non_striker": "M Labuschagne",
                     "runs": {"batter": 0, "extras": 0, "total": 0},
                     "wickets": [{"kind": "caught", "player_out": "TM Head", "fielders": [{"name": "Substitute"}]}]}
                ]
            }]
        }]
    });

    let mut coordinator = BatchCoordinator::new(BatchConfig::default());
    assert!(coordinator.process("1384439", &doc.to_string()));
    coordinator.finish().tables
}

fn strings(batch: &RecordBatch, column: &str) -> Vec<Option<String>> {
    let array = batch
        .column_by_name(column)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    (0..array.len())
        .map(|i| (!array.is_null(i)).then(|| array.value(i).to_string()))
        .collect()
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_table_schemas_column_counts() {
    assert_eq!(table_schema(Table::Players).fields().len(), 6);
    assert_eq!(table_schema(Table::Matches).fields().len(), 28);
    assert_eq!(table_schema(Table::Innings).fields().len(), 9);
    assert_eq!(table_schema(Table::Deliveries).fields().len(), 27);
}

#[test]
fn test_key_columns_not_nullable() {
    let schema = deliveries_schema();
    for name in ["match_id", "innings_number", "over_number", "ball_number", "is_wicket"] {
        assert!(!schema.field_with_name(name).unwrap().is_nullable(), "{name}");
    }
    assert!(schema.field_with_name("batter_id").unwrap().is_nullable());

    let innings = innings_schema();
    assert_eq!(
        innings.field_with_name("target_overs").unwrap().data_type(),
        &DataType::Float64
    );
}

#[test]
fn test_players_batch() {
    let rows = vec![PlayerRow::new("p1", "TM Head"), PlayerRow::new("p2", "JJ Bumrah")];
    let batch = players_batch(&rows).unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(
        strings(&batch, "player_name"),
        vec![Some("TM Head".to_string()), Some("JJ Bumrah".to_string())]
    );
    assert_eq!(strings(&batch, "country"), vec![None, None]);
}

#[test]
fn test_matches_batch_nulls() {
    let row = MatchRow {
        match_id: "m1".to_string(),
        balls_per_over: Some(6),
        ..Default::default()
    };
    let batch = matches_batch(&[row]).unwrap();

    let bpo = batch
        .column_by_name("balls_per_over")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(bpo.value(0), 6);
    assert!(batch.column_by_name("outcome_by_runs").unwrap().is_null(0));
    assert_eq!(strings(&batch, "player_of_match"), vec![Some(String::new())]);
}

#[test]
fn test_innings_batch_flags() {
    let row = InningsRow {
        match_id: "m1".to_string(),
        innings_number: 2,
        forfeited: true,
        ..Default::default()
    };
    let batch = innings_batch(&[row]).unwrap();
    let forfeited = batch
        .column_by_name("forfeited")
        .unwrap()
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert!(forfeited.value(0));
}

#[test]
fn test_deliveries_batch_from_flattened_rows() {
    let tables = sample_tables();
    let batch = deliveries_batch(&tables.deliveries).unwrap();

    assert_eq!(batch.num_rows(), 3);
    assert_eq!(
        strings(&batch, "wicket_kind"),
        vec![None, None, Some("caught".to_string())]
    );
    assert_eq!(
        strings(&batch, "bowling_team"),
        vec![Some("India".to_string()); 3]
    );
}

#[test]
fn test_empty_batches_keep_schema() {
    let batch = deliveries_batch(&[] as &[DeliveryRow]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.schema(), table_schema(Table::Deliveries));
}

// ============================================================================
// Chunking Tests
// ============================================================================

#[test]
fn test_part_count() {
    assert_eq!(part_count(0, 10), 1);
    assert_eq!(part_count(10, 10), 1);
    assert_eq!(part_count(11, 10), 2);
    assert_eq!(part_count(5, 0), 5);
}

#[test]
fn test_table_chunk_slices_rows() {
    let tables = sample_tables();

    let first = table_chunk(&tables, Table::Deliveries, 0, 2).unwrap();
    let second = table_chunk(&tables, Table::Deliveries, 1, 2).unwrap();
    let past_end = table_chunk(&tables, Table::Deliveries, 5, 2).unwrap();

    assert_eq!(first.num_rows(), 2);
    assert_eq!(second.num_rows(), 1);
    assert_eq!(past_end.num_rows(), 0);
    assert_eq!(
        strings(&second, "wicket_player_out"),
        vec![Some("TM Head".to_string())]
    );
}

// ============================================================================
// Encoding Tests
// ============================================================================

#[test]
fn test_parquet_writer_config_default() {
    let config = ParquetWriterConfig::default();
    assert!(config.is_dictionary_enabled());
    assert!(config.is_statistics_enabled());
    assert_eq!(config.compression(), Compression::SNAPPY);
}

#[test]
fn test_parquet_writer_config_builder() {
    let config = ParquetWriterConfig::new()
        .with_row_group_size(1000)
        .with_dictionary(false)
        .with_statistics(false)
        .with_codec(CompressionCodec::None);

    assert!(!config.is_dictionary_enabled());
    assert!(!config.is_statistics_enabled());
    assert_eq!(config.row_group_size(), 1000);
    assert_eq!(config.compression(), Compression::UNCOMPRESSED);
}

#[test]
fn test_encode_parquet_reads_back() {
    let tables = sample_tables();
    let batch = matches_batch(&tables.matches).unwrap();

    for codec in [CompressionCodec::Snappy, CompressionCodec::Zstd, CompressionCodec::Gzip] {
        let bytes = encode_parquet(&batch, &ParquetWriterConfig::new().with_codec(codec)).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();

        assert_eq!(batches.len(), 1);
        assert_eq!(strings(&batches[0], "match_type"), vec![Some("ODI".to_string())]);
        assert_eq!(strings(&batches[0], "player_of_match"), vec![Some("TM Head".to_string())]);
    }
}

#[test]
fn test_encode_jsonl() {
    let rows = vec![PlayerRow::new("p1", "TM Head"), PlayerRow::new("p2", "JJ Bumrah")];
    let bytes = encode_jsonl(&players_batch(&rows).unwrap()).unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();

    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![
            json!({"player_id": "p1", "player_name": "TM Head"}),
            json!({"player_id": "p2", "player_name": "JJ Bumrah"}),
        ]
    );
}

#[test]
fn test_part_encoder_dispatch() {
    let batch = players_batch(&[PlayerRow::new("p1", "TM Head")]).unwrap();

    let parquet = PartEncoder::default().encode(&batch).unwrap();
    assert_eq!(&parquet[..4], b"PAR1");

    let jsonl = PartEncoder::new(OutputFormat::Jsonl, ParquetWriterConfig::default())
        .encode(&batch)
        .unwrap();
    assert!(jsonl.starts_with(b"{"));
}

// ============================================================================
// Sink Tests
// ============================================================================

/// Records (table, part, rows) for every part it receives
#[derive(Default)]
struct RecordingSink {
    cleared: Mutex<Vec<Table>>,
    parts: Mutex<Vec<(Table, usize, usize)>>,
}

#[async_trait]
impl TableSink for RecordingSink {
    async fn clear_table(&self, table: Table) -> Result<usize> {
        // Clearing must happen before the table's first part
        assert!(self.parts.lock().unwrap().iter().all(|(t, _, _)| *t != table));
        self.cleared.lock().unwrap().push(table);
        Ok(0)
    }

    async fn write_part(&self, table: Table, part: usize, batch: &RecordBatch) -> Result<String> {
        self.parts
            .lock()
            .unwrap()
            .push((table, part, batch.num_rows()));
        Ok(part_path(table, part, "mem"))
    }
}

#[tokio::test]
async fn test_write_tables_chunks_every_table() {
    let tables = sample_tables();
    let sink = RecordingSink::default();

    let summaries = write_tables(&sink, &tables, 2).await.unwrap();

    let parts = sink.parts.lock().unwrap().clone();
    assert_eq!(
        parts,
        vec![
            (Table::Players, 0, 2),
            (Table::Players, 1, 1),
            (Table::Matches, 0, 1),
            (Table::Innings, 0, 1),
            (Table::Deliveries, 0, 2),
            (Table::Deliveries, 1, 1),
        ]
    );
    assert_eq!(sink.cleared.lock().unwrap().clone(), Table::ALL.to_vec());
    assert_eq!(summaries[3].table, "deliveries");
    assert_eq!(summaries[3].rows, 3);
    assert_eq!(
        summaries[3].parts,
        vec!["deliveries/part-00000.mem", "deliveries/part-00001.mem"]
    );
}

#[tokio::test]
async fn test_write_tables_empty_set_writes_one_part_each() {
    let sink = RecordingSink::default();
    write_tables(&sink, &TableSet::default(), 100).await.unwrap();

    let parts = sink.parts.lock().unwrap().clone();
    assert_eq!(parts.len(), 4);
    assert!(parts.iter().all(|(_, part, rows)| *part == 0 && *rows == 0));
}

#[tokio::test]
async fn test_store_sink_writes_parquet_files() {
    let dir = tempdir().unwrap();
    let sink = StoreSink::open(dir.path().to_str().unwrap(), PartEncoder::default()).unwrap();

    write_tables(&sink, &sample_tables(), 1000).await.unwrap();

    for table in Table::ALL {
        let path = dir.path().join(table.name()).join("part-00000.parquet");
        assert!(path.exists(), "{}", path.display());
    }

    let file = std::fs::File::open(dir.path().join("players/part-00000.parquet")).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(rows, 3);
}

#[tokio::test]
async fn test_store_sink_rerun_replaces_stale_parts() {
    let dir = tempdir().unwrap();
    let sink = StoreSink::open(dir.path().to_str().unwrap(), PartEncoder::default()).unwrap();

    write_tables(&sink, &sample_tables(), 1).await.unwrap();
    assert!(dir.path().join("players/part-00002.parquet").exists());

    write_tables(&sink, &sample_tables(), 1000).await.unwrap();

    let players: Vec<_> = std::fs::read_dir(dir.path().join("players"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(players, vec!["part-00000.parquet"]);
}
