//! Arrow schemas and row -> RecordBatch conversion
//!
//! Each table has a fixed schema. Key columns (`match_id`, `innings_number`,
//! positions, counts and flags) are non-nullable; everything sourced from an
//! optional document field is nullable.

use crate::batch::TableSet;
use crate::error::{Error, Result};
use crate::flatten::{DeliveryRow, InningsRow, MatchRow, PlayerRow};
use crate::types::Table;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

// ============================================================================
// Schemas
// ============================================================================

fn required(name: &str, data_type: DataType) -> Field {
    Field::new(name, data_type, false)
}

fn optional(name: &str, data_type: DataType) -> Field {
    Field::new(name, data_type, true)
}

/// Schema of the `players` table
pub fn players_schema() -> Schema {
    Schema::new(vec![
        required("player_id", DataType::Utf8),
        required("player_name", DataType::Utf8),
        optional("batting_style", DataType::Utf8),
        optional("bowling_style", DataType::Utf8),
        optional("playing_role", DataType::Utf8),
        optional("country", DataType::Utf8),
    ])
}

/// Schema of the `matches` table
pub fn matches_schema() -> Schema {
    Schema::new(vec![
        required("match_id", DataType::Utf8),
        optional("data_version", DataType::Utf8),
        optional("match_type", DataType::Utf8),
        optional("match_type_number", DataType::Int64),
        optional("gender", DataType::Utf8),
        optional("team_type", DataType::Utf8),
        optional("overs_per_side", DataType::Int64),
        optional("balls_per_over", DataType::Int64),
        optional("venue", DataType::Utf8),
        optional("city", DataType::Utf8),
        optional("date_start", DataType::Utf8),
        optional("date_end", DataType::Utf8),
        optional("team1", DataType::Utf8),
        optional("team2", DataType::Utf8),
        optional("toss_winner", DataType::Utf8),
        optional("toss_decision", DataType::Utf8),
        optional("outcome_winner", DataType::Utf8),
        optional("outcome_result", DataType::Utf8),
        optional("outcome_method", DataType::Utf8),
        optional("outcome_by_runs", DataType::Int64),
        optional("outcome_by_wickets", DataType::Int64),
        optional("outcome_by_innings", DataType::Int64),
        required("player_of_match", DataType::Utf8),
        optional("event_name", DataType::Utf8),
        optional("event_match_number", DataType::Int64),
        optional("event_group", DataType::Utf8),
        optional("event_stage", DataType::Utf8),
        optional("season", DataType::Utf8),
    ])
}

/// Schema of the `innings` table
pub fn innings_schema() -> Schema {
    Schema::new(vec![
        required("match_id", DataType::Utf8),
        required("innings_number", DataType::Int64),
        optional("batting_team", DataType::Utf8),
        optional("bowling_team", DataType::Utf8),
        optional("target_runs", DataType::Int64),
        optional("target_overs", DataType::Float64),
        required("declared", DataType::Boolean),
        required("forfeited", DataType::Boolean),
        required("is_super_over", DataType::Boolean),
    ])
}

/// Schema of the `deliveries` table
pub fn deliveries_schema() -> Schema {
    Schema::new(vec![
        required("match_id", DataType::Utf8),
        required("innings_number", DataType::Int64),
        required("over_number", DataType::Int64),
        required("ball_number", DataType::Int64),
        optional("batter", DataType::Utf8),
        optional("batter_id", DataType::Utf8),
        optional("bowler", DataType::Utf8),
        optional("bowler_id", DataType::Utf8),
        optional("non_striker", DataType::Utf8),
        optional("non_striker_id", DataType::Utf8),
        required("runs_batter", DataType::Int64),
        required("runs_extras", DataType::Int64),
        required("runs_total", DataType::Int64),
        required("runs_non_boundary", DataType::Boolean),
        required("extras_wides", DataType::Int64),
        required("extras_noballs", DataType::Int64),
        required("extras_byes", DataType::Int64),
        required("extras_legbyes", DataType::Int64),
        required("extras_penalty", DataType::Int64),
        required("is_wicket", DataType::Boolean),
        optional("wicket_kind", DataType::Utf8),
        optional("wicket_player_out", DataType::Utf8),
        optional("wicket_player_out_id", DataType::Utf8),
        optional("wicket_fielder1", DataType::Utf8),
        optional("wicket_fielder2", DataType::Utf8),
        optional("batting_team", DataType::Utf8),
        optional("bowling_team", DataType::Utf8),
    ])
}

/// Schema for any table
pub fn table_schema(table: Table) -> SchemaRef {
    Arc::new(match table {
        Table::Players => players_schema(),
        Table::Matches => matches_schema(),
        Table::Innings => innings_schema(),
        Table::Deliveries => deliveries_schema(),
    })
}

// ============================================================================
// Column builders
// ============================================================================

fn utf8<'a, T>(rows: &'a [T], f: impl Fn(&'a T) -> Option<&'a str>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<StringArray>())
}

fn int64<T>(rows: &[T], f: impl Fn(&T) -> Option<i64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int64Array>())
}

fn float64<T>(rows: &[T], f: impl Fn(&T) -> Option<f64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Float64Array>())
}

fn boolean<T>(rows: &[T], f: impl Fn(&T) -> bool) -> ArrayRef {
    Arc::new(rows.iter().map(|r| Some(f(r))).collect::<BooleanArray>())
}

fn build(table: Table, columns: Vec<ArrayRef>) -> Result<RecordBatch> {
    RecordBatch::try_new(table_schema(table), columns).map_err(|e| Error::Output {
        message: format!("Failed to create {table} RecordBatch: {e}"),
    })
}

// ============================================================================
// Row -> RecordBatch
// ============================================================================

/// Convert player rows to a RecordBatch
pub fn players_batch(rows: &[PlayerRow]) -> Result<RecordBatch> {
    build(
        Table::Players,
        vec![
            utf8(rows, |r| Some(r.player_id.as_str())),
            utf8(rows, |r| Some(r.player_name.as_str())),
            utf8(rows, |r| r.batting_style.as_deref()),
            utf8(rows, |r| r.bowling_style.as_deref()),
            utf8(rows, |r| r.playing_role.as_deref()),
            utf8(rows, |r| r.country.as_deref()),
        ],
    )
}

/// Convert match rows to a RecordBatch
pub fn matches_batch(rows: &[MatchRow]) -> Result<RecordBatch> {
    build(
        Table::Matches,
        vec![
            utf8(rows, |r| Some(r.match_id.as_str())),
            utf8(rows, |r| r.data_version.as_deref()),
            utf8(rows, |r| r.match_type.as_deref()),
            int64(rows, |r| r.match_type_number),
            utf8(rows, |r| r.gender.as_deref()),
            utf8(rows, |r| r.team_type.as_deref()),
            int64(rows, |r| r.overs_per_side),
            int64(rows, |r| r.balls_per_over),
            utf8(rows, |r| r.venue.as_deref()),
            utf8(rows, |r| r.city.as_deref()),
            utf8(rows, |r| r.date_start.as_deref()),
            utf8(rows, |r| r.date_end.as_deref()),
            utf8(rows, |r| r.team1.as_deref()),
            utf8(rows, |r| r.team2.as_deref()),
            utf8(rows, |r| r.toss_winner.as_deref()),
            utf8(rows, |r| r.toss_decision.as_deref()),
            utf8(rows, |r| r.outcome_winner.as_deref()),
            utf8(rows, |r| r.outcome_result.as_deref()),
            utf8(rows, |r| r.outcome_method.as_deref()),
            int64(rows, |r| r.outcome_by_runs),
            int64(rows, |r| r.outcome_by_wickets),
            int64(rows, |r| r.outcome_by_innings),
            utf8(rows, |r| Some(r.player_of_match.as_str())),
            utf8(rows, |r| r.event_name.as_deref()),
            int64(rows, |r| r.event_match_number),
            utf8(rows, |r| r.event_group.as_deref()),
            utf8(rows, |r| r.event_stage.as_deref()),
            utf8(rows, |r| r.season.as_deref()),
        ],
    )
}

/// Convert innings rows to a RecordBatch
pub fn innings_batch(rows: &[InningsRow]) -> Result<RecordBatch> {
    build(
        Table::Innings,
        vec![
            utf8(rows, |r| Some(r.match_id.as_str())),
            int64(rows, |r| Some(r.innings_number)),
            utf8(rows, |r| r.batting_team.as_deref()),
            utf8(rows, |r| r.bowling_team.as_deref()),
            int64(rows, |r| r.target_runs),
            float64(rows, |r| r.target_overs),
            boolean(rows, |r| r.declared),
            boolean(rows, |r| r.forfeited),
            boolean(rows, |r| r.is_super_over),
        ],
    )
}

/// Convert delivery rows to a RecordBatch
pub fn deliveries_batch(rows: &[DeliveryRow]) -> Result<RecordBatch> {
    build(
        Table::Deliveries,
        vec![
            utf8(rows, |r| Some(r.match_id.as_str())),
            int64(rows, |r| Some(r.innings_number)),
            int64(rows, |r| Some(r.over_number)),
            int64(rows, |r| Some(r.ball_number)),
            utf8(rows, |r| r.batter.as_deref()),
            utf8(rows, |r| r.batter_id.as_deref()),
            utf8(rows, |r| r.bowler.as_deref()),
            utf8(rows, |r| r.bowler_id.as_deref()),
            utf8(rows, |r| r.non_striker.as_deref()),
            utf8(rows, |r| r.non_striker_id.as_deref()),
            int64(rows, |r| Some(r.runs_batter)),
            int64(rows, |r| Some(r.runs_extras)),
            int64(rows, |r| Some(r.runs_total)),
            boolean(rows, |r| r.runs_non_boundary),
            int64(rows, |r| Some(r.extras_wides)),
            int64(rows, |r| Some(r.extras_noballs)),
            int64(rows, |r| Some(r.extras_byes)),
            int64(rows, |r| Some(r.extras_legbyes)),
            int64(rows, |r| Some(r.extras_penalty)),
            boolean(rows, |r| r.is_wicket),
            utf8(rows, |r| r.wicket_kind.as_deref()),
            utf8(rows, |r| r.wicket_player_out.as_deref()),
            utf8(rows, |r| r.wicket_player_out_id.as_deref()),
            utf8(rows, |r| r.wicket_fielder1.as_deref()),
            utf8(rows, |r| r.wicket_fielder2.as_deref()),
            utf8(rows, |r| r.batting_team.as_deref()),
            utf8(rows, |r| r.bowling_team.as_deref()),
        ],
    )
}

/// Number of part files a table splits into for a chunk size.
///
/// An empty table still produces one (empty) part.
pub fn part_count(rows: usize, chunk_rows: usize) -> usize {
    rows.div_ceil(chunk_rows.max(1)).max(1)
}

/// Build the RecordBatch for one chunk of a table.
///
/// Chunk `part` covers rows `[part * chunk_rows, (part + 1) * chunk_rows)`.
pub fn table_chunk(
    tables: &TableSet,
    table: Table,
    part: usize,
    chunk_rows: usize,
) -> Result<RecordBatch> {
    fn slice<T>(rows: &[T], part: usize, chunk_rows: usize) -> &[T] {
        let start = (part * chunk_rows).min(rows.len());
        let end = start.saturating_add(chunk_rows).min(rows.len());
        &rows[start..end]
    }

    let chunk_rows = chunk_rows.max(1);
    match table {
        Table::Players => players_batch(slice(&tables.players, part, chunk_rows)),
        Table::Matches => matches_batch(slice(&tables.matches, part, chunk_rows)),
        Table::Innings => innings_batch(slice(&tables.innings, part, chunk_rows)),
        Table::Deliveries => deliveries_batch(slice(&tables.deliveries, part, chunk_rows)),
    }
}
