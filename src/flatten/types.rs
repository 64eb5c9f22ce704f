//! Row types for the four output tables

use crate::registry::DocumentRegistry;
use serde::{Deserialize, Serialize};

/// One row of the `players` table.
///
/// Only the identifier and name are known at ingest time; the remaining
/// columns are filled by a later enrichment step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerRow {
    pub player_id: String,
    pub player_name: String,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub playing_role: Option<String>,
    pub country: Option<String>,
}

impl PlayerRow {
    /// Create a row with enrichment columns unset
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: id.into(),
            player_name: name.into(),
            ..Default::default()
        }
    }
}

/// One row of the `matches` table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchRow {
    pub match_id: String,
    pub data_version: Option<String>,
    pub match_type: Option<String>,
    pub match_type_number: Option<i64>,
    pub gender: Option<String>,
    pub team_type: Option<String>,
    pub overs_per_side: Option<i64>,
    pub balls_per_over: Option<i64>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<String>,
    pub outcome_winner: Option<String>,
    pub outcome_result: Option<String>,
    pub outcome_method: Option<String>,
    pub outcome_by_runs: Option<i64>,
    pub outcome_by_wickets: Option<i64>,
    pub outcome_by_innings: Option<i64>,
    pub player_of_match: String,
    pub event_name: Option<String>,
    pub event_match_number: Option<i64>,
    pub event_group: Option<String>,
    pub event_stage: Option<String>,
    pub season: Option<String>,
}

/// One row of the `innings` table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InningsRow {
    pub match_id: String,
    pub innings_number: i64,
    pub batting_team: Option<String>,
    pub bowling_team: Option<String>,
    pub target_runs: Option<i64>,
    pub target_overs: Option<f64>,
    pub declared: bool,
    pub forfeited: bool,
    pub is_super_over: bool,
}

/// One row of the `deliveries` table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryRow {
    pub match_id: String,
    pub innings_number: i64,
    pub over_number: i64,
    pub ball_number: i64,
    pub batter: Option<String>,
    pub batter_id: Option<String>,
    pub bowler: Option<String>,
    pub bowler_id: Option<String>,
    pub non_striker: Option<String>,
    pub non_striker_id: Option<String>,
    pub runs_batter: i64,
    pub runs_extras: i64,
    pub runs_total: i64,
    pub runs_non_boundary: bool,
    pub extras_wides: i64,
    pub extras_noballs: i64,
    pub extras_byes: i64,
    pub extras_legbyes: i64,
    pub extras_penalty: i64,
    pub is_wicket: bool,
    pub wicket_kind: Option<String>,
    pub wicket_player_out: Option<String>,
    pub wicket_player_out_id: Option<String>,
    pub wicket_fielder1: Option<String>,
    pub wicket_fielder2: Option<String>,
    pub batting_team: Option<String>,
    pub bowling_team: Option<String>,
}

/// Everything produced from a single document.
///
/// Rows are only committed to the batch once the whole document flattened
/// without error.
#[derive(Debug, Clone, Default)]
pub struct FlattenedDocument {
    /// The match row
    pub match_row: MatchRow,
    /// Innings rows, in document order
    pub innings: Vec<InningsRow>,
    /// Delivery rows, in (innings, over, ball) order
    pub deliveries: Vec<DeliveryRow>,
    /// The document's own player registry
    pub registry: DocumentRegistry,
    /// Wickets beyond the first on a delivery, which are not represented
    pub extra_wickets_dropped: usize,
}
