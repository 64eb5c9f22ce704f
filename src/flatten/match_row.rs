//! Match metadata flattening

use super::types::MatchRow;
use crate::document::{fields, MatchDocument};
use crate::error::Result;

/// Overs are six balls unless the document says otherwise
const DEFAULT_BALLS_PER_OVER: i64 = 6;

/// Build the single `matches` row for a document.
///
/// Missing fields become null; `player_of_match` becomes an empty string.
/// Only wrong-typed blocks (e.g. `outcome` that is not an object) fail.
pub fn flatten_match(
    match_id: &str,
    doc: &MatchDocument<'_>,
    teams: &[String],
) -> Result<MatchRow> {
    let info = doc.info();

    let toss = fields::object(info, "toss", "info")?;
    let outcome = fields::object(info, "outcome", "info")?;
    let outcome_by = match outcome {
        Some(o) => fields::object(o, "by", "info.outcome")?,
        None => None,
    };
    let event = fields::object(info, "event", "info")?;
    let dates = fields::string_list(info, "dates", "info")?;
    let player_of_match = fields::string_list(info, "player_of_match", "info")?;

    Ok(MatchRow {
        match_id: match_id.to_string(),
        data_version: doc.meta().and_then(|m| fields::stringified(m, "data_version")),
        match_type: fields::text(info, "match_type"),
        match_type_number: fields::integer(info, "match_type_number"),
        gender: fields::text(info, "gender"),
        team_type: fields::text(info, "team_type"),
        overs_per_side: fields::integer(info, "overs"),
        balls_per_over: Some(
            fields::integer(info, "balls_per_over").unwrap_or(DEFAULT_BALLS_PER_OVER),
        ),
        venue: fields::text(info, "venue"),
        city: fields::text(info, "city"),
        date_start: dates.first().cloned(),
        date_end: dates.last().cloned(),
        team1: teams.first().cloned(),
        team2: teams.get(1).cloned(),
        toss_winner: toss.and_then(|t| fields::text(t, "winner")),
        toss_decision: toss.and_then(|t| fields::text(t, "decision")),
        outcome_winner: outcome.and_then(|o| fields::text(o, "winner")),
        outcome_result: outcome.and_then(|o| fields::text(o, "result")),
        outcome_method: outcome.and_then(|o| fields::text(o, "method")),
        outcome_by_runs: outcome_by.and_then(|b| fields::integer(b, "runs")),
        outcome_by_wickets: outcome_by.and_then(|b| fields::integer(b, "wickets")),
        outcome_by_innings: outcome_by.and_then(|b| fields::integer(b, "innings")),
        player_of_match: player_of_match.join(","),
        event_name: event.and_then(|e| fields::text(e, "name")),
        event_match_number: event.and_then(|e| fields::integer(e, "match_number")),
        event_group: event.and_then(|e| fields::stringified(e, "group")),
        event_stage: event.and_then(|e| fields::text(e, "stage")),
        season: fields::stringified(info, "season"),
    })
}
