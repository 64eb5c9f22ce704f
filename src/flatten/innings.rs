//! Innings flattening

use super::types::InningsRow;
use crate::document::fields;
use crate::error::Result;
use crate::types::JsonObject;

/// The fielding side for an innings.
///
/// Only defined when the match has exactly two teams and the batting team is
/// one of them.
pub fn bowling_team(batting_team: Option<&str>, teams: &[String]) -> Option<String> {
    let batting = batting_team?;
    match teams {
        [first, second] if batting == first.as_str() => Some(second.clone()),
        [first, second] if batting == second.as_str() => Some(first.clone()),
        _ => None,
    }
}

/// Build the `innings` row for one innings entry
pub fn flatten_innings(
    match_id: &str,
    innings_number: i64,
    innings: &JsonObject,
    teams: &[String],
    path: &str,
) -> Result<InningsRow> {
    let batting_team = fields::text(innings, "team");
    let target = fields::object(innings, "target", path)?;

    Ok(InningsRow {
        match_id: match_id.to_string(),
        innings_number,
        bowling_team: bowling_team(batting_team.as_deref(), teams),
        batting_team,
        target_runs: target.and_then(|t| fields::integer(t, "runs")),
        target_overs: target.and_then(|t| fields::number(t, "overs")),
        declared: fields::flag(innings, "declared"),
        forfeited: fields::flag(innings, "forfeited"),
        is_super_over: fields::flag(innings, "super_over"),
    })
}
