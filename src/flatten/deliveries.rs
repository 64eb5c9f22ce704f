//! Ball-by-ball delivery flattening

use super::types::DeliveryRow;
use crate::document::fields;
use crate::error::Result;
use crate::registry::DocumentRegistry;
use crate::types::JsonObject;

/// Per-innings values shared by every delivery row
#[derive(Debug, Clone, Copy)]
pub struct InningsContext<'a> {
    pub match_id: &'a str,
    pub innings_number: i64,
    pub batting_team: Option<&'a str>,
    pub bowling_team: Option<&'a str>,
    pub registry: &'a DocumentRegistry,
}

/// Deliveries flattened from one innings
#[derive(Debug, Clone, Default)]
pub struct InningsDeliveries {
    pub rows: Vec<DeliveryRow>,
    /// Wickets beyond the first on any delivery
    pub extra_wickets_dropped: usize,
}

/// Flatten every delivery of a (non-forfeited) innings.
///
/// `ball_number` is the 1-based position in the over's delivery list, so
/// wides and no-balls advance it like any other entry.
pub fn flatten_deliveries(
    ctx: &InningsContext<'_>,
    innings: &JsonObject,
    path: &str,
) -> Result<InningsDeliveries> {
    let mut out = InningsDeliveries::default();

    for (over_idx, over) in fields::array(innings, "overs", path)?.iter().enumerate() {
        let over_path = format!("{path}.overs[{over_idx}]");
        let over = fields::element(over, || over_path.clone())?;
        let over_number = fields::integer(over, "over").unwrap_or(0);

        for (ball_idx, delivery) in fields::array(over, "deliveries", &over_path)?
            .iter()
            .enumerate()
        {
            let delivery_path = format!("{over_path}.deliveries[{ball_idx}]");
            let delivery = fields::element(delivery, || delivery_path.clone())?;

            let (row, extra) = flatten_delivery(
                ctx,
                over_number,
                ball_idx as i64 + 1,
                delivery,
                &delivery_path,
            )?;
            out.rows.push(row);
            out.extra_wickets_dropped += extra;
        }
    }

    Ok(out)
}

/// Flatten a single delivery entry.
///
/// Returns the row and the number of wickets that did not fit in it.
fn flatten_delivery(
    ctx: &InningsContext<'_>,
    over_number: i64,
    ball_number: i64,
    delivery: &JsonObject,
    path: &str,
) -> Result<(DeliveryRow, usize)> {
    let runs = fields::object(delivery, "runs", path)?;
    let extras = fields::object(delivery, "extras", path)?;
    let wickets = fields::array(delivery, "wickets", path)?;

    // Only the first wicket is represented; a second simultaneous dismissal
    // is counted by the caller and otherwise dropped.
    let wicket = match wickets.first() {
        Some(w) => Some(fields::element(w, || format!("{path}.wickets[0]"))?),
        None => None,
    };
    let fielders = match wicket {
        Some(w) => first_two_fielders(w, &format!("{path}.wickets[0]"))?,
        None => (None, None),
    };

    let batter = fields::text(delivery, "batter");
    let bowler = fields::text(delivery, "bowler");
    let non_striker = fields::text(delivery, "non_striker");
    let player_out = wicket.and_then(|w| fields::text(w, "player_out"));
    let registry = ctx.registry;

    let row = DeliveryRow {
        match_id: ctx.match_id.to_string(),
        innings_number: ctx.innings_number,
        over_number,
        ball_number,
        batter_id: registry.resolve(batter.as_deref()),
        batter,
        bowler_id: registry.resolve(bowler.as_deref()),
        bowler,
        non_striker_id: registry.resolve(non_striker.as_deref()),
        non_striker,
        runs_batter: fields::count(runs, "batter"),
        runs_extras: fields::count(runs, "extras"),
        runs_total: fields::count(runs, "total"),
        runs_non_boundary: runs.is_some_and(|r| fields::flag(r, "non_boundary")),
        extras_wides: fields::count(extras, "wides"),
        extras_noballs: fields::count(extras, "noballs"),
        extras_byes: fields::count(extras, "byes"),
        extras_legbyes: fields::count(extras, "legbyes"),
        extras_penalty: fields::count(extras, "penalty"),
        is_wicket: !wickets.is_empty(),
        wicket_kind: wicket.and_then(|w| fields::text(w, "kind")),
        wicket_player_out_id: registry.resolve(player_out.as_deref()),
        wicket_player_out: player_out,
        wicket_fielder1: fielders.0,
        wicket_fielder2: fielders.1,
        batting_team: ctx.batting_team.map(String::from),
        bowling_team: ctx.bowling_team.map(String::from),
    };

    Ok((row, wickets.len().saturating_sub(1)))
}

/// Names of the first two fielders on a wicket
fn first_two_fielders(
    wicket: &JsonObject,
    path: &str,
) -> Result<(Option<String>, Option<String>)> {
    let fielders = fields::array(wicket, "fielders", path)?;
    let mut names = fielders.iter().take(2).enumerate().map(|(idx, f)| {
        fields::element(f, || format!("{path}.fielders[{idx}]")).map(|f| fields::text(f, "name"))
    });

    let first = names.next().transpose()?.flatten();
    let second = names.next().transpose()?.flatten();
    Ok((first, second))
}
