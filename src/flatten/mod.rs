//! Document flattening
//!
//! Turns one nested match document into rows for the `matches`, `innings`
//! and `deliveries` tables, plus the document's player registry.
//!
//! # Overview
//!
//! - `flatten_match` - exactly one match row per document
//! - `flatten_innings` - one row per innings entry, numbered from 1
//! - `flatten_deliveries` - one row per delivery entry of a non-forfeited innings
//! - `flatten_document` - all of the above for a parsed document
//!
//! Flattening is pure: nothing outside the returned `FlattenedDocument` is
//! touched, so a failing document leaves no partial rows behind.

mod deliveries;
mod innings;
mod match_row;
mod types;

pub use deliveries::{flatten_deliveries, InningsContext, InningsDeliveries};
pub use innings::{bowling_team, flatten_innings};
pub use match_row::flatten_match;
pub use types::{DeliveryRow, FlattenedDocument, InningsRow, MatchRow, PlayerRow};

use crate::document::{fields, MatchDocument};
use crate::error::Result;
use crate::types::JsonValue;

/// Flatten a parsed match document
pub fn flatten_document(match_id: &str, root: &JsonValue) -> Result<FlattenedDocument> {
    let doc = MatchDocument::parse(root)?;
    let registry = doc.registry()?;
    let teams = doc.teams()?;

    let match_row = flatten_match(match_id, &doc, &teams)?;

    let mut innings_rows = Vec::with_capacity(doc.innings().len());
    let mut delivery_rows = Vec::new();
    let mut extra_wickets_dropped = 0;

    for (idx, entry) in doc.innings().iter().enumerate() {
        let path = format!("innings[{idx}]");
        let innings = fields::element(entry, || path.clone())?;
        let row = flatten_innings(match_id, idx as i64 + 1, innings, &teams, &path)?;

        if !row.forfeited {
            let ctx = InningsContext {
                match_id,
                innings_number: row.innings_number,
                batting_team: row.batting_team.as_deref(),
                bowling_team: row.bowling_team.as_deref(),
                registry: &registry,
            };
            let flattened = flatten_deliveries(&ctx, innings, &path)?;
            delivery_rows.extend(flattened.rows);
            extra_wickets_dropped += flattened.extra_wickets_dropped;
        }

        innings_rows.push(row);
    }

    Ok(FlattenedDocument {
        match_row,
        innings: innings_rows,
        deliveries: delivery_rows,
        registry,
        extra_wickets_dropped,
    })
}

/// Parse and flatten a document from its JSON text
pub fn flatten_str(match_id: &str, text: &str) -> Result<FlattenedDocument> {
    let root: JsonValue = serde_json::from_str(text)?;
    flatten_document(match_id, &root)
}
