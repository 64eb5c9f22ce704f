//! Match document access
//!
//! A Cricsheet match document is a nested JSON object:
//!
//! ```text
//! {
//!   "meta":    { "data_version": ... },
//!   "info":    { "teams": [..], "dates": [..], "registry": { "people": {..} }, .. },
//!   "innings": [ { "team": .., "overs": [ { "over": 0, "deliveries": [..] } ] } ]
//! }
//! ```
//!
//! `MatchDocument` validates the top-level blocks once and exposes borrowed
//! views of them to the flatteners.

pub mod fields;

use crate::error::{Error, Result};
use crate::registry::DocumentRegistry;
use crate::types::{JsonObject, JsonValue};

/// Borrowed, structurally validated view of one match document
#[derive(Debug, Clone, Copy)]
pub struct MatchDocument<'a> {
    info: &'a JsonObject,
    meta: Option<&'a JsonObject>,
    innings: &'a [JsonValue],
}

impl<'a> MatchDocument<'a> {
    /// Validate the top-level shape of a parsed document.
    ///
    /// The root must be an object with an `info` object. `meta` and
    /// `innings` are optional but must have the right type when present.
    pub fn parse(root: &'a JsonValue) -> Result<Self> {
        let root = root
            .as_object()
            .ok_or_else(|| Error::wrong_type("<root>", "an object", fields::kind_of(root)))?;

        let info = fields::object(root, "info", "")?.ok_or_else(|| Error::missing_block("info"))?;
        let meta = fields::object(root, "meta", "")?;
        let innings = fields::array(root, "innings", "")?;

        Ok(Self {
            info,
            meta,
            innings,
        })
    }

    /// The `info` block
    pub fn info(&self) -> &'a JsonObject {
        self.info
    }

    /// The `meta` block, if present
    pub fn meta(&self) -> Option<&'a JsonObject> {
        self.meta
    }

    /// Raw innings entries, in document order
    pub fn innings(&self) -> &'a [JsonValue] {
        self.innings
    }

    /// Team names from `info.teams`
    pub fn teams(&self) -> Result<Vec<String>> {
        fields::string_list(self.info, "teams", "info")
    }

    /// The document-local player registry from `info.registry.people`
    pub fn registry(&self) -> Result<DocumentRegistry> {
        DocumentRegistry::from_info(self.info)
    }
}
