//! Player registries
//!
//! Every match document carries its own `info.registry.people` object mapping
//! display names to stable Cricsheet identifiers. `DocumentRegistry` holds
//! that local mapping and resolves names while a document is flattened.
//! `PlayerRegistry` is the global identifier -> name table accumulated across
//! the whole batch with [`merge`].

use crate::document::fields;
use crate::error::{Error, Result};
use crate::flatten::PlayerRow;
use crate::types::JsonObject;
use indexmap::IndexMap;

// ============================================================================
// Document Registry
// ============================================================================

/// Name -> identifier mapping local to one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRegistry {
    people: IndexMap<String, String>,
}

impl DocumentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from (name, identifier) pairs
    pub fn from_pairs<I, N, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        let mut people = IndexMap::new();
        for (name, id) in pairs {
            people.entry(name.into()).or_insert_with(|| id.into());
        }
        Self { people }
    }

    /// Read `registry.people` from a document's `info` block.
    ///
    /// An absent registry is empty. Identifiers must be strings.
    pub fn from_info(info: &JsonObject) -> Result<Self> {
        let Some(registry) = fields::object(info, "registry", "info")? else {
            return Ok(Self::new());
        };
        let Some(people) = fields::object(registry, "people", "info.registry")? else {
            return Ok(Self::new());
        };

        let mut resolved = IndexMap::with_capacity(people.len());
        for (name, id) in people {
            let id = id.as_str().ok_or_else(|| {
                Error::wrong_type(
                    format!("info.registry.people.{name}"),
                    "a string",
                    fields::kind_of(id),
                )
            })?;
            resolved.insert(name.clone(), id.to_string());
        }

        Ok(Self { people: resolved })
    }

    /// Resolve a display name to its identifier
    pub fn resolve(&self, name: Option<&str>) -> Option<String> {
        name.and_then(|n| self.people.get(n)).cloned()
    }

    /// Number of names in the registry
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Iterate over (name, identifier) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.people.iter().map(|(n, id)| (n.as_str(), id.as_str()))
    }
}

// ============================================================================
// Global Player Registry
// ============================================================================

/// Identifier -> display name mapping accumulated across documents.
///
/// Insertion order is preserved, so the players table lists players in the
/// order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRegistry {
    players: IndexMap<String, String>,
}

impl PlayerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored display name for an identifier
    pub fn name(&self, id: &str) -> Option<&str> {
        self.players.get(id).map(String::as_str)
    }

    /// Number of distinct players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are known
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Add unseen identifiers from a document registry.
    ///
    /// Returns the number of new players.
    pub fn absorb(&mut self, local: &DocumentRegistry) -> usize {
        let before = self.players.len();
        for (name, id) in local.iter() {
            self.players
                .entry(id.to_string())
                .or_insert_with(|| name.to_string());
        }
        self.players.len() - before
    }

    /// Players table rows, in first-seen order
    pub fn to_rows(&self) -> Vec<PlayerRow> {
        self.players
            .iter()
            .map(|(id, name)| PlayerRow::new(id, name))
            .collect()
    }
}

/// Merge a document registry into the global state, first write wins.
pub fn merge(mut state: PlayerRegistry, local: &DocumentRegistry) -> PlayerRegistry {
    state.absorb(local);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry(pairs: &[(&str, &str)]) -> DocumentRegistry {
        DocumentRegistry::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_merge_first_write_wins() {
        let a = registry(&[("Smith", "id1")]);
        let b = registry(&[("J Smith", "id1")]);

        let forward = merge(merge(PlayerRegistry::new(), &a), &b);
        assert_eq!(forward.name("id1"), Some("Smith"));
        assert_eq!(forward.len(), 1);

        let reverse = merge(merge(PlayerRegistry::new(), &b), &a);
        assert_eq!(reverse.name("id1"), Some("J Smith"));
    }

    #[test]
    fn test_merge_distinct_ids_order_independent() {
        let a = registry(&[("Smith", "id1")]);
        let b = registry(&[("Jones", "id2")]);

        let forward = merge(merge(PlayerRegistry::new(), &a), &b);
        let reverse = merge(merge(PlayerRegistry::new(), &b), &a);
        assert_eq!(forward.name("id1"), reverse.name("id1"));
        assert_eq!(forward.name("id2"), reverse.name("id2"));
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_merge_idempotent() {
        let a = registry(&[("Smith", "id1"), ("Jones", "id2")]);
        let once = merge(PlayerRegistry::new(), &a);
        let twice = merge(once.clone(), &a);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut state = PlayerRegistry::new();
        assert_eq!(state.absorb(&DocumentRegistry::new()), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_absorb_counts_new_players() {
        let mut state = PlayerRegistry::new();
        assert_eq!(state.absorb(&registry(&[("A", "1"), ("B", "2")])), 2);
        assert_eq!(state.absorb(&registry(&[("A2", "1"), ("C", "3")])), 1);
        let rows = state.to_rows();
        let ids: Vec<&str> = rows.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(rows[0].player_name, "A");
        assert!(rows[0].country.is_none());
    }

    #[test]
    fn test_from_info() {
        let info = json!({"registry": {"people": {"V Kohli": "ba607b88", "MS Dhoni": "4a8a2e3b"}}});
        let local = DocumentRegistry::from_info(info.as_object().unwrap()).unwrap();
        assert_eq!(local.len(), 2);
        assert_eq!(local.resolve(Some("V Kohli")), Some("ba607b88".to_string()));
        assert_eq!(local.resolve(Some("Unknown")), None);
        assert_eq!(local.resolve(None), None);
        let names: Vec<&str> = local.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["V Kohli", "MS Dhoni"]);
    }

    #[test]
    fn test_from_info_absent_registry() {
        let info = json!({"teams": ["A", "B"]});
        let local = DocumentRegistry::from_info(info.as_object().unwrap()).unwrap();
        assert!(local.is_empty());
    }

    #[test]
    fn test_from_info_rejects_non_string_id() {
        let info = json!({"registry": {"people": {"X": 12}}});
        let err = DocumentRegistry::from_info(info.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, Error::WrongType { .. }));
    }
}
