//! Synonym group lookup.
//!
//! The index stores synonym groups as group-id terms (`~0`, `~1`, ...) next
//! to the literal words, so expanding a query token only needs the ids of the
//! groups the token belongs to.

use ahash::AHashMap;

use crate::error::{RankError, Result};

/// Prefix of the canonical term that stands for a synonym group.
pub const SYNONYM_PREFIX: char = '~';

/// Read-only synonym capability of an index.
pub trait SynonymLookup: Send + Sync {
    /// Ids of the synonym groups containing `term`.
    fn group_ids(&self, term: &str) -> Option<&[u32]>;
}

/// Canonical term text of a synonym group id.
pub fn group_id_term(id: u32) -> String {
    format!("{SYNONYM_PREFIX}{id}")
}

/// In-memory synonym map with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    groups: AHashMap<String, Vec<u32>>,
    next_id: u32,
}

impl SynonymMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from synonym groups; group `i` receives id `i`.
    pub fn from_groups<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = SynonymMap::new();
        for group in groups {
            map.add_group(group);
        }
        map
    }

    /// Load synonym groups from a JSON file holding an array of string arrays.
    ///
    /// ```json
    /// [
    ///   ["boy", "child", "kid"],
    ///   ["girl", "child"]
    /// ]
    /// ```
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RankError::other(format!("Failed to read synonym file '{path}': {e}"))
        })?;

        let groups: Vec<Vec<String>> = serde_json::from_str(&content).map_err(|e| {
            RankError::invalid_argument(format!(
                "Failed to parse synonym groups JSON from '{path}': {e}"
            ))
        })?;

        Ok(Self::from_groups(groups))
    }

    /// Add a new group and return its id.
    pub fn add_group<G, S>(&mut self, terms: G) -> u32
    where
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.insert_terms(id, terms);
        id
    }

    /// Add terms to an existing group.
    pub fn update_group<G, S>(&mut self, id: u32, terms: G) -> Result<()>
    where
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if id >= self.next_id {
            return Err(RankError::not_found(format!("synonym group {id}")));
        }
        self.insert_terms(id, terms);
        Ok(())
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.next_id as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    fn insert_terms<G, S>(&mut self, id: u32, terms: G)
    where
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            let ids = self.groups.entry(term.as_ref().to_lowercase()).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
}

impl SynonymLookup for SynonymMap {
    fn group_ids(&self, term: &str) -> Option<&[u32]> {
        self.groups
            .get(term.to_lowercase().as_str())
            .map(|ids| ids.as_slice())
    }
}
