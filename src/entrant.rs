//! Entrants and the roster they are drawn from
//!
//! The roster owns the ordered list. The spin engine only ever sees an
//! immutable snapshot of it, taken when a spin starts.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Length of generated entrant ids
pub const ID_LENGTH: usize = 9;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A named entrant. Identity is `id`; names may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entrant {
    pub id: String,
    pub name: String,
}

impl Entrant {
    /// Build an entrant from raw text. Returns None if the trimmed name is empty.
    pub fn new(id: impl Into<String>, name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            name: name.to_string(),
        })
    }
}

/// Ordered, editable list of entrants
#[derive(Debug, Clone)]
pub struct Roster {
    entrants: Vec<Entrant>,
    id_rng: Pcg32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Roster {
    /// Create an empty roster; `seed` drives id generation
    pub fn new(seed: u64) -> Self {
        Self {
            entrants: Vec::new(),
            id_rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Mint a fresh base-36 id
    fn next_id(&mut self) -> String {
        let mut value = self.id_rng.next_u64();
        (0..ID_LENGTH)
            .map(|_| {
                let digit = (value % 36) as usize;
                value /= 36;
                ID_ALPHABET[digit] as char
            })
            .collect()
    }

    /// Add one entrant. Blank names are ignored.
    pub fn add(&mut self, name: &str) -> Option<&Entrant> {
        let id = self.next_id();
        let entrant = Entrant::new(id, name)?;
        self.entrants.push(entrant);
        self.entrants.last()
    }

    /// Add one entrant per non-blank line, returning how many were added
    pub fn add_lines(&mut self, raw: &str) -> usize {
        raw.lines()
            .filter(|line| self.add(line).is_some())
            .count()
    }

    /// Remove the entrant with `id`. Returns false if no such entrant exists.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entrants.len();
        self.entrants.retain(|e| e.id != id);
        self.entrants.len() != before
    }

    pub fn clear(&mut self) {
        self.entrants.clear();
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// Owned copy for the spin engine
    pub fn snapshot(&self) -> Vec<Entrant> {
        self.entrants.clone()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entrants.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entrant_trims_and_rejects_blank() {
        let entrant = Entrant::new("a", "  Ana \t").unwrap();
        assert_eq!(entrant.name, "Ana");
        assert!(Entrant::new("b", "   ").is_none());
        assert!(Entrant::new("c", "").is_none());
    }

    #[test]
    fn test_add_lines_skips_blanks() {
        let mut roster = Roster::new(1);
        let added = roster.add_lines("Ana\n\n  Bruno  \n   \nCarla\r\n");
        assert_eq!(added, 3);
        assert_eq!(roster.names().collect::<Vec<_>>(), vec!["Ana", "Bruno", "Carla"]);
    }

    #[test]
    fn test_ids_are_unique_and_well_formed() {
        let mut roster = Roster::new(99);
        for i in 0..200 {
            roster.add(&format!("Name {}", i));
        }
        let ids: HashSet<&str> = roster.entrants().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 200);
        assert!(roster
            .entrants()
            .iter()
            .all(|e| e.id.len() == ID_LENGTH && e.id.bytes().all(|b| ID_ALPHABET.contains(&b))));
    }

    #[test]
    fn test_duplicate_names_keep_distinct_identity() {
        let mut roster = Roster::new(5);
        roster.add_lines("Ana\nAna");
        let first = roster.entrants()[0].id.clone();
        assert!(roster.remove(&first));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.entrants()[0].name, "Ana");
        assert!(!roster.remove(&first));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut roster = Roster::new(3);
        roster.add_lines("Ana\nBruno");
        let snapshot = roster.snapshot();
        roster.clear();
        assert!(roster.is_empty());
        assert_eq!(snapshot.len(), 2);
    }
}
