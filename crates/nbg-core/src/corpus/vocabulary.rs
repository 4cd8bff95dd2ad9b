//! Term vocabulary shared by every document of a run.

use std::collections::HashMap;

/// Dense index and corpus-wide frequency of one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry {
    pub index: usize,
    pub frequency: u64,
}

/// Mapping from term to [`VocabEntry`], with indices dense in `0..len()`
/// assigned in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: HashMap<String, VocabEntry>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct terms (V).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Record one occurrence of `term`, inserting it if new. Returns its index.
    pub fn observe(&mut self, term: &str) -> usize {
        if let Some(entry) = self.entries.get_mut(term) {
            entry.frequency += 1;
            return entry.index;
        }
        let index = self.terms.len();
        self.terms.push(term.to_string());
        self.entries.insert(
            term.to_string(),
            VocabEntry {
                index,
                frequency: 1,
            },
        );
        index
    }

    pub fn get(&self, term: &str) -> Option<&VocabEntry> {
        self.entries.get(term)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.entries.get(term).map(|e| e.index)
    }

    /// Reverse lookup.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Terms in index order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}
