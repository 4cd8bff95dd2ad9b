//! Per-document sparse term counts.

use std::collections::BTreeMap;

use crate::label::Label;

/// Sparse `term index → count` map of one document, sorted by term index.
///
/// Built once at load time; the fixed order keeps floating-point sums in the
/// sampler reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocIndex {
    entries: Vec<(usize, u32)>,
}

impl DocIndex {
    /// Count occurrences of each term index.
    pub fn from_term_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for index in indices {
            *counts.entry(index).or_insert(0) += 1;
        }
        Self {
            entries: counts.into_iter().collect(),
        }
    }

    /// `(term index, count)` pairs in ascending term order. Counts are ≥ 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of tokens.
    pub fn token_count(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64).sum()
    }

    /// Count for a single term (0 if absent).
    pub fn count(&self, term: usize) -> u32 {
        self.entries
            .binary_search_by_key(&term, |&(t, _)| t)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }
}

/// One loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Raw category tag from the input line.
    pub category: String,
    /// Held-out or training label; None when the tag is not a selected category.
    pub truth: Option<Label>,
    pub index: DocIndex,
}
