//! Sufficient statistics of the collapsed sampler.
//!
//! `word_count[c][t]` is the number of occurrences of term `t` across every
//! document currently labeled `c`, and `class_count` the number of such
//! documents. Both are kept in step with label changes through
//! [`SufficientStats::evict`] and [`SufficientStats::admit`] only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::corpus::DocIndex;
use crate::label::Label;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("term index {term} out of range for vocabulary of {vocab_size} terms")]
    TermOutOfRange { term: usize, vocab_size: usize },

    #[error("evicting from class {label} would drive a count below zero")]
    Underflow { label: Label },
}

/// Number of documents currently assigned to each class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub class0: usize,
    pub class1: usize,
}

impl ClassCounts {
    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Zero => self.class0,
            Label::One => self.class1,
        }
    }

    fn get_mut(&mut self, label: Label) -> &mut usize {
        match label {
            Label::Zero => &mut self.class0,
            Label::One => &mut self.class1,
        }
    }

    pub fn total(&self) -> usize {
        self.class0 + self.class1
    }
}

/// Per-class word counts and document counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SufficientStats {
    word_count: [Vec<u64>; 2],
    class_count: ClassCounts,
}

impl SufficientStats {
    /// Empty statistics over a vocabulary of `vocab_size` terms.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            word_count: [vec![0; vocab_size], vec![0; vocab_size]],
            class_count: ClassCounts::default(),
        }
    }

    /// Admit every document once under its label.
    pub fn populate<'a, I>(vocab_size: usize, docs: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = (&'a DocIndex, Label)>,
    {
        let mut stats = Self::new(vocab_size);
        for (doc, label) in docs {
            stats.admit(doc, label)?;
        }
        Ok(stats)
    }

    pub fn vocab_size(&self) -> usize {
        self.word_count[0].len()
    }

    pub fn class_counts(&self) -> ClassCounts {
        self.class_count
    }

    pub fn word_counts(&self, label: Label) -> &[u64] {
        &self.word_count[label.index()]
    }

    /// Remove a document's contribution from `label`. Call with the
    /// document's current label, right before resampling it.
    pub fn evict(&mut self, doc: &DocIndex, label: Label) -> Result<(), StatsError> {
        let counts = &mut self.word_count[label.index()];
        // Validate the whole document first so a failure leaves the store untouched.
        for (term, n) in doc.iter() {
            match counts.get(term) {
                None => {
                    return Err(StatsError::TermOutOfRange {
                        term,
                        vocab_size: counts.len(),
                    })
                }
                Some(&have) if have < n as u64 => return Err(StatsError::Underflow { label }),
                Some(_) => {}
            }
        }
        let docs = self.class_count.get_mut(label);
        if *docs == 0 {
            return Err(StatsError::Underflow { label });
        }
        *docs -= 1;
        for (term, n) in doc.iter() {
            counts[term] -= n as u64;
        }
        Ok(())
    }

    /// Add a document's contribution to `label`. Call with the newly chosen
    /// label, right after resampling.
    pub fn admit(&mut self, doc: &DocIndex, label: Label) -> Result<(), StatsError> {
        let counts = &mut self.word_count[label.index()];
        if let Some((term, _)) = doc.iter().find(|&(term, _)| term >= counts.len()) {
            return Err(StatsError::TermOutOfRange {
                term,
                vocab_size: counts.len(),
            });
        }
        for (term, n) in doc.iter() {
            counts[term] += n as u64;
        }
        *self.class_count.get_mut(label) += 1;
        Ok(())
    }
}
