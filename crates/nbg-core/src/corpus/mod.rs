//! Labeled training + held-out test corpus for a sampling run.
//!
//! A line is a category tag followed by whitespace-separated terms. Only
//! lines tagged with one of the two selected categories enter the corpus;
//! everything else is skipped. The vocabulary grows while the corpus is
//! built and is frozen once [`CorpusBuilder::build`] returns.

pub mod document;
pub mod loader;
pub mod vocabulary;

pub use document::{DocIndex, Document};
pub use loader::{load_corpus, read_lines};
pub use vocabulary::{VocabEntry, Vocabulary};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::label::Label;

pub use nbg_config::UNKNOWN_CATEGORY;

/// Errors raised while building or querying a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("category '{category}' has no documents in training or test data")]
    MissingCategory { category: String },

    #[error("no test documents for categories '{0}' and '{1}'")]
    NoTestDocuments(String, String),
}

/// Which half of the corpus a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Training,
    Test,
}

/// Split a raw line into its category tag and terms.
///
/// Tabs count as whitespace and empty tokens are dropped. Returns None for
/// blank lines.
pub fn tokenize(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let tag = tokens.next()?;
    Some((tag, tokens.collect()))
}

/// Incrementally assembles a [`Corpus`].
#[derive(Debug)]
pub struct CorpusBuilder {
    categories: [String; 2],
    vocabulary: Vocabulary,
    training: Vec<Document>,
    test: Vec<Document>,
    skipped_lines: usize,
}

impl CorpusBuilder {
    pub fn new(categories: [String; 2]) -> Self {
        Self {
            categories,
            vocabulary: Vocabulary::new(),
            training: Vec::new(),
            test: Vec::new(),
            skipped_lines: 0,
        }
    }

    /// Label of a category tag under the selected pair.
    pub fn label_of(&self, category: &str) -> Option<Label> {
        self.categories
            .iter()
            .position(|c| c == category)
            .and_then(Label::from_index)
    }

    /// Add one raw input line. Returns false when the line was skipped.
    ///
    /// Test lines tagged [`UNKNOWN_CATEGORY`] are kept without truth unless
    /// that tag is one of the selected pair.
    pub fn push_line(&mut self, split: Split, line: &str) -> bool {
        match tokenize(line) {
            Some((tag, terms))
                if split == Split::Test
                    && tag == UNKNOWN_CATEGORY
                    && self.label_of(tag).is_none() =>
            {
                self.push_unlabeled(&terms);
                true
            }
            Some((tag, terms)) => self.push_document(split, tag, &terms),
            None => {
                self.skipped_lines += 1;
                false
            }
        }
    }

    /// Add an already tokenized document. Returns false when its category is
    /// not one of the selected pair.
    pub fn push_document(&mut self, split: Split, category: &str, terms: &[&str]) -> bool {
        let Some(label) = self.label_of(category) else {
            self.skipped_lines += 1;
            return false;
        };
        let doc = self.make_document(category, Some(label), terms);
        match split {
            Split::Training => self.training.push(doc),
            Split::Test => self.test.push(doc),
        }
        true
    }

    /// Add a test document whose true category is unknown.
    pub fn push_unlabeled(&mut self, terms: &[&str]) {
        let doc = self.make_document(UNKNOWN_CATEGORY, None, terms);
        self.test.push(doc);
    }

    fn make_document(&mut self, category: &str, truth: Option<Label>, terms: &[&str]) -> Document {
        let indices: Vec<usize> = terms.iter().map(|t| self.vocabulary.observe(t)).collect();
        Document {
            category: category.to_string(),
            truth,
            index: DocIndex::from_term_indices(indices),
        }
    }

    /// Freeze the corpus.
    ///
    /// Fails when either selected category is absent from both halves, or
    /// when there is nothing to sample.
    pub fn build(self) -> Result<Corpus, CorpusError> {
        for (i, category) in self.categories.iter().enumerate() {
            let present = self
                .training
                .iter()
                .chain(self.test.iter())
                .any(|d| d.truth.map(Label::index) == Some(i));
            if !present {
                return Err(CorpusError::MissingCategory {
                    category: category.clone(),
                });
            }
        }
        if self.test.is_empty() {
            let [a, b] = self.categories;
            return Err(CorpusError::NoTestDocuments(a, b));
        }
        Ok(Corpus {
            categories: self.categories,
            vocabulary: self.vocabulary,
            training: self.training,
            test: self.test,
            skipped_lines: self.skipped_lines,
        })
    }
}

/// Immutable corpus: vocabulary plus training and test documents.
#[derive(Debug, Clone)]
pub struct Corpus {
    categories: [String; 2],
    vocabulary: Vocabulary,
    training: Vec<Document>,
    test: Vec<Document>,
    skipped_lines: usize,
}

impl Corpus {
    pub fn categories(&self) -> &[String; 2] {
        &self.categories
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn training(&self) -> &[Document] {
        &self.training
    }

    pub fn test(&self) -> &[Document] {
        &self.test
    }

    /// Total number of documents (N = training + test).
    pub fn len(&self) -> usize {
        self.training.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Held-out truth of every test document, in test order.
    pub fn test_truth(&self) -> Vec<Option<Label>> {
        self.test.iter().map(|d| d.truth).collect()
    }

    pub fn summary(&self) -> CorpusSummary {
        let per_class = |docs: &[Document]| {
            let mut counts = [0usize; 2];
            for label in docs.iter().filter_map(|d| d.truth) {
                counts[label.index()] += 1;
            }
            counts
        };
        CorpusSummary {
            categories: self.categories.clone(),
            vocabulary_size: self.vocabulary.len(),
            training_documents: self.training.len(),
            test_documents: self.test.len(),
            training_per_class: per_class(&self.training),
            test_per_class: per_class(&self.test),
            skipped_lines: self.skipped_lines,
        }
    }
}

/// Corpus statistics reported alongside a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub categories: [String; 2],
    pub vocabulary_size: usize,
    pub training_documents: usize,
    pub test_documents: usize,
    pub training_per_class: [usize; 2],
    pub test_per_class: [usize; 2],
    pub skipped_lines: usize,
}
