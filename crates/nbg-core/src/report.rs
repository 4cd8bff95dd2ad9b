//! Run report: everything needed to reproduce and judge a run.

use chrono::{DateTime, Utc};
use nbg_config::SamplerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::corpus::{Corpus, CorpusSummary};
use crate::label::Label;
use crate::sampler::{RunOutcome, SweepStats};

pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Final assignment of one test document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Position in the test file (after filtering).
    pub index: usize,
    /// Category tag as read from the input.
    pub category: String,
    pub truth: Option<Label>,
    pub label: Label,
    /// Post-burn-in sweeps that labeled the document One.
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: String,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Seed the run used; pass it back with `--seed` to reproduce.
    pub seed: u64,
    pub config: SamplerConfig,
    pub corpus: CorpusSummary,
    pub burn_in: usize,
    pub voting_sweeps: usize,
    pub sweeps: Vec<SweepStats>,
    pub documents: Vec<DocumentResult>,
    pub accuracy: f64,
    pub purity: f64,
}

impl RunReport {
    /// Assemble a report from a finished run. `config.seed` is replaced by
    /// the seed actually used.
    pub fn new(
        run_id: impl Into<String>,
        started_at: DateTime<Utc>,
        seed: u64,
        config: &SamplerConfig,
        corpus: &Corpus,
        outcome: RunOutcome,
    ) -> Self {
        let documents = corpus
            .test()
            .iter()
            .zip(outcome.labels.iter().zip(outcome.votes.iter()))
            .enumerate()
            .map(|(index, (doc, (&label, &votes)))| DocumentResult {
                index,
                category: doc.category.clone(),
                truth: doc.truth,
                label,
                votes,
            })
            .collect();

        let mut config = config.clone();
        config.seed = Some(seed);

        RunReport {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            run_id: run_id.into(),
            started_at,
            finished_at: Utc::now(),
            seed,
            config,
            corpus: corpus.summary(),
            burn_in: outcome.burn_in,
            voting_sweeps: outcome.voting_sweeps,
            sweeps: outcome.sweeps,
            documents,
            accuracy: outcome.accuracy,
            purity: outcome.purity,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Final labels in test order.
    pub fn labels(&self) -> Vec<Label> {
        self.documents.iter().map(|d| d.label).collect()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [c0, c1] = &self.corpus.categories;
        writeln!(f, "Run {} (seed {})", self.run_id, self.seed)?;
        writeln!(f, "Categories: {} (0) vs {} (1)", c0, c1)?;
        writeln!(
            f,
            "Training documents: {} ({} / {})",
            self.corpus.training_documents,
            self.corpus.training_per_class[0],
            self.corpus.training_per_class[1]
        )?;
        writeln!(
            f,
            "Test documents: {} ({} / {})",
            self.corpus.test_documents, self.corpus.test_per_class[0], self.corpus.test_per_class[1]
        )?;
        writeln!(f, "Vocabulary: {} terms", self.corpus.vocabulary_size)?;
        writeln!(
            f,
            "Sweeps: {} (burn-in {}, voting {})",
            self.sweeps.len(),
            self.burn_in,
            self.voting_sweeps
        )?;
        for s in &self.sweeps {
            writeln!(
                f,
                "  sweep {:>4}: {:>5} changes, accuracy {:.4}, log evidence {:.2}",
                s.sweep + 1,
                s.changes,
                s.accuracy,
                s.log_evidence
            )?;
        }
        writeln!(f, "Classification accuracy: {:.4}", self.accuracy)?;
        write!(f, "Purity: {:.4}", self.purity)
    }
}
