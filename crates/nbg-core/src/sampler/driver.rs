//! Sweep loop over the test documents.

use nbg_config::{InitStrategy, SamplerConfig};
use nbg_math::dirichlet::{self, DirichletParams};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::posterior::{self, ClassLogProbs};
use super::resample::{resample_label, Decision};
use super::stats::{ClassCounts, StatsError, SufficientStats};
use super::theta::Theta;
use super::vote::VoteAccumulator;
use super::SamplerError;
use crate::corpus::{Corpus, DocIndex};
use crate::evaluate;
use crate::events::{event_names as progress_events, Phase, ProgressEmitter, ProgressEvent};
use crate::label::Label;
use crate::logging::{event_names, Stage};

/// Diagnostics of one completed sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepStats {
    /// 0-based sweep index.
    pub sweep: usize,
    /// Test documents whose label changed during the sweep.
    pub changes: usize,
    /// Current labels scored against held-out truth.
    pub accuracy: f64,
    /// Documents per class (training + test) at the end of the sweep.
    pub class_counts: ClassCounts,
    /// `Σ_c ln p(word_count[c] | Dirichlet(hyper_multi))`.
    pub log_evidence: f64,
    /// Whether the sweep's labels entered the vote.
    pub voted: bool,
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Majority-vote label per test document, in corpus order.
    pub labels: Vec<Label>,
    /// Post-burn-in sweeps in which each document was labeled One.
    pub votes: Vec<u32>,
    pub burn_in: usize,
    pub voting_sweeps: usize,
    pub sweeps: Vec<SweepStats>,
    pub accuracy: f64,
    pub purity: f64,
}

/// Collapsed Gibbs sampler bound to one corpus.
pub struct GibbsSampler<'c, R: Rng> {
    corpus: &'c Corpus,
    sweeps: usize,
    hyper_gamma: [f64; 2],
    audit: bool,
    prior: DirichletParams,
    truth: Vec<Option<Label>>,
    labels: Vec<Label>,
    stats: SufficientStats,
    theta: Theta,
    votes: VoteAccumulator,
    history: Vec<SweepStats>,
    rng: R,
    emitter: Option<Arc<dyn ProgressEmitter>>,
}

impl<'c, R: Rng> GibbsSampler<'c, R> {
    /// Seed the test labels, count every document under its label and draw
    /// the initial theta from the prior.
    pub fn new(corpus: &'c Corpus, config: &SamplerConfig, mut rng: R) -> Result<Self, SamplerError> {
        if config.sweeps == 0 {
            return Err(SamplerError::NoSweeps);
        }
        let vocab_size = corpus.vocabulary().len();
        let hyper_multi = config.hyperparameters.hyper_multi;
        let prior = DirichletParams::symmetric(vocab_size, hyper_multi)
            .ok_or(SamplerError::InvalidPrior {
                hyper_multi,
                vocab_size,
            })?;

        let truth = corpus.test_truth();
        let labels: Vec<Label> = truth
            .iter()
            .map(|t| match (config.init, t) {
                (InitStrategy::GroundTruth, Some(label)) => *label,
                _ => Label::from(rng.random::<bool>()),
            })
            .collect();

        let stats = count_all(corpus, &labels)?;
        let theta = Theta::from_prior(&prior, &mut rng)?;

        tracing::debug!(
            event = event_names::SAMPLE_STARTED,
            stage = %Stage::Sample,
            init = %config.init,
            vocab_size,
            test_documents = labels.len(),
            class0 = stats.class_counts().class0,
            class1 = stats.class_counts().class1,
            "sampler initialized"
        );

        Ok(Self {
            corpus,
            sweeps: config.sweeps,
            hyper_gamma: config.hyperparameters.hyper_gamma,
            audit: config.audit,
            prior,
            votes: VoteAccumulator::new(labels.len(), config.sweeps),
            truth,
            labels,
            stats,
            theta,
            history: Vec::with_capacity(config.sweeps),
            rng,
            emitter: None,
        })
    }

    /// Report per-sweep progress to `emitter`.
    pub fn with_emitter(mut self, emitter: Arc<dyn ProgressEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Current label of every test document.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn stats(&self) -> &SufficientStats {
        &self.stats
    }

    pub fn theta(&self) -> &Theta {
        &self.theta
    }

    pub fn votes(&self) -> &VoteAccumulator {
        &self.votes
    }

    pub fn history(&self) -> &[SweepStats] {
        &self.history
    }

    /// Sweeps completed so far.
    pub fn completed(&self) -> usize {
        self.history.len()
    }

    /// Statistics counted from scratch from the current labels.
    pub fn recount(&self) -> Result<SufficientStats, StatsError> {
        count_all(self.corpus, &self.labels)
    }

    /// One full pass over the test documents, followed by the theta redraw
    /// and vote recording.
    pub fn sweep(&mut self) -> Result<SweepStats, SamplerError> {
        let sweep = self.completed();
        if sweep >= self.sweeps {
            return Err(SamplerError::SweepsExhausted {
                sweeps: self.sweeps,
            });
        }
        let corpus = self.corpus;
        let n_docs = corpus.len();
        let mut changes = 0;

        for (j, doc) in corpus.test().iter().enumerate() {
            let old = self.labels[j];
            self.stats.evict(&doc.index, old)?;
            let (probs, decision) = match self.draw_label(&doc.index, n_docs) {
                Ok(drawn) => drawn,
                Err(err) => {
                    // Leave the statistics as they were before this document.
                    self.stats.admit(&doc.index, old)?;
                    return Err(err);
                }
            };
            let new = decision.label();
            self.stats.admit(&doc.index, new)?;

            tracing::trace!(
                event = event_names::SAMPLE_DOC,
                sweep,
                doc = j,
                log_ratio = probs.log_ratio(),
                prob_one = probs.prob_one(),
                clipped = matches!(decision, Decision::Clipped(_)),
                label = %new,
                "document resampled"
            );
            if new != old {
                self.labels[j] = new;
                changes += 1;
            }
        }

        self.theta = Theta::from_posterior(&self.prior, &self.stats, &mut self.rng)?;
        let voted = self.votes.record(sweep, &self.labels);

        if self.audit {
            let recounted = self.recount()?;
            if recounted != self.stats {
                tracing::error!(
                    event = event_names::SAMPLE_AUDIT_FAILED,
                    stage = %Stage::Sample,
                    sweep,
                    "incremental statistics diverged from recount"
                );
                return Err(SamplerError::InconsistentStats { sweep });
            }
        }

        let stats = SweepStats {
            sweep,
            changes,
            accuracy: evaluate::accuracy(&self.labels, &self.truth),
            class_counts: self.stats.class_counts(),
            log_evidence: self.log_evidence(),
            voted,
        };
        tracing::debug!(
            event = event_names::SAMPLE_SWEEP,
            stage = %Stage::Sample,
            sweep,
            changes,
            accuracy = stats.accuracy,
            log_evidence = stats.log_evidence,
            voted,
            "sweep complete"
        );
        self.history.push(stats.clone());
        Ok(stats)
    }

    /// Run the remaining sweeps and resolve the vote.
    pub fn run(&mut self) -> Result<RunOutcome, SamplerError> {
        let started = Instant::now();
        let total = self.sweeps as u64;
        self.emit(ProgressEvent::new(progress_events::SAMPLING_STARTED, Phase::Sample)
            .with_progress(self.completed() as u64, Some(total)));

        while self.completed() < self.sweeps {
            let stats = self.sweep()?;
            self.emit(
                ProgressEvent::new(progress_events::SWEEP_COMPLETE, Phase::Sample)
                    .with_progress(stats.sweep as u64 + 1, Some(total))
                    .with_elapsed_ms(started.elapsed().as_millis() as u64)
                    .with_detail("changes", stats.changes)
                    .with_detail("accuracy", stats.accuracy)
                    .with_detail("log_evidence", stats.log_evidence),
            );
        }

        tracing::debug!(
            event = event_names::SAMPLE_FINISHED,
            stage = %Stage::Sample,
            sweeps = self.completed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all sweeps done"
        );

        let labels = self.votes.finalize();
        let outcome = RunOutcome {
            accuracy: evaluate::accuracy(&labels, &self.truth),
            purity: evaluate::purity(&labels, &self.truth),
            votes: self.votes.votes().to_vec(),
            burn_in: self.votes.burn_in(),
            voting_sweeps: self.votes.voting_sweeps(),
            sweeps: self.history.clone(),
            labels,
        };

        tracing::info!(
            event = event_names::VOTE_FINISHED,
            stage = %Stage::Vote,
            sweeps = self.sweeps,
            burn_in = outcome.burn_in,
            accuracy = outcome.accuracy,
            purity = outcome.purity,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sampling complete"
        );
        self.emit(
            ProgressEvent::new(progress_events::SAMPLING_COMPLETE, Phase::Vote)
                .with_progress(total, Some(total))
                .with_elapsed_ms(started.elapsed().as_millis() as u64)
                .with_detail("accuracy", outcome.accuracy)
                .with_detail("purity", outcome.purity),
        );
        Ok(outcome)
    }

    /// Class probabilities and the resampled label for an evicted document.
    fn draw_label(
        &mut self,
        doc: &DocIndex,
        n_docs: usize,
    ) -> Result<(ClassLogProbs, Decision), SamplerError> {
        let probs = posterior::evaluate(
            self.stats.class_counts(),
            n_docs,
            self.hyper_gamma,
            &self.theta,
            doc,
        )?;
        let decision = resample_label(probs, &mut self.rng)?;
        Ok((probs, decision))
    }

    fn log_evidence(&self) -> f64 {
        Label::BOTH
            .iter()
            .map(|&label| dirichlet::log_marginal_likelihood(&self.prior, self.stats.word_counts(label)))
            .sum()
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(event);
        }
    }
}

/// Training documents under their fixed labels plus test documents under
/// `test_labels`.
fn count_all(corpus: &Corpus, test_labels: &[Label]) -> Result<SufficientStats, StatsError> {
    let training = corpus
        .training()
        .iter()
        .filter_map(|d| d.truth.map(|label| (&d.index, label)));
    let test = corpus
        .test()
        .iter()
        .zip(test_labels.iter().copied())
        .map(|(d, label)| (&d.index, label));
    SufficientStats::populate(corpus.vocabulary().len(), training.chain(test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusBuilder, Split};
    use crate::events::EventBus;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn separable_corpus() -> Corpus {
        let mut builder = CorpusBuilder::new(["acq".to_string(), "alum".to_string()]);
        for line in [
            "acq merger share stake merger share stake merger share stake",
            "acq stake merger share stake merger share stake merger share",
            "alum ingot smelter tonne ingot smelter tonne ingot smelter tonne",
            "alum tonne ingot smelter tonne ingot smelter tonne ingot smelter",
        ] {
            builder.push_line(Split::Training, line);
        }
        builder.push_line(
            Split::Test,
            "acq merger share stake merger share stake merger share stake",
        );
        builder.push_line(
            Split::Test,
            "alum ingot smelter tonne ingot smelter tonne ingot smelter tonne",
        );
        builder.build().unwrap()
    }

    fn config(sweeps: usize) -> SamplerConfig {
        SamplerConfig {
            sweeps,
            ..SamplerConfig::default()
        }
    }

    #[test]
    fn zero_sweeps_rejected() {
        let corpus = separable_corpus();
        let err = GibbsSampler::new(&corpus, &config(0), ChaCha8Rng::seed_from_u64(1)).err();
        assert!(matches!(err, Some(SamplerError::NoSweeps)));
    }

    #[test]
    fn initial_counts_include_training_documents() {
        let corpus = separable_corpus();
        let sampler = GibbsSampler::new(&corpus, &config(3), ChaCha8Rng::seed_from_u64(2)).unwrap();
        assert_eq!(sampler.stats().class_counts().total(), corpus.len());
        assert_eq!(sampler.stats(), &sampler.recount().unwrap());
    }

    #[test]
    fn ground_truth_init_copies_truth() {
        let corpus = separable_corpus();
        let mut cfg = config(3);
        cfg.init = InitStrategy::GroundTruth;
        let sampler = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(sampler.labels(), &[Label::Zero, Label::One]);
    }

    #[test]
    fn stats_match_recount_after_every_sweep() {
        let corpus = separable_corpus();
        let mut sampler =
            GibbsSampler::new(&corpus, &config(6), ChaCha8Rng::seed_from_u64(4)).unwrap();
        for _ in 0..6 {
            sampler.sweep().unwrap();
            assert_eq!(sampler.stats(), &sampler.recount().unwrap());
            for label in Label::BOTH {
                let sum: f64 = sampler.theta().get(label).iter().sum();
                assert!((sum - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn sweeping_past_the_end_is_an_error() {
        let corpus = separable_corpus();
        let mut sampler =
            GibbsSampler::new(&corpus, &config(1), ChaCha8Rng::seed_from_u64(5)).unwrap();
        sampler.sweep().unwrap();
        assert!(matches!(
            sampler.sweep(),
            Err(SamplerError::SweepsExhausted { sweeps: 1 })
        ));
    }

    #[test]
    fn separable_corpus_is_classified_exactly() {
        let corpus = separable_corpus();
        let mut cfg = config(12);
        cfg.audit = true;
        let mut sampler = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(6)).unwrap();
        let outcome = sampler.run().unwrap();

        assert_eq!(outcome.labels, vec![Label::Zero, Label::One]);
        assert_eq!(outcome.accuracy, 1.0);
        assert_eq!(outcome.purity, 1.0);
        assert_eq!(outcome.burn_in, 4);
        assert_eq!(outcome.voting_sweeps, 8);
        assert_eq!(outcome.sweeps.len(), 12);
        assert_eq!(outcome.sweeps.iter().filter(|s| s.voted).count(), 8);
    }

    #[test]
    fn progress_events_cover_every_sweep() {
        let corpus = separable_corpus();
        let bus = Arc::new(EventBus::new());
        let rx = bus.subscribe();
        let mut sampler = GibbsSampler::new(&corpus, &config(3), ChaCha8Rng::seed_from_u64(7))
            .unwrap()
            .with_emitter(bus.clone());
        sampler.run().unwrap();

        let names: Vec<String> = rx.try_iter().map(|e| e.event).collect();
        assert_eq!(names.first().map(String::as_str), Some(progress_events::SAMPLING_STARTED));
        assert_eq!(
            names.iter().filter(|n| *n == progress_events::SWEEP_COMPLETE).count(),
            3
        );
        assert_eq!(names.last().map(String::as_str), Some(progress_events::SAMPLING_COMPLETE));
    }

    #[test]
    fn failed_document_leaves_stats_consistent() {
        let corpus = separable_corpus();
        let mut sampler =
            GibbsSampler::new(&corpus, &config(3), ChaCha8Rng::seed_from_u64(9)).unwrap();
        let vocab_size = corpus.vocabulary().len();
        sampler.theta = Theta::from_vectors(vec![0.0; vocab_size], vec![1.0 / vocab_size as f64; vocab_size]);

        let err = sampler.sweep().unwrap_err();
        assert!(matches!(err, SamplerError::Posterior(_)));
        assert_eq!(sampler.completed(), 0);
        assert_eq!(sampler.stats(), &sampler.recount().unwrap());
        assert_eq!(sampler.stats().class_counts().total(), corpus.len());
    }

    #[test]
    fn sparse_prior_over_large_vocabulary_completes() {
        let mut builder = CorpusBuilder::new(["acq".to_string(), "alum".to_string()]);
        for d in 0..40 {
            let category = if d % 2 == 0 { "acq" } else { "alum" };
            let terms: Vec<String> = (0..50).map(|t| format!("w{}", d * 50 + t)).collect();
            let split = if d < 30 { Split::Training } else { Split::Test };
            builder.push_line(split, &format!("{} {}", category, terms.join(" ")));
        }
        let corpus = builder.build().unwrap();
        assert_eq!(corpus.vocabulary().len(), 2_000);

        for multi in [0.01, 0.001] {
            let mut cfg = config(30);
            cfg.hyperparameters.hyper_multi = multi;
            cfg.audit = true;
            let mut sampler =
                GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(1)).unwrap();
            let outcome = sampler.run().unwrap();
            assert_eq!(outcome.sweeps.len(), 30);
            for label in Label::BOTH {
                assert!(sampler.theta().get(label).iter().all(|&p| p > 0.0));
            }
        }
    }

    #[test]
    fn log_evidence_is_finite() {
        let corpus = separable_corpus();
        let mut sampler =
            GibbsSampler::new(&corpus, &config(2), ChaCha8Rng::seed_from_u64(8)).unwrap();
        let stats = sampler.sweep().unwrap();
        assert!(stats.log_evidence.is_finite());
        assert!(stats.log_evidence < 0.0);
    }
}
