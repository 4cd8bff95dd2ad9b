//! End-to-end sampling runs over corpora read from disk.

use nbg_config::{InitStrategy, SamplerConfig};
use nbg_core::corpus::load_corpus;
use nbg_core::sampler::{GibbsSampler, SamplerError};
use nbg_core::Label;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_lines(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("write fixture");
    }
    file
}

/// Two training documents per class over disjoint three-term vocabularies,
/// one test document per class, plus lines from other categories.
fn fixture() -> (NamedTempFile, NamedTempFile) {
    let train = write_lines(&[
        "acq merger share stake merger share stake merger share stake",
        "earn profit dividend quarter",
        "acq stake\tmerger share stake merger share stake merger share",
        "alum ingot smelter tonne ingot smelter tonne ingot smelter tonne",
        "",
        "alum tonne ingot smelter tonne ingot  smelter tonne ingot smelter",
    ]);
    let test = write_lines(&[
        "acq merger share stake merger share stake merger share stake",
        "grain wheat",
        "alum ingot smelter tonne ingot smelter tonne ingot smelter tonne",
    ]);
    (train, test)
}

fn config(sweeps: usize, seed: u64) -> SamplerConfig {
    SamplerConfig {
        sweeps,
        seed: Some(seed),
        ..SamplerConfig::default()
    }
}

#[test]
fn separable_corpus_reaches_full_accuracy() {
    let (train, test) = fixture();
    let cfg = config(12, 20260101);
    let corpus = load_corpus(train.path(), test.path(), cfg.categories.clone()).unwrap();

    let summary = corpus.summary();
    assert_eq!(summary.training_documents, 4);
    assert_eq!(summary.test_documents, 2);
    assert_eq!(summary.vocabulary_size, 6);

    let mut sampler = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(20260101)).unwrap();
    let outcome = sampler.run().unwrap();
    assert_eq!(outcome.labels, vec![Label::Zero, Label::One]);
    assert_eq!(outcome.accuracy, 1.0);
    assert_eq!(outcome.burn_in, 4);
}

#[test]
fn fixed_seed_runs_are_identical() {
    let (train, test) = fixture();
    let cfg = config(9, 11);
    let corpus = load_corpus(train.path(), test.path(), cfg.categories.clone()).unwrap();

    let run = || {
        let mut sampler = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(11)).unwrap();
        sampler.run().unwrap()
    };
    let a = run();
    let b = run();

    let changes = |o: &nbg_core::sampler::RunOutcome| o.sweeps.iter().map(|s| s.changes).collect::<Vec<_>>();
    assert_eq!(changes(&a), changes(&b));
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.votes, b.votes);
    assert_eq!(a, b);
}

#[test]
fn audit_passes_on_every_sweep() {
    let (train, test) = fixture();
    let mut cfg = config(6, 3);
    cfg.audit = true;
    cfg.init = InitStrategy::GroundTruth;
    let corpus = load_corpus(train.path(), test.path(), cfg.categories.clone()).unwrap();

    let mut sampler = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(3)).unwrap();
    let outcome = sampler.run().unwrap();
    assert_eq!(outcome.sweeps.len(), 6);
    for stats in &outcome.sweeps {
        assert_eq!(stats.class_counts.total(), corpus.len());
    }
}

#[test]
fn single_sweep_votes_once() {
    let (train, test) = fixture();
    let cfg = config(1, 5);
    let corpus = load_corpus(train.path(), test.path(), cfg.categories.clone()).unwrap();

    let mut sampler = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(5)).unwrap();
    let outcome = sampler.run().unwrap();
    assert_eq!(outcome.burn_in, 0);
    assert_eq!(outcome.voting_sweeps, 1);
    assert!(outcome.sweeps[0].voted);
    // With one vote, the label is whatever the single sweep drew.
    assert_eq!(outcome.labels, sampler.labels());
}

#[test]
fn invalid_prior_is_rejected() {
    let (train, test) = fixture();
    let mut cfg = config(3, 1);
    cfg.hyperparameters.hyper_multi = 0.0;
    let corpus = load_corpus(train.path(), test.path(), cfg.categories.clone()).unwrap();

    let err = GibbsSampler::new(&corpus, &cfg, ChaCha8Rng::seed_from_u64(1)).err();
    assert!(matches!(err, Some(SamplerError::InvalidPrior { .. })));
}
