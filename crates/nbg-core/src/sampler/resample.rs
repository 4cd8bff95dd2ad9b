//! Stochastic label choice from a pair of class log-probabilities.
//!
//! With `d = ln Pr(0) - ln Pr(1)`:
//! - `d > 13.81` picks class 0 outright,
//! - `-d > 13.81` picks class 1 outright,
//! - otherwise class 0 is drawn with weight `exp(d)` against weight 1 for class 1.
//!
//! 13.81 ≈ ln(999999): past it the minority class has probability below
//! 1e-6, and `exp(d)` stays far from overflow inside it.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use thiserror::Error;

use super::posterior::ClassLogProbs;
use crate::label::Label;

/// Log-ratio beyond which the choice is deterministic.
pub const LOG_RATIO_CLIP: f64 = 13.81;

#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    #[error("log-probabilities ({zero}, {one}) give no usable ratio")]
    Degenerate { zero: f64, one: f64 },
}

/// How a label was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Log-ratio past the clip; no random draw consumed.
    Clipped(Label),
    /// Weighted draw.
    Drawn(Label),
}

impl Decision {
    pub fn label(self) -> Label {
        match self {
            Decision::Clipped(label) | Decision::Drawn(label) => label,
        }
    }
}

/// Choose a new label for a document given both class log-probabilities.
pub fn resample_label<R: Rng + ?Sized>(
    probs: ClassLogProbs,
    rng: &mut R,
) -> Result<Decision, ResampleError> {
    let d = probs.log_ratio();
    if d.is_nan() {
        return Err(ResampleError::Degenerate {
            zero: probs.zero,
            one: probs.one,
        });
    }
    if d > LOG_RATIO_CLIP {
        return Ok(Decision::Clipped(Label::Zero));
    }
    if -d > LOG_RATIO_CLIP {
        return Ok(Decision::Clipped(Label::One));
    }

    let ratio = d.exp();
    let weights = WeightedIndex::new([ratio, 1.0]).map_err(|_| ResampleError::Degenerate {
        zero: probs.zero,
        one: probs.one,
    })?;
    let label = match weights.sample(rng) {
        0 => Label::Zero,
        _ => Label::One,
    };
    Ok(Decision::Drawn(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn probs_with_ratio(d: f64) -> ClassLogProbs {
        ClassLogProbs {
            zero: -50.0 + d,
            one: -50.0,
        }
    }

    #[test]
    fn large_positive_ratio_always_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1_000 {
            let decision = resample_label(probs_with_ratio(14.0), &mut rng).unwrap();
            assert_eq!(decision, Decision::Clipped(Label::Zero));
        }
    }

    #[test]
    fn large_negative_ratio_always_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1_000 {
            let decision = resample_label(probs_with_ratio(-14.0), &mut rng).unwrap();
            assert_eq!(decision, Decision::Clipped(Label::One));
        }
    }

    #[test]
    fn clip_survives_infinite_log_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let probs = ClassLogProbs {
            zero: f64::NEG_INFINITY,
            one: -3.0,
        };
        assert_eq!(
            resample_label(probs, &mut rng).unwrap(),
            Decision::Clipped(Label::One)
        );
    }

    #[test]
    fn both_impossible_is_degenerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let probs = ClassLogProbs {
            zero: f64::NEG_INFINITY,
            one: f64::NEG_INFINITY,
        };
        assert!(matches!(
            resample_label(probs, &mut rng),
            Err(ResampleError::Degenerate { .. })
        ));
    }

    #[test]
    fn even_odds_split_roughly_in_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let draws = 10_000;
        let zeros = (0..draws)
            .filter(|_| resample_label(probs_with_ratio(0.0), &mut rng).unwrap().label() == Label::Zero)
            .count();
        let frac = zeros as f64 / draws as f64;
        assert!((frac - 0.5).abs() < 0.03, "frac={frac}");
    }

    #[test]
    fn ratio_inside_clip_is_weighted() {
        // d = ln 3 → P(0) = 0.75
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let draws = 10_000;
        let zeros = (0..draws)
            .filter(|_| resample_label(probs_with_ratio(3.0f64.ln()), &mut rng).unwrap().label() == Label::Zero)
            .count();
        let frac = zeros as f64 / draws as f64;
        assert!((frac - 0.75).abs() < 0.03, "frac={frac}");
    }

    #[test]
    fn just_inside_clip_is_still_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let decision = resample_label(probs_with_ratio(13.8), &mut rng).unwrap();
        assert!(matches!(decision, Decision::Drawn(_)));
    }
}
