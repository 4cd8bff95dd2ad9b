//! Per-class word distributions redrawn once per sweep.

use nbg_math::dirichlet::{self, DirichletParams};
use rand::Rng;

use super::stats::SufficientStats;
use super::SamplerError;
use crate::label::Label;

/// Word distribution of each class. The two vectors are owned separately;
/// redrawing one never touches the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Theta {
    class0: Vec<f64>,
    class1: Vec<f64>,
}

impl Theta {
    pub fn from_vectors(class0: Vec<f64>, class1: Vec<f64>) -> Self {
        Self { class0, class1 }
    }

    /// Independent draws from the prior `Dirichlet(hyper_multi)`.
    pub fn from_prior<R: Rng + ?Sized>(
        prior: &DirichletParams,
        rng: &mut R,
    ) -> Result<Self, SamplerError> {
        let class0 = draw(prior, Label::Zero, rng)?;
        let class1 = draw(prior, Label::One, rng)?;
        Ok(Self { class0, class1 })
    }

    /// Draws from `Dirichlet(word_count[c] + hyper_multi)` for c = 0 then 1.
    pub fn from_posterior<R: Rng + ?Sized>(
        prior: &DirichletParams,
        stats: &SufficientStats,
        rng: &mut R,
    ) -> Result<Self, SamplerError> {
        let class0 = draw_posterior(prior, stats, Label::Zero, rng)?;
        let class1 = draw_posterior(prior, stats, Label::One, rng)?;
        Ok(Self { class0, class1 })
    }

    pub fn get(&self, label: Label) -> &[f64] {
        match label {
            Label::Zero => &self.class0,
            Label::One => &self.class1,
        }
    }
}

fn draw<R: Rng + ?Sized>(
    params: &DirichletParams,
    label: Label,
    rng: &mut R,
) -> Result<Vec<f64>, SamplerError> {
    dirichlet::sample(params, rng).ok_or(SamplerError::DegenerateTheta { label })
}

fn draw_posterior<R: Rng + ?Sized>(
    prior: &DirichletParams,
    stats: &SufficientStats,
    label: Label,
    rng: &mut R,
) -> Result<Vec<f64>, SamplerError> {
    let params = dirichlet::posterior_params(prior, stats.word_counts(label)).ok_or(
        SamplerError::DimensionMismatch {
            expected: prior.k(),
            actual: stats.vocab_size(),
        },
    )?;
    draw(&params, label, rng)
}
