//! Dirichlet-Multinomial conjugate model for per-class word distributions.
//!
//! The sampler keeps one word distribution per class:
//! - Prior: `theta = (theta_1..theta_V) ~ Dirichlet(α_1..α_V)`
//! - Likelihood: word counts `n | theta ~ Multinomial(N, theta)`
//! - Posterior: `theta | n ~ Dirichlet(α_i + n_i)`
//!
//! Draws use the standard Gamma construction: `g_i ~ Gamma(α_i, 1)` and
//! `theta_i = g_i / Σ_j g_j`, normalized in log space.

use rand::distr::Open01;
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

use super::stable::{log_factorial, log_gamma, log_sum_exp};

/// Parameters of a Dirichlet distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirichletParams {
    /// Concentration parameters (all must be > 0)
    pub alpha: Vec<f64>,
}

impl DirichletParams {
    /// Create new Dirichlet parameters with validation.
    ///
    /// Returns None if the vector is empty or any entry is non-positive,
    /// infinite or NaN.
    pub fn new(alpha: Vec<f64>) -> Option<Self> {
        if alpha.is_empty() || alpha.iter().any(|a| !a.is_finite() || *a <= 0.0) {
            return None;
        }
        Some(Self { alpha })
    }

    /// Create a symmetric Dirichlet with all α_i = value.
    pub fn symmetric(k: usize, value: f64) -> Option<Self> {
        if k == 0 {
            return None;
        }
        Self::new(vec![value; k])
    }

    /// Number of categories K.
    pub fn k(&self) -> usize {
        self.alpha.len()
    }

    /// α_0 = Σ_i α_i.
    pub fn concentration(&self) -> f64 {
        self.alpha.iter().sum()
    }

    /// E[theta_i] = α_i / α_0.
    pub fn mean(&self) -> Vec<f64> {
        let sum = self.concentration();
        self.alpha.iter().map(|a| a / sum).collect()
    }
}

/// Posterior parameters after observing integer counts: α'_i = α_i + n_i.
///
/// Returns None when `counts` does not match the prior's dimension.
pub fn posterior_params(prior: &DirichletParams, counts: &[u64]) -> Option<DirichletParams> {
    if counts.len() != prior.k() {
        return None;
    }
    let alpha = prior
        .alpha
        .iter()
        .zip(counts)
        .map(|(&a, &n)| a + n as f64)
        .collect();
    DirichletParams::new(alpha)
}

/// Draw one probability vector from `Dirichlet(params)`.
///
/// The Gamma draws are kept in log space so small concentrations do not
/// underflow: for `α < 1`, `ln g = ln Gamma(α + 1) + ln(u) / α` with
/// `u ~ Uniform(0, 1)`. Every entry is at least `f64::MIN_POSITIVE`.
///
/// Returns None when a Gamma distribution cannot be built from `params`.
pub fn sample<R: Rng + ?Sized>(params: &DirichletParams, rng: &mut R) -> Option<Vec<f64>> {
    let mut log_draws = Vec::with_capacity(params.k());
    for &a in &params.alpha {
        log_draws.push(log_gamma_draw(a, rng)?);
    }
    let log_total = log_sum_exp(&log_draws);
    if !log_total.is_finite() {
        return None;
    }
    Some(
        log_draws
            .into_iter()
            .map(|lg| (lg - log_total).exp().max(f64::MIN_POSITIVE))
            .collect(),
    )
}

/// `ln g` for `g ~ Gamma(shape, 1)`.
fn log_gamma_draw<R: Rng + ?Sized>(shape: f64, rng: &mut R) -> Option<f64> {
    if shape >= 1.0 {
        return Some(Gamma::new(shape, 1.0).ok()?.sample(rng).ln());
    }
    let u: f64 = Open01.sample(rng);
    let boosted = Gamma::new(shape + 1.0, 1.0).ok()?.sample(rng);
    Some(boosted.ln() + u.ln() / shape)
}

/// log B(α) = Σ_i lgamma(α_i) - lgamma(Σ_i α_i).
pub fn log_multivariate_beta(alpha: &[f64]) -> f64 {
    if alpha.is_empty() || alpha.iter().any(|a| a.is_nan() || *a <= 0.0) {
        return f64::NAN;
    }
    let sum: f64 = alpha.iter().sum();
    alpha.iter().map(|&a| log_gamma(a)).sum::<f64>() - log_gamma(sum)
}

/// Log marginal likelihood of observed counts with theta integrated out.
///
/// log P(n | α) = log N! - Σ_i log n_i! + log B(α + n) - log B(α)
///
/// Returns NAN when `counts` does not match the prior's dimension.
pub fn log_marginal_likelihood(prior: &DirichletParams, counts: &[u64]) -> f64 {
    let Some(post) = posterior_params(prior, counts) else {
        return f64::NAN;
    };
    let n_total: u64 = counts.iter().sum();
    let log_multinomial =
        log_factorial(n_total) - counts.iter().map(|&n| log_factorial(n)).sum::<f64>();

    log_multinomial + log_multivariate_beta(&post.alpha) - log_multivariate_beta(&prior.alpha)
}
