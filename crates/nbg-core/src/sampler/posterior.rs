//! Collapsed conditional probability of a document's class.
//!
//! For class `c`, with the document already evicted from the statistics:
//!
//! ```text
//! ln Pr(c) = ln(class_count[c] + γ_c - 1) - ln(N + γ_0 + γ_1 - 1)
//!          + Σ_{(t, n) in doc} n · ln θ_c[t]
//! ```

use nbg_math::log_add_exp;
use thiserror::Error;

use super::stats::ClassCounts;
use super::theta::Theta;
use crate::corpus::DocIndex;
use crate::label::Label;

#[derive(Debug, Error, PartialEq)]
pub enum PosteriorError {
    #[error("term index {term} not in vocabulary of {vocab_size} terms")]
    UnknownTerm { term: usize, vocab_size: usize },

    #[error("theta for class {label} is {value} at term {term}; it must be positive")]
    NonPositiveTheta { label: Label, term: usize, value: f64 },
}

/// Log-probabilities of both classes for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassLogProbs {
    pub zero: f64,
    pub one: f64,
}

impl ClassLogProbs {
    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Zero => self.zero,
            Label::One => self.one,
        }
    }

    /// `ln Pr(0) - ln Pr(1)`.
    pub fn log_ratio(&self) -> f64 {
        self.zero - self.one
    }

    /// Normalized probability of class 1.
    pub fn prob_one(&self) -> f64 {
        (self.one - log_add_exp(self.zero, self.one)).exp()
    }
}

/// Log prior mass of `label` under the Beta-type class prior.
///
/// A non-positive numerator (only possible with γ_c < 1 and an empty class)
/// gives `-inf` rather than NaN.
pub fn log_class_prior(label: Label, counts: ClassCounts, n_docs: usize, hyper_gamma: [f64; 2]) -> f64 {
    let numerator = counts.get(label) as f64 + hyper_gamma[label.index()] - 1.0;
    let denominator = n_docs as f64 + hyper_gamma[0] + hyper_gamma[1] - 1.0;
    let log_numerator = if numerator > 0.0 {
        numerator.ln()
    } else {
        f64::NEG_INFINITY
    };
    log_numerator - denominator.ln()
}

/// `ln Pr(label)` for `doc`. `counts` must already exclude `doc`.
pub fn log_class_probability(
    label: Label,
    counts: ClassCounts,
    n_docs: usize,
    hyper_gamma: [f64; 2],
    theta: &[f64],
    doc: &DocIndex,
) -> Result<f64, PosteriorError> {
    let mut ln_pr = log_class_prior(label, counts, n_docs, hyper_gamma);
    for (term, n) in doc.iter() {
        let p = *theta.get(term).ok_or(PosteriorError::UnknownTerm {
            term,
            vocab_size: theta.len(),
        })?;
        if !(p > 0.0 && p.is_finite()) {
            return Err(PosteriorError::NonPositiveTheta {
                label,
                term,
                value: p,
            });
        }
        ln_pr += n as f64 * p.ln();
    }
    Ok(ln_pr)
}

/// Evaluate both classes for `doc`.
pub fn evaluate(
    counts: ClassCounts,
    n_docs: usize,
    hyper_gamma: [f64; 2],
    theta: &Theta,
    doc: &DocIndex,
) -> Result<ClassLogProbs, PosteriorError> {
    Ok(ClassLogProbs {
        zero: log_class_probability(Label::Zero, counts, n_docs, hyper_gamma, theta.get(Label::Zero), doc)?,
        one: log_class_probability(Label::One, counts, n_docs, hyper_gamma, theta.get(Label::One), doc)?,
    })
}
