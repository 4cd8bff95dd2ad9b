//! Scoring sampled labels against held-out truth.
//!
//! Documents whose truth is unknown still count in the denominator of both
//! scores but can never be correct.

use crate::label::Label;

/// Fraction of documents whose label equals their truth.
///
/// Returns 0.0 for an empty slice.
pub fn accuracy(labels: &[Label], truth: &[Option<Label>]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = labels
        .iter()
        .zip(truth)
        .filter(|(label, truth)| Some(**label) == **truth)
        .count();
    correct as f64 / labels.len() as f64
}

/// Clustering purity: each label is treated as a cluster and credited with
/// its majority true class.
///
/// Unlike accuracy this is invariant under swapping the two labels.
pub fn purity(labels: &[Label], truth: &[Option<Label>]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    // contingency[cluster][class]
    let mut contingency = [[0usize; 2]; 2];
    for (label, truth) in labels.iter().zip(truth) {
        if let Some(class) = truth {
            contingency[label.index()][class.index()] += 1;
        }
    }
    let credited: usize = contingency.iter().map(|row| row[0].max(row[1])).sum();
    credited as f64 / labels.len() as f64
}
