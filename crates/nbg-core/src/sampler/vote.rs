//! Post-burn-in majority vote over sampled labels.

use crate::label::Label;

/// Burn-in length for a run of `sweeps` sweeps: `sweeps / 3`, truncated.
///
/// Runs shorter than three sweeps have no burn-in; every sweep votes.
pub fn burn_in(sweeps: usize) -> usize {
    sweeps / 3
}

/// Per-document count of sweeps in which the label was One.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteAccumulator {
    votes: Vec<u32>,
    sweeps: usize,
    burn_in: usize,
    recorded: usize,
}

impl VoteAccumulator {
    pub fn new(documents: usize, sweeps: usize) -> Self {
        Self {
            votes: vec![0; documents],
            sweeps,
            burn_in: burn_in(sweeps),
            recorded: 0,
        }
    }

    pub fn burn_in(&self) -> usize {
        self.burn_in
    }

    /// Number of sweeps that contribute votes (T - B).
    pub fn voting_sweeps(&self) -> usize {
        self.sweeps - self.burn_in
    }

    /// Sweeps recorded so far.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn votes(&self) -> &[u32] {
        &self.votes
    }

    /// Record the labels of sweep `sweep` (0-based). Sweeps inside the
    /// burn-in are ignored; returns whether the sweep was recorded.
    pub fn record(&mut self, sweep: usize, labels: &[Label]) -> bool {
        if sweep < self.burn_in {
            return false;
        }
        for (vote, label) in self.votes.iter_mut().zip(labels) {
            *vote += label.index() as u32;
        }
        self.recorded += 1;
        true
    }

    /// Majority label per document: One when `vote >= (T - B) - vote`.
    pub fn finalize(&self) -> Vec<Label> {
        let total = self.voting_sweeps() as u64;
        self.votes
            .iter()
            .map(|&v| {
                let ones = v as u64;
                Label::from(ones >= total.saturating_sub(ones))
            })
            .collect()
    }
}
