use crate::fuzzy::Calibration;
use crate::types::{Score, TermId};

/// Outcome of the stop check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// threshold already reached
    Pass,
    /// threshold out of reach even with perfect remaining positions
    Prune,
    /// keep walking
    Continue,
}

/// An in-flight occurrence of a term starting at `start`.
#[derive(Debug, Clone)]
pub(crate) struct MatchCandidate {
    pub(crate) term: TermId,
    pub(crate) len: usize,
    /// last term position consumed
    pub(crate) position: usize,
    pub(crate) start: usize,
    pub(crate) score: Score,
    pub(crate) threshold: Score,
    pub(crate) max_step: Score,
}

impl MatchCandidate {
    pub(crate) fn new(
        term: TermId,
        len: usize,
        start: usize,
        head_score: Score,
        calibration: &Calibration,
    ) -> MatchCandidate {
        MatchCandidate {
            term,
            len,
            position: 0,
            start,
            score: head_score,
            threshold: calibration.acceptance_threshold(len),
            max_step: calibration.max_step(),
        }
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.len.saturating_sub(self.position + 1)
    }

    pub(crate) fn verdict(&self) -> Verdict {
        if self.score >= self.threshold {
            return Verdict::Pass;
        }

        // summed one step at a time, in the order the real tail is added
        let best = (0..self.remaining()).fold(self.score, |acc, _| acc + self.max_step);

        if best < self.threshold {
            Verdict::Prune
        } else {
            Verdict::Continue
        }
    }
}
