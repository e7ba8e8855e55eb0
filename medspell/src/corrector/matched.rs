//! Matches found in a corrected text.
use crate::types::{Score, TermId};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;

/// A raw automaton or reference result, before conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// matched term
    pub term: TermId,
    /// start position in the matched token sequence
    pub offset: usize,
    /// normalized score
    pub score: Score,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// A vocabulary term found in the input
pub struct Match {
    /// canonical text of the term
    pub term: SmolStr,
    /// character offset of the term in the corrected text
    pub offset: usize,
    /// similarity of the replaced span, `1.0` for verbatim occurrences
    pub score: Score,
}

impl Match {
    /// creates a match
    pub fn new(term: SmolStr, offset: usize, score: Score) -> Match {
        Match {
            term,
            offset,
            score,
        }
    }

    /// gets the canonical term text
    pub fn term(&self) -> &str {
        &self.term
    }

    /// number of characters the term occupies in the corrected text
    pub fn len(&self) -> usize {
        self.term.chars().count()
    }

    /// whether the term is empty; never true for vocabulary terms
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl PartialOrd for Match {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Match {
    fn cmp(&self, other: &Self) -> Ordering {
        let x = self.offset.cmp(&other.offset);

        if let Equal = x {
            return self
                .term
                .cmp(&other.term)
                .then_with(|| other.score.partial_cmp(&self.score).unwrap_or(Equal));
        }

        x
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term && self.offset == other.offset && self.score == other.score
    }
}

impl Eq for Match {}

/// Output of a correction run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Correction {
    /// corrected text without placeholder fillers
    pub text: String,
    /// accepted matches, ordered by offset
    pub matches: Vec<Match>,
}
