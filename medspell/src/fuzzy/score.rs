//! Score calibrations.
use serde::{Deserialize, Serialize};

use crate::types::Score;

/// How permissive matching is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FuzzyLevel {
    /// production default
    Normal,
    /// lower thresholds, more recall
    MoreFuzzy,
    /// higher average threshold, fewer false positives
    MoreStrict,
}

impl Default for FuzzyLevel {
    fn default() -> Self {
        FuzzyLevel::Normal
    }
}

impl std::str::FromStr for FuzzyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(FuzzyLevel::Normal),
            "moreFuzzy" | "more-fuzzy" => Ok(FuzzyLevel::MoreFuzzy),
            "moreStrict" | "more-strict" => Ok(FuzzyLevel::MoreStrict),
            other => Err(format!("unknown fuzzy level: {}", other)),
        }
    }
}

/// Match status of one syllable part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartMatch {
    /// identical
    Exact,
    /// equal after fuzzy mapping
    Fuzzy,
    /// neither
    None,
}

/// Numeric thresholds for one [`FuzzyLevel`].
///
/// The `fuzzy_*` tiers rank partial matches; for [`FuzzyLevel::MoreFuzzy`]
/// `final_match` is below `fuzzy_2`, which is kept as calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// initial and final both identical
    pub full_match: Score,
    /// one part exact, the other fuzzy; also whole-syllable fuzzy
    pub fuzzy_4: Score,
    /// both parts fuzzy
    pub fuzzy_3: Score,
    /// only the final identical
    pub final_match: Score,
    /// final fuzzy, initial unrelated
    pub fuzzy_2: Score,
    /// only the initial identical
    pub initial_match: Score,
    /// initial fuzzy, final unrelated
    pub fuzzy_1: Score,
    /// minimum score for the opening syllable of a match
    pub start_threshold: Score,
    /// minimum length-adjusted average score for acceptance
    pub avg_threshold: Score,
}

impl Calibration {
    /// thresholds of a preset
    pub const fn for_level(level: FuzzyLevel) -> Calibration {
        match level {
            FuzzyLevel::Normal => Calibration {
                full_match: 0.95,
                fuzzy_4: 0.9,
                fuzzy_3: 0.8,
                final_match: 0.75,
                fuzzy_2: 0.7,
                initial_match: 0.5,
                fuzzy_1: 0.45,
                start_threshold: 0.9,
                avg_threshold: 0.7,
            },
            FuzzyLevel::MoreFuzzy => Calibration {
                full_match: 0.95,
                fuzzy_4: 0.9,
                fuzzy_3: 0.8,
                final_match: 0.6,
                fuzzy_2: 0.55,
                initial_match: 0.5,
                fuzzy_1: 0.45,
                start_threshold: 0.5,
                avg_threshold: 0.6,
            },
            FuzzyLevel::MoreStrict => Calibration {
                full_match: 0.95,
                fuzzy_4: 0.9,
                fuzzy_3: 0.8,
                final_match: 0.75,
                fuzzy_2: 0.7,
                initial_match: 0.5,
                fuzzy_1: 0.45,
                start_threshold: 0.9,
                avg_threshold: 0.78,
            },
        }
    }

    /// score of an (initial, final) status pair
    pub fn score(&self, initial: PartMatch, rhyme: PartMatch) -> Score {
        use PartMatch::*;

        match (initial, rhyme) {
            (Exact, Exact) => self.full_match,
            (Exact, Fuzzy) | (Fuzzy, Exact) => self.fuzzy_4,
            (Fuzzy, Fuzzy) => self.fuzzy_3,
            (None, Exact) => self.final_match,
            (None, Fuzzy) => self.fuzzy_2,
            (Exact, None) => self.initial_match,
            (Fuzzy, None) => self.fuzzy_1,
            (None, None) => 0.0,
        }
    }

    /// score of two syllables that are fuzzy as a whole
    pub fn syllable_fuzzy(&self) -> Score {
        self.fuzzy_4
    }

    /// highest score a single position can contribute
    pub fn max_step(&self) -> Score {
        self.full_match
    }

    /// Dampens the average score of short terms, which match spuriously more often.
    pub fn score_adjust(len: usize) -> Score {
        (0.7 + 0.075 * len as Score).min(1.0)
    }

    /// raw score sum a term of `len` positions must reach
    pub fn acceptance_threshold(&self, len: usize) -> Score {
        self.avg_threshold * len as Score / Self::score_adjust(len)
    }

    /// turns a raw score sum into the reported score
    pub fn normalize(sum: Score, len: usize) -> Score {
        sum * (Self::score_adjust(len) / len as Score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_saturates() {
        assert!((Calibration::score_adjust(2) - 0.85).abs() < 1e-6);
        assert_eq!(Calibration::score_adjust(4), 1.0);
        assert_eq!(Calibration::score_adjust(12), 1.0);
    }

    #[test]
    fn threshold_is_inverse_of_normalize() {
        let c = Calibration::for_level(FuzzyLevel::Normal);
        for len in 2..8 {
            let th = c.acceptance_threshold(len);
            assert!((Calibration::normalize(th, len) - c.avg_threshold).abs() < 1e-5);
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!("moreStrict".parse::<FuzzyLevel>(), Ok(FuzzyLevel::MoreStrict));
        assert!("loose".parse::<FuzzyLevel>().is_err());

        let level: FuzzyLevel = serde_json::from_str("\"moreFuzzy\"").unwrap();
        assert_eq!(level, FuzzyLevel::MoreFuzzy);
    }

    #[test]
    fn more_fuzzy_keeps_calibrated_order() {
        let c = Calibration::for_level(FuzzyLevel::MoreFuzzy);
        assert!(c.score(PartMatch::None, PartMatch::Exact) > c.score(PartMatch::None, PartMatch::Fuzzy));
        assert_eq!(c.score(PartMatch::None, PartMatch::None), 0.0);
    }
}
