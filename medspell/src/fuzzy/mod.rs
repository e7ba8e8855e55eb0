//! Which syllables sound alike, and how much.
use hashbrown::HashMap;
use parking_lot::RwLock;
use smol_str::SmolStr;

pub mod score;

pub use self::score::{Calibration, FuzzyLevel, PartMatch};
use crate::tokenizer::Syllable;
use crate::types::Score;

/// Confusable spellings, each part mapped to a representative.
#[derive(Debug, Clone)]
pub struct FuzzyMaps {
    /// initials, e.g. `z` heard as `zh`
    pub initial: HashMap<SmolStr, SmolStr>,
    /// finals, e.g. `an` heard as `ang`
    pub rhyme: HashMap<SmolStr, SmolStr>,
    /// whole syllables, in strict spelling
    pub syllable: HashMap<SmolStr, SmolStr>,
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<SmolStr, SmolStr> {
    pairs
        .iter()
        .map(|(a, b)| (SmolStr::new(a), SmolStr::new(b)))
        .collect()
}

impl Default for FuzzyMaps {
    fn default() -> Self {
        FuzzyMaps {
            initial: to_map(&[
                ("z", "zh"),
                ("s", "sh"),
                ("c", "ch"),
                ("n", "l"),
                ("r", "l"),
                ("h", "f"),
            ]),
            rhyme: to_map(&[
                ("an", "ang"),
                ("en", "eng"),
                ("in", "ing"),
                ("ian", "iang"),
                ("uan", "uang"),
            ]),
            // hui - fei, huang - wang
            syllable: to_map(&[("huei", "fei"), ("huang", "uang")]),
        }
    }
}

fn part_match(map: &HashMap<SmolStr, SmolStr>, a: &SmolStr, b: &SmolStr) -> PartMatch {
    if a == b {
        return PartMatch::Exact;
    }

    let mapped_a = map.get(a).unwrap_or(a);
    let mapped_b = map.get(b).unwrap_or(b);

    if mapped_a == mapped_b {
        PartMatch::Fuzzy
    } else {
        PartMatch::None
    }
}

/// Symmetric syllable similarity with a shared cache.
///
/// The cache only ever gains entries and every key always maps to the same
/// value, so concurrent callers at worst compute a pair twice.
#[derive(Debug)]
pub struct FuzzyModel {
    maps: FuzzyMaps,
    calibration: Calibration,
    cache: RwLock<HashMap<(SmolStr, SmolStr), Score>>,
}

impl FuzzyModel {
    /// a model with the default confusion maps
    pub fn new(calibration: Calibration) -> FuzzyModel {
        FuzzyModel::with_maps(FuzzyMaps::default(), calibration)
    }

    /// a model with custom confusion maps
    pub fn with_maps(maps: FuzzyMaps, calibration: Calibration) -> FuzzyModel {
        FuzzyModel {
            maps,
            calibration,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// thresholds in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// similarity of two syllables, in `[0, 1]`
    pub fn similarity(&self, a: &Syllable, b: &Syllable) -> Score {
        let key = (a.full.clone(), b.full.clone());

        if let Some(score) = self.cache.read().get(&key) {
            return *score;
        }

        let score = self.compute(a, b);

        let mut cache = self.cache.write();
        cache.insert((b.full.clone(), a.full.clone()), score);
        cache.insert(key, score);

        score
    }

    fn compute(&self, a: &Syllable, b: &Syllable) -> Score {
        if part_match(&self.maps.syllable, &a.full, &b.full) == PartMatch::Fuzzy {
            return self.calibration.syllable_fuzzy();
        }

        let initial = part_match(&self.maps.initial, &a.initial, &b.initial);
        let rhyme = part_match(&self.maps.rhyme, &a.rhyme, &b.rhyme);

        self.calibration.score(initial, rhyme)
    }

    /// number of cached pairs, both orders counted
    pub fn cached_pairs(&self) -> usize {
        self.cache.read().len()
    }
}
