//! Conversion of text into phonetic token sets.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub mod pinyin;
pub mod placeholder;

pub use self::pinyin::{decompose, PinyinTransliterator};

/// One reading of a character: the full syllable and its initial/final split.
///
/// `full` is always `initial + rhyme`. Zero-onset syllables have an empty
/// initial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Syllable {
    /// canonical spelling, `initial` followed by `rhyme`
    pub full: SmolStr,
    /// consonant onset, possibly empty
    pub initial: SmolStr,
    /// the final
    pub rhyme: SmolStr,
}

impl Syllable {
    /// builds a syllable from its parts
    pub fn new(initial: &str, rhyme: &str) -> Syllable {
        let mut full = String::with_capacity(initial.len() + rhyme.len());
        full.push_str(initial);
        full.push_str(rhyme);

        Syllable {
            full: full.into(),
            initial: initial.into(),
            rhyme: rhyme.into(),
        }
    }
}

/// All plausible readings of one input position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSet {
    /// readings keyed by full spelling
    Phonetic(BTreeMap<SmolStr, Syllable>),
    /// a character with no phonetic reading; it never matches anything
    Literal(char),
}

impl TokenSet {
    /// collects readings, deduplicating by full spelling
    pub fn phonetic<I>(syllables: I) -> TokenSet
    where
        I: IntoIterator<Item = Syllable>,
    {
        let mut map = BTreeMap::new();
        for syllable in syllables {
            map.entry(syllable.full.clone()).or_insert(syllable);
        }
        TokenSet::Phonetic(map)
    }

    /// the readings of this position, empty for literals
    pub fn syllables(&self) -> impl Iterator<Item = &Syllable> {
        match self {
            TokenSet::Phonetic(map) => Some(map.values()),
            TokenSet::Literal(_) => None,
        }
        .into_iter()
        .flatten()
    }

    /// first reading in spelling order
    pub fn first(&self) -> Option<&Syllable> {
        self.syllables().next()
    }

    /// whether this position has no phonetic reading
    pub fn is_literal(&self) -> bool {
        matches!(self, TokenSet::Literal(_))
    }
}

impl std::fmt::Display for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use itertools::Itertools;

        match self {
            TokenSet::Phonetic(map) => write!(f, "{{{}}}", map.keys().join(",")),
            TokenSet::Literal(ch) => write!(f, "'{}'", ch),
        }
    }
}

/// Source of phonetic readings.
///
/// Implementors only need to supply raw readings per character; splitting
/// them into initial and final and grouping them into [`TokenSet`]s is
/// shared.
pub trait Transliterate {
    /// plain (toneless) readings of `ch`; all readings when `heteronyms`
    /// is set, otherwise only the default one
    fn readings(&self, ch: char, heteronyms: bool) -> Vec<SmolStr>;

    /// every syllable this transliterator can produce
    fn inventory(&self) -> Vec<Syllable>;

    /// splits a plain syllable into initial and final
    fn decompose(&self, syllable: &str) -> Syllable {
        decompose(syllable)
    }

    /// one token set per character of `text`
    fn token_sets(&self, text: &str, heteronyms: bool) -> Vec<TokenSet> {
        text.chars()
            .map(|ch| {
                let readings = self.readings(ch, heteronyms);
                if readings.is_empty() {
                    TokenSet::Literal(ch)
                } else {
                    TokenSet::phonetic(readings.iter().map(|r| self.decompose(r)))
                }
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MapTransliterator;
    use super::*;

    #[test]
    fn unknown_characters_degrade_to_literals() {
        let t = MapTransliterator::new(&[('头', &["tou"])]);
        let sets = t.token_sets("头%", true);

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].first().unwrap().full, "tou");
        assert_eq!(sets[1], TokenSet::Literal('%'));
        assert_eq!(sets[1].syllables().count(), 0);
    }

    #[test]
    fn heteronyms_are_deduplicated() {
        let t = MapTransliterator::new(&[('了', &["le", "liao", "le"])]);

        let all = t.token_sets("了", true);
        assert_eq!(all[0].syllables().count(), 2);

        let single = t.token_sets("了", false);
        assert_eq!(single[0].syllables().count(), 1);
        assert_eq!(single[0].to_string(), "{le}");
    }
}
