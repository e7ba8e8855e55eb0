//! Phonetic correction of recognized text against a vocabulary.
use std::path::Path;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use self::matched::Hit;
use self::resolve::{resolve, Rules};
use self::worker::MatchWorker;
use crate::fuzzy::{Calibration, FuzzyLevel, FuzzyModel};
use crate::index::{collect_inventory, JumpTable};
use crate::tokenizer::placeholder::{Expanded, Placeholders, FILLER};
use crate::tokenizer::{PinyinTransliterator, TokenSet, Transliterate};
use crate::types::Score;
use crate::vocabulary::source::Dictionaries;
use crate::vocabulary::{Layer, Lexicon, Vocabulary};

mod candidate;
pub mod matched;
pub mod reference;
mod resolve;
mod rewrite;
mod worker;

pub use self::matched::{Correction, Match};

/// Characters removed before matching, unless configured otherwise.
pub const DEFAULT_PUNCTUATION: &str = "，；、。？！";

/// Errors that can occur while reading a [`CorrectorConfig`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration
    #[error("Invalid configuration")]
    Json(#[from] serde_json::Error),
}

/// Options of a [`Corrector`], readable from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectorConfig {
    /// calibration preset
    #[serde(default)]
    pub fuzzy_level: FuzzyLevel,
    /// terms added to the vocabulary at construction
    #[serde(default)]
    pub extra_terms: Vec<String>,
    /// replaces the preset's average threshold
    #[serde(default)]
    pub avg_threshold: Option<Score>,
    /// characters stripped before matching, [`DEFAULT_PUNCTUATION`] if unset;
    /// the placeholder filler is always stripped
    #[serde(default)]
    pub punctuation: Option<String>,
}

impl CorrectorConfig {
    /// normal level, no extra terms, default punctuation
    pub const fn default() -> CorrectorConfig {
        CorrectorConfig {
            fuzzy_level: FuzzyLevel::Normal,
            extra_terms: Vec::new(),
            avg_threshold: None,
            punctuation: None,
        }
    }

    /// Reads a JSON configuration; absent keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<CorrectorConfig, ConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// thresholds for the configured level and override
    pub fn calibration(&self) -> Calibration {
        let mut calibration = Calibration::for_level(self.fuzzy_level);
        if let Some(avg) = self.avg_threshold {
            calibration.avg_threshold = avg;
        }
        calibration
    }

    fn is_stripped(&self, ch: char) -> bool {
        ch == FILLER
            || self
                .punctuation
                .as_deref()
                .unwrap_or(DEFAULT_PUNCTUATION)
                .contains(ch)
    }
}

/// The correction engine: a compiled vocabulary with both jump tables.
///
/// Immutable once built; share it by reference (or in an `Arc`) between
/// threads.
#[derive(Debug)]
pub struct Corrector<T: Transliterate = PinyinTransliterator> {
    config: CorrectorConfig,
    transliterator: T,
    placeholders: Placeholders,
    replacements: Vec<(String, String)>,
    model: FuzzyModel,
    lexicon: Lexicon,
    inventory: HashSet<SmolStr>,
    plain: JumpTable,
    expanded: JumpTable,
}

impl Corrector<PinyinTransliterator> {
    /// a pinyin corrector over `vocabulary`
    pub fn new(vocabulary: Vocabulary, config: CorrectorConfig) -> Corrector {
        Corrector::from_dictionaries(
            Dictionaries {
                vocabulary,
                ..Dictionaries::default()
            },
            config,
        )
    }

    /// a pinyin corrector over loaded dictionary files
    pub fn from_dictionaries(dictionaries: Dictionaries, config: CorrectorConfig) -> Corrector {
        Corrector::with_transliterator(PinyinTransliterator, dictionaries, config)
    }
}

impl<T: Transliterate> Corrector<T> {
    /// Compiles the vocabulary and builds the jump tables.
    pub fn with_transliterator(
        transliterator: T,
        dictionaries: Dictionaries,
        config: CorrectorConfig,
    ) -> Corrector<T> {
        let Dictionaries {
            mut vocabulary,
            replacements,
            syllables,
        } = dictionaries;

        for term in &config.extra_terms {
            vocabulary.add_term(term);
        }

        let placeholders = Placeholders::default();
        let lexicon = Lexicon::compile(&vocabulary, &transliterator, &placeholders);

        let base = syllables.unwrap_or_else(|| transliterator.inventory());
        let syllables = collect_inventory(
            base.iter()
                .chain(placeholders.syllables())
                .chain(lexicon.terms().iter().flat_map(|term| {
                    term.expanded_tokens
                        .iter()
                        .chain(term.tokens.iter())
                        .flat_map(|set| set.syllables())
                })),
        );

        let model = FuzzyModel::new(config.calibration());
        let plain = JumpTable::build(&lexicon, Layer::Plain, &syllables, &model);
        let expanded = JumpTable::build(&lexicon, Layer::Expanded, &syllables, &model);

        log::debug!(
            "Corrector ready: {} terms, {} syllables, {} cached pairs",
            lexicon.terms().len(),
            syllables.len(),
            model.cached_pairs()
        );

        Corrector {
            config,
            transliterator,
            placeholders,
            replacements,
            model,
            lexicon,
            inventory: syllables.into_iter().map(|s| s.full).collect(),
            plain,
            expanded,
        }
    }

    /// configuration in use
    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// compiled terms
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Strips punctuation and fillers, then applies the replacement rules in order.
    pub fn preprocess(&self, text: &str) -> String {
        let mut text: String = text.chars().filter(|c| !self.config.is_stripped(*c)).collect();

        for (bad, good) in &self.replacements {
            if text.contains(bad.as_str()) {
                text = text.replace(bad.as_str(), good);
            }
        }

        text
    }

    /// Preprocessed token sets of `text`, placeholder-expanded if `expand` is set.
    pub fn tokenize(&self, text: &str, expand: bool) -> Expanded {
        let text = self.preprocess(text);
        let tokens = self.transliterator.token_sets(&text, true);

        if expand {
            self.placeholders.expand(&text, tokens)
        } else {
            Expanded {
                chars: text.chars().collect(),
                tokens,
            }
        }
    }

    fn table(&self, layer: Layer) -> &JumpTable {
        match layer {
            Layer::Plain => &self.plain,
            Layer::Expanded => &self.expanded,
        }
    }

    fn run(&self, layer: Layer, input: &[TokenSet]) -> Vec<Hit> {
        MatchWorker::new(self.table(layer), self.model.calibration(), input).run()
    }

    /// Corrects `text`, returning the rewritten text and the accepted matches.
    ///
    /// When nothing matches, the preprocessed text is returned unchanged.
    pub fn correct(&self, text: &str) -> Correction {
        let expanded = self.tokenize(text, true);
        let hits = self.run(Layer::Expanded, &expanded.tokens);

        log::debug!("{} raw hits in {:?}", hits.len(), expanded.text());

        let hits = resolve(
            hits,
            &self.lexicon,
            Layer::Expanded,
            &expanded.chars,
            Rules {
                promote_exact: true,
                filter: true,
            },
        );

        let (text, matches) = rewrite::rewrite(&expanded.chars, &hits, &self.lexicon, Layer::Expanded);
        Correction { text, matches }
    }

    /// Matches against the plain jump table, without placeholder expansion
    /// or exact-text promotion. Offsets refer to the preprocessed text.
    pub fn matches_plain(&self, text: &str) -> Vec<Match> {
        let input = self.tokenize(text, false);
        let hits = self.run(Layer::Plain, &input.tokens);

        let hits = resolve(
            hits,
            &self.lexicon,
            Layer::Plain,
            &input.chars,
            Rules {
                promote_exact: false,
                filter: true,
            },
        );

        hits.into_iter().map(|hit| self.to_match(hit, Layer::Plain)).collect()
    }

    /// Unresolved hits of `text` from the index-free matcher.
    pub fn reference_matches(&self, text: &str, layer: Layer) -> Vec<Match> {
        let input = self.tokenize(text, layer == Layer::Expanded);
        let mut matches: Vec<Match> = reference::brute_force(
            &self.lexicon,
            layer,
            &input.tokens,
            &self.model,
            &self.inventory,
        )
        .into_iter()
        .map(|hit| self.to_match(hit, layer))
        .collect();
        matches.sort();
        matches
    }

    /// Unresolved hits of `text` from the automaton.
    pub fn raw_matches(&self, text: &str, layer: Layer) -> Vec<Match> {
        let input = self.tokenize(text, layer == Layer::Expanded);
        let mut matches: Vec<Match> = self
            .run(layer, &input.tokens)
            .into_iter()
            .map(|hit| self.to_match(hit, layer))
            .collect();
        matches.sort();
        matches
    }

    fn to_match(&self, hit: Hit, layer: Layer) -> Match {
        Match::new(
            SmolStr::new(self.lexicon.get(hit.term).text(layer)),
            hit.offset,
            hit.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::source::Dictionaries;

    fn corrector(terms: &[&str]) -> Corrector {
        let mut vocabulary = Vocabulary::new();
        for term in terms {
            vocabulary.add_term(term);
        }
        Corrector::new(vocabulary, CorrectorConfig::default())
    }

    #[test]
    fn verbatim_term_scores_one() {
        let c = corrector(&["头孢", "托西"]);
        let out = c.correct("我今天吃了头孢两片");

        assert_eq!(out.text, "我今天吃了头孢两片");
        assert_eq!(out.matches, vec![Match::new("头孢".into(), 5, 1.0)]);
    }

    #[test]
    fn close_rendering_is_rewritten() {
        let c = corrector(&["美洛托尔"]);
        let out = c.correct("我吃了美洛拖尔一片");

        assert_eq!(out.text, "我吃了美洛托尔一片");
        assert_eq!(out.matches.len(), 1);

        let m = &out.matches[0];
        assert_eq!(m.term(), "美洛托尔");
        assert_eq!(m.offset, 3);
        assert!(m.score > 0.9 && m.score < 1.0);
    }

    #[test]
    fn exact_length_terms_only_match_whole_input() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.add_exact_length_rule("头孢");
        vocabulary.add_term("头孢");
        let c = Corrector::new(vocabulary, CorrectorConfig::default());

        assert!(c.correct("吃头孢").matches.is_empty());
        assert_eq!(c.correct("头孢").matches.len(), 1);
    }

    #[test]
    fn letters_do_not_shift_offsets() {
        let c = corrector(&["头孢"]);

        let out = c.correct("吃了W头孢");
        assert_eq!(out.text, "吃了W头孢");
        assert_eq!(out.matches, vec![Match::new("头孢".into(), 3, 1.0)]);

        let out = c.correct("吃了2头孢");
        assert_eq!(out.matches[0].offset, 3);
    }

    #[test]
    fn spoken_letters_become_placeholders() {
        let c = corrector(&["酵素W"]);
        let out = c.correct("我吃了酵素打不溜");

        assert_eq!(out.text, "我吃了酵素W");
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].term(), "酵素W");
        assert_eq!(out.matches[0].offset, 3);
        assert!((out.matches[0].score - 0.86).abs() < 1e-5);
    }

    #[test]
    fn overlapping_terms_keep_the_best() {
        let c = corrector(&["头孢", "包西林"]);
        let out = c.correct("头孢西林");

        assert_eq!(out.matches, vec![Match::new("头孢".into(), 0, 1.0)]);
        assert_eq!(out.text, "头孢西林");
    }

    #[test]
    fn no_match_returns_preprocessed_text() {
        let c = corrector(&["头孢"]);
        let out = c.correct("今天，天气不错！");

        assert_eq!(out.text, "今天天气不错");
        assert!(out.matches.is_empty());
    }

    #[test]
    fn replacements_and_extra_terms() {
        let mut config = CorrectorConfig::default();
        config.extra_terms = vec!["阿莫西林".to_string()];

        let c = Corrector::from_dictionaries(
            Dictionaries {
                replacements: vec![("阿摸".to_string(), "阿莫".to_string())],
                ..Dictionaries::default()
            },
            config,
        );

        assert_eq!(c.preprocess("阿摸西林_"), "阿莫西林");
        assert_eq!(c.correct("阿摸西林").matches[0].score, 1.0);
    }

    #[test]
    fn automaton_agrees_with_reference() {
        let c = corrector(&["头孢", "美洛托尔", "阿莫西林", "酵素W"]);

        for text in ["我吃了美洛拖尔一片", "阿莫西林胶囊", "投抱", "酵素打不溜W"] {
            for layer in [Layer::Plain, Layer::Expanded] {
                assert_eq!(c.raw_matches(text, layer), c.reference_matches(text, layer));
            }
        }
    }

    #[test]
    fn plain_path_does_not_promote() {
        let c = corrector(&["头孢"]);
        let matches = c.matches_plain("吃头孢");

        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - 0.8075).abs() < 1e-5);
    }

    #[test]
    fn config_from_json() {
        let config: CorrectorConfig =
            serde_json::from_str(r#"{"fuzzyLevel": "moreStrict", "extraTerms": ["头孢"]}"#)
                .unwrap();

        assert_eq!(config.fuzzy_level, FuzzyLevel::MoreStrict);
        assert_eq!(config.extra_terms.len(), 1);
        assert_eq!(config.calibration().avg_threshold, 0.78);

        let config: CorrectorConfig = serde_json::from_str(r#"{"avgThreshold": 0.5}"#).unwrap();
        assert_eq!(config.calibration().avg_threshold, 0.5);
        assert!(config.is_stripped('，'));
        assert!(config.is_stripped(FILLER));
    }
}
