//! Terms the corrector searches for.
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub mod source;

use crate::tokenizer::placeholder::{Expanded, Placeholders};
use crate::tokenizer::{TokenSet, Transliterate};
use crate::types::TermId;

/// Tag of a vocabulary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// symptoms and signs
    Symptom,
    /// measured indicators
    Examination,
    /// drug names; the only matchable category
    Medication,
}

impl std::str::FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "症状-体征" | "symptom" => Ok(Category::Symptom),
            "监测指标" | "examination" => Ok(Category::Examination),
            "药物" | "medication" => Ok(Category::Medication),
            _ => Err(()),
        }
    }
}

/// Raw vocabulary: term texts plus loading rules, before tokenization.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<SmolStr>,
    seen: HashSet<SmolStr>,
    retained: HashMap<Category, Vec<SmolStr>>,
    exact_length: HashSet<SmolStr>,
}

impl Vocabulary {
    /// an empty vocabulary
    pub fn new() -> Vocabulary {
        Vocabulary::default()
    }

    /// Adds a matchable term. Returns whether it was added.
    ///
    /// Terms shorter than two characters are rejected; repeats are ignored.
    pub fn add_term(&mut self, text: &str) -> bool {
        if text.chars().count() < 2 {
            log::error!("cannot add correction term with length < 2: {:?}", text);
            return false;
        }

        if !self.seen.insert(SmolStr::new(text)) {
            return false;
        }

        self.terms.push(SmolStr::new(text));
        true
    }

    /// Adds a tagged record. Only medication records become matchable.
    pub fn add_record(&mut self, text: &str, category: &str) {
        match category.parse::<Category>() {
            Ok(Category::Medication) => {
                self.add_term(text);
            }
            Ok(other) => self
                .retained
                .entry(other)
                .or_default()
                .push(SmolStr::new(text)),
            Err(_) => log::warn!("Unrecognized data {} {}", text, category),
        }
    }

    /// Marks `text` as matching only when it is the whole input.
    pub fn add_exact_length_rule(&mut self, text: &str) {
        self.exact_length.insert(SmolStr::new(text));
    }

    /// matchable terms in insertion order
    pub fn terms(&self) -> &[SmolStr] {
        &self.terms
    }

    /// non-matchable records of `category`
    pub fn retained(&self, category: Category) -> &[SmolStr] {
        self.retained
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// number of matchable terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// whether there are no matchable terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A tokenized term.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// canonical display text
    pub text: SmolStr,
    /// default reading per character
    pub tokens: Vec<TokenSet>,
    /// display text with placeholder fillers
    pub expanded_text: SmolStr,
    /// tokens aligned with `expanded_text`
    pub expanded_tokens: Vec<TokenSet>,
}

/// Which token sequence of a term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// one position per character
    Plain,
    /// placeholder-expanded positions
    Expanded,
}

impl Term {
    /// tokens of the given layer
    pub fn tokens(&self, layer: Layer) -> &[TokenSet] {
        match layer {
            Layer::Plain => &self.tokens,
            Layer::Expanded => &self.expanded_tokens,
        }
    }

    /// text of the given layer
    pub fn text(&self, layer: Layer) -> &str {
        match layer {
            Layer::Plain => &self.text,
            Layer::Expanded => &self.expanded_text,
        }
    }

    /// number of positions in the given layer
    pub fn len(&self, layer: Layer) -> usize {
        self.tokens(layer).len()
    }
}

/// Compiled vocabulary: terms indexed by [`TermId`].
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    terms: Vec<Term>,
    exact_length: HashMap<SmolStr, usize>,
}

impl Lexicon {
    /// Tokenizes every term of `vocabulary`.
    pub fn compile<T: Transliterate>(
        vocabulary: &Vocabulary,
        transliterator: &T,
        placeholders: &Placeholders,
    ) -> Lexicon {
        let mut exact_length = HashMap::new();

        let terms = vocabulary
            .terms()
            .iter()
            .map(|text| {
                let tokens = transliterator.token_sets(text, false);
                let Expanded {
                    chars,
                    tokens: expanded_tokens,
                } = placeholders.expand(text, tokens.clone());
                let expanded_text: SmolStr = chars.iter().collect::<String>().into();

                if vocabulary.exact_length.contains(text) {
                    exact_length.insert(expanded_text.clone(), chars.len());
                }

                Term {
                    text: text.clone(),
                    tokens,
                    expanded_text,
                    expanded_tokens,
                }
            })
            .collect();

        Lexicon {
            terms,
            exact_length,
        }
    }

    /// the term with id `id`
    pub fn get(&self, id: TermId) -> &Term {
        &self.terms[id]
    }

    /// all terms, position is the [`TermId`]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Input length an expanded term is restricted to, if it has a rule.
    pub fn exact_length(&self, expanded_text: &str) -> Option<usize> {
        self.exact_length.get(expanded_text).copied()
    }
}
