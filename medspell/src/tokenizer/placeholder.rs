//! Alignment of characters without a native reading.
//!
//! A Latin letter such as `W` is spoken as several syllables ("da bu liu"),
//! so it must occupy several token positions. The rendered text keeps the
//! letter followed by [`FILLER`] characters, one per extra syllable, so
//! that character offsets and token offsets stay equal. After correction
//! the fillers are removed again and offsets shifted back.
use hashbrown::HashMap;

use super::{Syllable, TokenSet};

/// Character padding an expanded span.
pub const FILLER: char = '_';

type Reading = &'static [(&'static str, &'static str)];

const LETTERS: &[(char, &[Reading])] = &[
    ('a', &[&[("", "ei")]]),
    ('b', &[&[("b", "i")]]),
    ('c', &[&[("s", "ei")]]),
    ('d', &[&[("d", "i")]]),
    ('e', &[&[("", "i")]]),
    ('f', &[&[("", "ei")], &[("f", "")]]),
    ('g', &[&[("j", "i")]]),
    ('h', &[&[("", "ei")], &[("ch", "")]]),
    ('i', &[&[("", "ai")]]),
    ('j', &[&[("j", "ie")]]),
    ('k', &[&[("k", "ei")]]),
    ('l', &[&[("", "ei")], &[("l", "")]]),
    ('m', &[&[("", "ei")], &[("m", "")]]),
    ('n', &[&[("", "ei")], &[("n", "")]]),
    ('o', &[&[("", "ou")]]),
    ('p', &[&[("p", "i")]]),
    ('q', &[&[("k", "iou")]]),
    ('r', &[&[("", "a")]]),
    ('s', &[&[("", "ei")], &[("s", "")]]),
    ('t', &[&[("t", "i")]]),
    ('u', &[&[("", "iou")]]),
    ('v', &[&[("", "uei")]]),
    ('w', &[&[("d", "a")], &[("b", "")], &[("l", "iou")]]),
    ('x', &[&[("", "ai")], &[("k", "")], &[("s", "")]]),
    ('y', &[&[("", "uai")]]),
    ('z', &[&[("z", "ei")]]),
];

const SYMBOLS: &[(char, &[Reading])] = &[
    ('0', &[&[("l", "ing")]]),
    ('1', &[&[("", "i"), ("", "iao")]]),
    ('2', &[&[("", "er")]]),
    ('3', &[&[("s", "an")]]),
    ('4', &[&[("s", "i")]]),
    ('5', &[&[("", "u")]]),
    ('6', &[&[("l", "iou")]]),
    ('7', &[&[("q", "i")]]),
    ('8', &[&[("b", "a")]]),
    ('9', &[&[("j", "iou")]]),
    ('.', &[&[("d", "ian")]]),
];

fn to_spans(readings: &[Reading]) -> Vec<TokenSet> {
    readings
        .iter()
        .map(|reading| TokenSet::phonetic(reading.iter().map(|(i, r)| Syllable::new(i, r))))
        .collect()
}

/// Text and tokens after placeholder expansion; `chars[i]` renders `tokens[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expanded {
    /// rendered characters, fillers included
    pub chars: Vec<char>,
    /// one token set per rendered character
    pub tokens: Vec<TokenSet>,
}

impl Expanded {
    /// rendered text, fillers included
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

/// The special-reading table.
#[derive(Debug, Clone)]
pub struct Placeholders {
    table: HashMap<char, Vec<TokenSet>>,
}

impl Default for Placeholders {
    fn default() -> Self {
        let mut table = HashMap::new();

        for (ch, readings) in LETTERS {
            let spans = to_spans(readings);
            table.insert(ch.to_ascii_uppercase(), spans.clone());
            table.insert(*ch, spans);
        }

        for (ch, readings) in SYMBOLS {
            table.insert(*ch, to_spans(readings));
        }

        Placeholders { table }
    }
}

impl Placeholders {
    /// synthetic spans for `ch`, if it has any
    pub fn spans(&self, ch: char) -> Option<&[TokenSet]> {
        self.table.get(&ch).map(|v| v.as_slice())
    }

    /// every syllable used by the table
    pub fn syllables(&self) -> impl Iterator<Item = &Syllable> {
        self.table.values().flatten().flat_map(|set| set.syllables())
    }

    /// Expands `tokens` (one per character of `text`).
    ///
    /// Phonetic positions pass through. Literal positions with an entry in
    /// the table become that many spans, rendered as the character plus
    /// fillers. Remaining literals stay as single literal positions.
    pub fn expand(&self, text: &str, tokens: Vec<TokenSet>) -> Expanded {
        let mut chars = Vec::with_capacity(tokens.len());
        let mut out = Vec::with_capacity(tokens.len());

        for (ch, token) in text.chars().zip(tokens) {
            match (&token, self.spans(ch)) {
                (TokenSet::Literal(_), Some(spans)) => {
                    chars.push(ch);
                    chars.extend(std::iter::repeat(FILLER).take(spans.len() - 1));
                    out.extend(spans.iter().cloned());
                }
                _ => {
                    chars.push(ch);
                    out.push(token);
                }
            }
        }

        Expanded { chars, tokens: out }
    }
}

/// Removes every filler from `text`.
pub fn strip(text: &str) -> String {
    text.chars().filter(|c| *c != FILLER).collect()
}

/// Maps an offset into `chars` to the equivalent offset once fillers are removed.
pub fn stripped_offset(chars: &[char], offset: usize) -> usize {
    let fillers = chars[..offset.min(chars.len())]
        .iter()
        .filter(|c| **c == FILLER)
        .count();
    offset - fillers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::testing::MapTransliterator;
    use crate::tokenizer::Transliterate;

    fn transliterator() -> MapTransliterator {
        MapTransliterator::new(&[('吃', &["chi"]), ('头', &["tou"]), ('孢', &["bao"])])
    }

    #[test]
    fn letters_are_padded() {
        let t = transliterator();
        let text = "吃W头孢";
        let expanded = Placeholders::default().expand(text, t.token_sets(text, true));

        assert_eq!(expanded.text(), "吃W__头孢");
        assert_eq!(expanded.tokens.len(), expanded.chars.len());
        assert_eq!(expanded.tokens[1].first().unwrap().full, "da");
        assert_eq!(expanded.tokens[3].first().unwrap().full, "liou");
    }

    #[test]
    fn strip_restores_input() {
        let t = transliterator();
        let placeholders = Placeholders::default();

        for text in &["吃ABCDEFGHIJKLMNOPQRSTUVWXYZ", "头孢0.123456789", "x精 头", "孢"] {
            let expanded = placeholders.expand(text, t.token_sets(text, true));
            assert_eq!(strip(&expanded.text()), *text);
            assert_eq!(expanded.tokens.len(), expanded.chars.len());
        }
    }

    #[test]
    fn unmapped_literals_stay_single() {
        let t = transliterator();
        let expanded = Placeholders::default().expand("头%孢", t.token_sets("头%孢", true));

        assert_eq!(expanded.text(), "头%孢");
        assert_eq!(expanded.tokens[1], TokenSet::Literal('%'));
    }

    #[test]
    fn digit_one_has_two_readings() {
        let spans = Placeholders::default().spans('1').unwrap().to_vec();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].syllables().count(), 2);
    }

    #[test]
    fn offsets_skip_fillers() {
        let chars: Vec<char> = "吃W__头孢".chars().collect();
        assert_eq!(stripped_offset(&chars, 4), 2);
        assert_eq!(stripped_offset(&chars, 1), 1);
        assert_eq!(stripped_offset(&chars, 0), 0);
    }
}
