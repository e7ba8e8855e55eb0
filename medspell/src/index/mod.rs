//! Per-syllable jump tables over the lexicon.
//!
//! For every syllable of the inventory the table stores which terms that
//! syllable may open (the head list) and what it scores at every later
//! position of every term (the tail). The matching worker never compares
//! syllables itself; it only looks scores up here.
use std::collections::BTreeMap;

use hashbrown::HashMap;
use rayon::prelude::*;
use smol_str::SmolStr;

mod entry;

pub use self::entry::JumpTableEntry;
use crate::fuzzy::FuzzyModel;
use crate::tokenizer::{Syllable, TokenSet};
use crate::types::{Score, TermId};
use crate::vocabulary::{Layer, Lexicon};

/// Unites syllable sources, deduplicated by full spelling.
pub fn collect_inventory<'a, I>(sources: I) -> Vec<Syllable>
where
    I: IntoIterator<Item = &'a Syllable>,
{
    let mut map = BTreeMap::new();
    for syllable in sources {
        map.entry(syllable.full.clone())
            .or_insert_with(|| syllable.clone());
    }
    map.into_values().collect()
}

/// best score of inventory syllable `s` against one term position
fn position_score(model: &FuzzyModel, s: &Syllable, position: &TokenSet) -> Score {
    position
        .syllables()
        .map(|u| model.similarity(s, u))
        .fold(0.0, Score::max)
}

/// Immutable lookup structure for one [`Layer`] of a lexicon.
#[derive(Debug)]
pub struct JumpTable {
    layer: Layer,
    entries: HashMap<SmolStr, JumpTableEntry>,
    offsets: Vec<usize>,
    lengths: Vec<usize>,
}

impl JumpTable {
    /// Builds entries for every inventory syllable, in parallel.
    pub fn build(
        lexicon: &Lexicon,
        layer: Layer,
        inventory: &[Syllable],
        model: &FuzzyModel,
    ) -> JumpTable {
        let start_threshold = model.calibration().start_threshold;
        let lengths: Vec<usize> = lexicon.terms().iter().map(|t| t.len(layer)).collect();

        let mut offsets = Vec::with_capacity(lengths.len());
        let mut tail_len = 0;
        for len in &lengths {
            offsets.push(tail_len);
            tail_len += len.saturating_sub(1);
        }

        let entries = inventory
            .par_iter()
            .map(|syllable| {
                let mut head = vec![];
                let mut tail = Vec::with_capacity(tail_len);

                for (id, term) in lexicon.terms().iter().enumerate() {
                    for (p, position) in term.tokens(layer).iter().enumerate() {
                        let score = position_score(model, syllable, position);

                        if p == 0 {
                            if score >= start_threshold {
                                head.push((id, score));
                            }
                        } else {
                            tail.push(score);
                        }
                    }
                }

                (
                    syllable.full.clone(),
                    JumpTableEntry::new(head, tail.into_boxed_slice()),
                )
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<HashMap<_, _>>();

        log::debug!(
            "{:?} jump table: {} syllables, {} terms",
            layer,
            inventory.len(),
            lengths.len()
        );

        JumpTable {
            layer,
            entries,
            offsets,
            lengths,
        }
    }

    /// layer of the lexicon this table covers
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// entry of `syllable`, if it is in the inventory
    pub fn entry(&self, syllable: &str) -> Option<&JumpTableEntry> {
        self.entries.get(syllable)
    }

    /// whether `syllable` is in the inventory
    pub fn contains(&self, syllable: &str) -> bool {
        self.entries.contains_key(syllable)
    }

    /// number of positions of term `id`
    pub fn term_len(&self, id: TermId) -> usize {
        self.lengths[id]
    }

    /// Terms `set` may open, with the best head score per term.
    pub fn head_scores(&self, set: &TokenSet) -> BTreeMap<TermId, Score> {
        let mut scores = BTreeMap::new();

        for entry in set.syllables().filter_map(|s| self.entry(&s.full)) {
            for &(id, score) in entry.head() {
                let best = scores.entry(id).or_insert(score);
                if score > *best {
                    *best = score;
                }
            }
        }

        scores
    }

    /// Best score `set` contributes at `position` (1-based) of term `id`.
    pub fn tail_score(&self, set: &TokenSet, id: TermId, position: usize) -> Score {
        if position < 1 || position >= self.lengths[id] {
            return 0.0;
        }

        let index = self.offsets[id] + position - 1;

        set.syllables()
            .filter_map(|s| self.entry(&s.full))
            .map(|entry| entry.tail(index))
            .fold(0.0, Score::max)
    }
}
