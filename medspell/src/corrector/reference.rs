//! Index-free matcher.
//!
//! Compares every term at every start offset and walks every position, with
//! no jump table and no pruning. Far too slow for production use, but the
//! automaton must produce exactly the same hits.
use hashbrown::HashSet;
use smol_str::SmolStr;

use super::matched::Hit;
use crate::fuzzy::{Calibration, FuzzyModel};
use crate::tokenizer::TokenSet;
use crate::types::Score;
use crate::vocabulary::{Layer, Lexicon};

fn best_score(
    model: &FuzzyModel,
    inventory: &HashSet<SmolStr>,
    input: &TokenSet,
    position: &TokenSet,
) -> Score {
    input
        .syllables()
        .filter(|s| inventory.contains(&s.full))
        .map(|s| {
            position
                .syllables()
                .map(|u| model.similarity(s, u))
                .fold(0.0, Score::max)
        })
        .fold(0.0, Score::max)
}

/// Every accepted (term, offset, score) of `input` against one layer.
///
/// Input syllables outside `inventory` contribute nothing.
pub fn brute_force(
    lexicon: &Lexicon,
    layer: Layer,
    input: &[TokenSet],
    model: &FuzzyModel,
    inventory: &HashSet<SmolStr>,
) -> Vec<Hit> {
    let calibration = model.calibration();
    let n = input.len();
    let mut hits = vec![];

    for (id, term) in lexicon.terms().iter().enumerate() {
        let positions = term.tokens(layer);
        let len = positions.len();
        if len == 0 || len > n {
            continue;
        }

        let threshold = calibration.acceptance_threshold(len);

        'start: for start in 0..=n - len {
            let mut sum: Score = 0.0;

            for (p, position) in positions.iter().enumerate() {
                let score = best_score(model, inventory, &input[start + p], position);
                if p == 0 && score < calibration.start_threshold {
                    continue 'start;
                }
                sum += score;
            }

            if sum >= threshold {
                hits.push(Hit {
                    term: id,
                    offset: start,
                    score: Calibration::normalize(sum, len),
                });
            }
        }
    }

    hits
}
