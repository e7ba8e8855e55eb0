use smol_str::SmolStr;

use super::matched::{Hit, Match};
use crate::tokenizer::placeholder::{strip, stripped_offset};
use crate::vocabulary::{Layer, Lexicon};

/// Replaces every hit span of `chars` by its term, then removes fillers.
///
/// `hits` must not overlap. Offsets of the returned matches refer to the
/// returned text.
pub(crate) fn rewrite(
    chars: &[char],
    hits: &[Hit],
    lexicon: &Lexicon,
    layer: Layer,
) -> (String, Vec<Match>) {
    let mut out = chars.to_vec();

    let mut order: Vec<&Hit> = hits.iter().collect();
    order.sort_by(|a, b| b.offset.cmp(&a.offset));

    for hit in order {
        let term = lexicon.get(hit.term);
        let end = hit.offset + term.len(layer);
        out.splice(hit.offset..end, term.text(layer).chars());
    }

    let mut matches: Vec<Match> = hits
        .iter()
        .map(|hit| {
            let term = lexicon.get(hit.term);
            Match::new(
                SmolStr::new(strip(term.text(layer))),
                stripped_offset(&out, hit.offset),
                hit.score,
            )
        })
        .collect();
    matches.sort();

    let text: String = out.into_iter().collect();
    (strip(&text), matches)
}
