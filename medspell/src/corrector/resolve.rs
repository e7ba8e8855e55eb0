//! Conflict resolution between overlapping hits.
use std::cmp::Ordering::Equal;

use super::matched::Hit;
use crate::vocabulary::{Layer, Lexicon};

/// What the resolver may do besides suppression.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rules {
    /// raise verbatim occurrences to 1.0
    pub(crate) promote_exact: bool,
    /// apply exact-length filter rules
    pub(crate) filter: bool,
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.max(b.0) < a.1.min(b.1)
}

/// Resolves `hits` over `chars` into non-overlapping hits sorted by offset.
pub(crate) fn resolve(
    mut hits: Vec<Hit>,
    lexicon: &Lexicon,
    layer: Layer,
    chars: &[char],
    rules: Rules,
) -> Vec<Hit> {
    let span = |hit: &Hit| (hit.offset, hit.offset + lexicon.get(hit.term).len(layer));

    if rules.promote_exact {
        for hit in hits.iter_mut() {
            let (start, end) = span(hit);
            let text = lexicon.get(hit.term).text(layer);
            if chars[start..end].iter().copied().eq(text.chars()) {
                hit.score = 1.0;
            }
        }
    }

    if rules.filter {
        hits.retain(|hit| {
            let term = lexicon.get(hit.term);
            match lexicon.exact_length(&term.expanded_text) {
                Some(_) if chars.len() != term.len(layer) => {
                    log::debug!("{} filtered: input length {}", term.text, chars.len());
                    false
                }
                _ => true,
            }
        });
    }

    hits.sort_by(|a, b| {
        let (a_start, a_end) = span(a);
        let (b_start, b_end) = span(b);

        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Equal)
            .then((b_end - b_start).cmp(&(a_end - a_start)))
            .then(a.offset.cmp(&b.offset))
            .then(a.term.cmp(&b.term))
    });

    let mut kept: Vec<Hit> = Vec::with_capacity(hits.len());
    for hit in hits {
        if kept.iter().all(|k| !overlaps(span(k), span(&hit))) {
            kept.push(hit);
        }
    }

    kept.sort_by_key(|hit| hit.offset);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::placeholder::Placeholders;
    use crate::tokenizer::testing::MapTransliterator;
    use crate::vocabulary::Vocabulary;

    const ALL: Rules = Rules {
        promote_exact: true,
        filter: true,
    };

    fn lexicon(terms: &[&str], exact_length: &[&str]) -> Lexicon {
        let t = MapTransliterator::new(&[]);
        let mut vocabulary = Vocabulary::new();
        for term in terms {
            vocabulary.add_term(term);
        }
        for term in exact_length {
            vocabulary.add_exact_length_rule(term);
        }
        Lexicon::compile(&vocabulary, &t, &Placeholders::default())
    }

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn hit(term: usize, offset: usize, score: f32) -> Hit {
        Hit {
            term,
            offset,
            score,
        }
    }

    #[test]
    fn exact_text_is_promoted() {
        let lexicon = lexicon(&["头孢"], &[]);
        let out = resolve(
            vec![hit(0, 1, 0.8075)],
            &lexicon,
            Layer::Expanded,
            &chars("吃头孢"),
            ALL,
        );
        assert_eq!(out, vec![hit(0, 1, 1.0)]);

        let out = resolve(
            vec![hit(0, 1, 0.8075)],
            &lexicon,
            Layer::Expanded,
            &chars("吃投孢"),
            ALL,
        );
        assert_eq!(out[0].score, 0.8075);
    }

    #[test]
    fn higher_score_suppresses_overlap() {
        let lexicon = lexicon(&["头孢", "包西林"], &[]);
        let out = resolve(
            vec![hit(1, 1, 0.87875), hit(0, 0, 0.8075)],
            &lexicon,
            Layer::Plain,
            &chars("头孢西林"),
            ALL,
        );
        assert_eq!(out, vec![hit(0, 0, 1.0)]);
    }

    #[test]
    fn equal_scores_prefer_longer_span() {
        let lexicon = lexicon(&["头孢", "包西林"], &[]);
        let out = resolve(
            vec![hit(0, 0, 0.9), hit(1, 1, 0.9)],
            &lexicon,
            Layer::Plain,
            &chars("投抱西林"),
            ALL,
        );
        assert_eq!(out, vec![hit(1, 1, 0.9)]);
    }

    #[test]
    fn output_never_overlaps() {
        let lexicon = lexicon(&["头孢", "包西林", "西林片"], &[]);
        let out = resolve(
            vec![
                hit(0, 0, 0.81),
                hit(1, 1, 0.88),
                hit(2, 2, 0.86),
                hit(0, 5, 0.81),
            ],
            &lexicon,
            Layer::Plain,
            &chars("投抱西灵偏投抱"),
            ALL,
        );

        assert_eq!(out, vec![hit(1, 1, 0.88), hit(0, 5, 0.81)]);
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                assert!(b.offset >= a.offset + lexicon.get(a.term).len(Layer::Plain));
            }
        }
    }

    #[test]
    fn exact_length_rule() {
        let lexicon = lexicon(&["头孢"], &["头孢"]);
        let hits = vec![hit(0, 1, 0.8)];

        assert!(resolve(hits.clone(), &lexicon, Layer::Expanded, &chars("吃投孢"), ALL).is_empty());

        let unfiltered = Rules {
            promote_exact: true,
            filter: false,
        };
        assert_eq!(
            resolve(hits, &lexicon, Layer::Expanded, &chars("吃投孢"), unfiltered).len(),
            1
        );

        let out = resolve(vec![hit(0, 0, 0.8)], &lexicon, Layer::Expanded, &chars("投孢"), ALL);
        assert_eq!(out.len(), 1);
    }
}
