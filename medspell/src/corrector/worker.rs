use super::candidate::{MatchCandidate, Verdict};
use super::matched::Hit;
use crate::fuzzy::Calibration;
use crate::index::JumpTable;
use crate::tokenizer::TokenSet;

/// Single left-to-right pass of the matching automaton over one input.
pub(crate) struct MatchWorker<'a> {
    table: &'a JumpTable,
    calibration: &'a Calibration,
    input: &'a [TokenSet],
}

impl<'a> MatchWorker<'a> {
    pub(crate) fn new(
        table: &'a JumpTable,
        calibration: &'a Calibration,
        input: &'a [TokenSet],
    ) -> MatchWorker<'a> {
        MatchWorker {
            table,
            calibration,
            input,
        }
    }

    fn extend(&self, live: &mut [MatchCandidate], set: &TokenSet) {
        for candidate in live.iter_mut() {
            candidate.position += 1;
            candidate.score += self
                .table
                .tail_score(set, candidate.term, candidate.position);
        }
    }

    fn spawn(&self, live: &mut Vec<MatchCandidate>, i: usize, set: &TokenSet) {
        let n = self.input.len();

        for (term, score) in self.table.head_scores(set) {
            let len = self.table.term_len(term);
            if i + len <= n {
                live.push(MatchCandidate::new(term, len, i, score, self.calibration));
            }
        }
    }

    /// Adds the tail scores of the positions not yet walked.
    fn finish(&self, candidate: &MatchCandidate) -> Hit {
        let mut sum = candidate.score;

        for p in candidate.position + 1..candidate.len {
            sum += self
                .table
                .tail_score(&self.input[candidate.start + p], candidate.term, p);
        }

        Hit {
            term: candidate.term,
            offset: candidate.start,
            score: Calibration::normalize(sum, candidate.len),
        }
    }

    pub(crate) fn run(&self) -> Vec<Hit> {
        log::trace!("Beginning match over {} positions", self.input.len());

        let mut live: Vec<MatchCandidate> = vec![];
        let mut hits = vec![];

        for (i, set) in self.input.iter().enumerate() {
            self.extend(&mut live, set);
            self.spawn(&mut live, i, set);

            let before = live.len();
            live.retain(|candidate| match candidate.verdict() {
                Verdict::Pass => {
                    hits.push(self.finish(candidate));
                    false
                }
                Verdict::Prune => false,
                Verdict::Continue => true,
            });

            log::trace!(
                "{} {}: {} live, {} stopped",
                i,
                set,
                live.len(),
                before - live.len()
            );
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corrector::reference::brute_force;
    use crate::fuzzy::{FuzzyLevel, FuzzyModel};
    use crate::tokenizer::placeholder::Placeholders;
    use crate::tokenizer::testing::MapTransliterator;
    use crate::tokenizer::Transliterate;
    use crate::vocabulary::{Layer, Lexicon, Vocabulary};
    use hashbrown::HashSet;
    use smol_str::SmolStr;

    struct Fixture {
        t: MapTransliterator,
        lexicon: Lexicon,
        model: FuzzyModel,
        table: JumpTable,
        inventory: HashSet<SmolStr>,
    }

    fn fixture(terms: &[&str], level: FuzzyLevel) -> Fixture {
        let t = MapTransliterator::new(&[
            ('头', &["tou"]),
            ('投', &["tou"]),
            ('孢', &["bao"]),
            ('包', &["bao"]),
            ('抱', &["bao"]),
            ('托', &["tuo"]),
            ('西', &["xi"]),
            ('林', &["lin"]),
            ('灵', &["ling"]),
            ('美', &["mei"]),
            ('洛', &["luo"]),
            ('罗', &["luo"]),
            ('诺', &["nuo"]),
            ('尔', &["er"]),
            ('二', &["er"]),
            ('吃', &["chi"]),
            ('次', &["ci"]),
            ('了', &["le", "liao"]),
            ('片', &["pian"]),
            ('偏', &["pian"]),
            ('阿', &["a", "e"]),
            ('莫', &["mo"]),
            ('沙', &["sha"]),
            ('萨', &["sa"]),
        ]);
        let mut vocabulary = Vocabulary::new();
        for term in terms {
            vocabulary.add_term(term);
        }
        let lexicon = Lexicon::compile(&vocabulary, &t, &Placeholders::default());
        let model = FuzzyModel::new(Calibration::for_level(level));
        let syllables = t.inventory();
        let table = JumpTable::build(&lexicon, Layer::Plain, &syllables, &model);
        let inventory = syllables.into_iter().map(|s| s.full).collect();

        Fixture {
            t,
            lexicon,
            model,
            table,
            inventory,
        }
    }

    fn sorted(mut hits: Vec<Hit>) -> Vec<Hit> {
        hits.sort_by(|a, b| a.offset.cmp(&b.offset).then(a.term.cmp(&b.term)));
        hits
    }

    impl Fixture {
        fn run(&self, text: &str) -> Vec<Hit> {
            let input = self.t.token_sets(text, true);
            sorted(MatchWorker::new(&self.table, self.model.calibration(), &input).run())
        }

        fn reference(&self, text: &str) -> Vec<Hit> {
            let input = self.t.token_sets(text, true);
            sorted(brute_force(
                &self.lexicon,
                Layer::Plain,
                &input,
                &self.model,
                &self.inventory,
            ))
        }
    }

    #[test]
    fn exact_occurrence() {
        let f = fixture(&["头孢", "托西"], FuzzyLevel::Normal);
        let hits = f.run("吃了头孢");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, 0);
        assert_eq!(hits[0].offset, 2);
        assert!((hits[0].score - 0.8075).abs() < 1e-5);
    }

    #[test]
    fn finishes_early_with_tail_scores() {
        let f = fixture(&["美洛托尔"], FuzzyLevel::Normal);

        // threshold 2.8 is reached after three positions; the fourth is
        // read from the tail table
        let hits = f.run("美罗托二片");
        assert_eq!(hits.len(), 1);
        assert!((hits[0].score - 0.95).abs() < 1e-5);

        let hits = f.run("美罗托片");
        assert_eq!(hits.len(), 1);
        assert!((hits[0].score - 0.7125).abs() < 1e-5);
    }

    #[test]
    fn candidates_never_run_past_the_input() {
        let f = fixture(&["美洛托尔"], FuzzyLevel::Normal);
        assert!(f.run("美罗托").is_empty());
        assert!(f.reference("美罗托").is_empty());
    }

    #[test]
    fn weak_openings_do_not_spawn() {
        let f = fixture(&["头孢"], FuzzyLevel::Normal);
        // tuo only shares the initial with tou
        assert!(f.run("托孢").is_empty());

        let f = fixture(&["头孢"], FuzzyLevel::MoreFuzzy);
        assert_eq!(f.run("托孢").len(), 1);
    }

    #[test]
    fn matches_reference() {
        let terms = ["头孢", "包西林", "美洛托尔", "阿莫西林", "托西", "洛萨"];
        let inputs = [
            "吃了头孢",
            "头孢西林",
            "投抱西灵",
            "美罗托二吃了阿莫西林",
            "阿莫沙灵片片",
            "诺沙了头包次",
            "偏头痛吃什么",
            "了了了了",
            "",
            "头",
        ];

        for level in [FuzzyLevel::Normal, FuzzyLevel::MoreFuzzy, FuzzyLevel::MoreStrict] {
            let f = fixture(&terms, level);
            for input in inputs {
                assert_eq!(f.run(input), f.reference(input), "{:?} {:?}", level, input);
            }
        }
    }

    #[test]
    fn pruning_keeps_every_reference_match() {
        let f = fixture(&["阿莫西林", "美洛托尔"], FuzzyLevel::MoreFuzzy);

        for input in ["阿莫沙灵", "阿诺西二", "美洛次尔", "萨莫西林", "美诺托"] {
            let indexed = f.run(input);
            for hit in f.reference(input) {
                assert!(indexed.contains(&hit), "{:?} lost {:?}", input, hit);
            }
        }
    }
}
