/*! Phonetic correction of speech-recognised text.

Speech recognisers frequently render rare vocabulary (drug names, most of
all) as characters that *sound* right but are spelled wrong. This crate
finds such spans by comparing pinyin readings against a fixed vocabulary
and rewrites them to the canonical term.

The pipeline:

1. the input is preprocessed and turned into one [`TokenSet`] per
   character, alphanumerics expanded by the [placeholder] normaliser,
2. a single left-to-right pass of the matching worker walks the
   precomputed [`JumpTable`](index::JumpTable),
3. overlapping candidates are resolved by score, then length,
4. the winners are written back and placeholder fillers stripped.

# Usage examples

```no_run
use medspell::corrector::{Corrector, CorrectorConfig};
use medspell::vocabulary::Vocabulary;

let mut vocabulary = Vocabulary::new();
vocabulary.add_term("美洛托尔");

let corrector = Corrector::new(vocabulary, CorrectorConfig::default());
let correction = corrector.correct("我吃了美洛拖尔一片");
assert_eq!(correction.text, "我吃了美洛托尔一片");
```

[`TokenSet`]: tokenizer::TokenSet
[placeholder]: tokenizer::placeholder
*/

#![warn(missing_docs)]
pub mod corrector;
pub mod fuzzy;
pub mod index;
pub mod tokenizer;
pub mod types;
pub mod vocabulary;

/// Installs `env_logger` for hosts without a logger of their own. Does
/// nothing if a logger is already set.
#[cfg(feature = "logging")]
pub fn enable_logging() {
    let _ = env_logger::try_init();
}
