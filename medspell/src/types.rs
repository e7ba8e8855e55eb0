//! Shared scalar types.

/// Similarity score, in `[0, 1]` per syllable pair.
pub type Score = f32;

/// Position of a term within a compiled [`Lexicon`](crate::vocabulary::Lexicon).
pub type TermId = usize;
