use crate::types::{Score, TermId};

/// Head list and flattened tail of one syllable.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpTableEntry {
    head: Vec<(TermId, Score)>,
    tail: Box<[Score]>,
}

impl JumpTableEntry {
    pub(crate) fn new(head: Vec<(TermId, Score)>, tail: Box<[Score]>) -> JumpTableEntry {
        JumpTableEntry { head, tail }
    }

    /// terms this syllable may open, with the opening score
    pub fn head(&self) -> &[(TermId, Score)] {
        &self.head
    }

    #[inline(always)]
    pub(crate) fn tail(&self, index: usize) -> Score {
        self.tail[index]
    }
}
