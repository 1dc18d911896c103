//! Bit-packed membership set over [`VertexId`]s.
//!
//! The global visited set spans the whole article universe, so it stores one
//! bit per vertex.

use super::VertexId;

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Clone, Debug, Default)]
pub(crate) struct VertexSet {
    words: Vec<u64>,
    len: usize,
}

impl VertexSet {
    pub(crate) fn with_capacity(vertex_count: usize) -> Self {
        Self {
            words: vec![0; vertex_count.div_ceil(WORD_BITS)],
            len: 0,
        }
    }

    /// Inserts `vertex`, returning `true` when it was not already present.
    pub(crate) fn insert(&mut self, vertex: VertexId) -> bool {
        let (word, mask) = locate(vertex);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let Some(slot) = self.words.get_mut(word) else {
            return false;
        };
        if *slot & mask != 0 {
            return false;
        }
        *slot |= mask;
        self.len += 1;
        true
    }

    pub(crate) fn contains(&self, vertex: VertexId) -> bool {
        let (word, mask) = locate(vertex);
        self.words.get(word).is_some_and(|slot| slot & mask != 0)
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }
}

fn locate(vertex: VertexId) -> (usize, u64) {
    let index = vertex.index();
    (index >> 6, 1_u64 << (index & (WORD_BITS - 1)))
}
