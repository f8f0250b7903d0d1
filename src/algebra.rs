//! The word-parallel boolean algebra engine (§4.3).
//!
//! Handles the crucial edge case the rest of the crate is built around:
//! operands of different materialized lengths *and* different tail
//! polarities. The shorter operand's missing words are always synthesized
//! from its tail rather than skipped, so e.g. intersecting a finite set with
//! a cofinite one is correct in the high range.

use crate::word::WordStore;

/// The four algebraic operators over conceptual bit-sequences (§4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BitOp {
    And,
    Or,
    Xor,
    /// `A AND NOT B` — set difference.
    AndNot,
}

impl BitOp {
    #[inline]
    fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            BitOp::And => a & b,
            BitOp::Or => a | b,
            BitOp::Xor => a ^ b,
            BitOp::AndNot => a & !b,
        }
    }

    #[inline]
    fn apply_bool(self, a: bool, b: bool) -> bool {
        match self {
            BitOp::And => a && b,
            BitOp::Or => a || b,
            BitOp::Xor => a ^ b,
            BitOp::AndNot => a && !b,
        }
    }
}

/// Compute `a <op> b` as a fresh `WordStore`, honoring tail synthesis for
/// whichever operand is shorter.
pub(crate) fn combine(op: BitOp, a: &WordStore, b: &WordStore) -> WordStore {
    let s_max = a.size().max(b.size());
    let tail = op.apply_bool(a.tail(), b.tail());
    let mut words = Vec::with_capacity(s_max);
    for k in 0..s_max {
        words.push(op.apply(a.word_at(k), b.word_at(k)));
    }
    WordStore::from_parts(words, s_max, tail)
}

/// Compute `a <op>= b` in place: `a` becomes `a <op> b`. Grows `a`'s storage
/// up to `max(sizeA, sizeB)` before reading any word, so a self-referential
/// read never observes a partially-updated word.
pub(crate) fn combine_assign(op: BitOp, a: &mut WordStore, b: &WordStore) {
    *a = combine(op, a, b);
}
