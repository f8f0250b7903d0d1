//! Ordered iteration, positive/negative indexing, select-kth, and slicing
//! over the finite members of a [`crate::word::WordStore`] (§4.4).
//!
//! Iteration never mutates storage: each word is copied into a local
//! scratch variable before its set bits are extracted and cleared there.

use crate::bits;
use crate::error::IntBitSetError;
use crate::word::WordStore;

/// Ascending iterator over the finite members of a bitmap.
///
/// Does not observe `tail`: per §4.4, the default iterator yields only the
/// materialized (finite) part. Use [`crate::IntBitSet::is_infinite`] to
/// detect a cofinite set before relying on this being the whole set.
pub struct FiniteIter<'a> {
    store: &'a WordStore,
    word_idx: usize,
    scratch: u64,
}

impl<'a> FiniteIter<'a> {
    pub(crate) fn new(store: &'a WordStore) -> Self {
        let scratch = if store.size() > 0 { store.word_at(0) } else { 0 };
        FiniteIter {
            store,
            word_idx: 0,
            scratch,
        }
    }
}

impl<'a> Iterator for FiniteIter<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if self.word_idx >= self.store.size() {
                return None;
            }
            if let Some(pos) = bits::first_set_bit(self.scratch) {
                self.scratch = bits::clear(self.scratch, pos);
                return Some(self.word_idx as u64 * bits::WORD_BITS as u64 + pos as u64);
            }
            self.word_idx += 1;
            if self.word_idx < self.store.size() {
                self.scratch = self.store.word_at(self.word_idx);
            }
        }
    }
}

/// Locate the `k`-th smallest (0-indexed) finite member by scanning words
/// and accumulating popcounts (§4.4, "Select(k)").
pub(crate) fn nth_member(store: &WordStore, k: u64) -> Option<u64> {
    let mut remaining = k;
    for widx in 0..store.size() {
        let word = store.word_at(widx);
        let count = bits::popcount(word) as u64;
        if remaining < count {
            let mut w = word;
            for _ in 0..remaining {
                let lowest = bits::first_set_bit(w).expect("count checked above");
                w = bits::clear(w, lowest);
            }
            let pos = bits::first_set_bit(w).expect("count checked above");
            return Some(widx as u64 * bits::WORD_BITS as u64 + pos as u64);
        }
        remaining -= count;
    }
    None
}

/// Normalize a Python-style index (negative counts from the end) against
/// `length`, the finite popcount.
pub(crate) fn normalize_index(index: i64, length: usize) -> Result<u64, IntBitSetError> {
    let len = length as i64;
    let normalized = if index < 0 { index + len } else { index };
    if normalized < 0 || normalized >= len {
        Err(IntBitSetError::OutOfRange { index, length })
    } else {
        Ok(normalized as u64)
    }
}

/// Standard `(start, stop, step).indices(length)` slice normalization
/// (§4.4/§9), restricted to `step >= 1` per spec.md §4.4.
pub(crate) fn slice_indices(
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
    length: usize,
) -> Result<(usize, usize, usize), IntBitSetError> {
    if step == 0 {
        return Err(IntBitSetError::OutOfRange {
            index: step,
            length,
        });
    }
    if step < 0 {
        // Not required by spec.md (which only specifies step >= 1); reject
        // rather than guess at reverse-slice semantics.
        return Err(IntBitSetError::OutOfRange {
            index: step,
            length,
        });
    }
    let len = length as i64;
    let clamp = |v: i64| -> i64 {
        let v = if v < 0 { v + len } else { v };
        v.clamp(0, len)
    };
    let start = clamp(start.unwrap_or(0));
    let stop = clamp(stop.unwrap_or(len));
    Ok((start as usize, stop.max(start) as usize, step as usize))
}
