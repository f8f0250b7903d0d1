//! intbitset: a dense bit-array set of non-negative integers with a
//! cofinite tail bit.
//!
//! Every [`IntBitSet`] carries one extra bit of state beyond its
//! materialized words: `tail`. When `tail` is `false` the set is an
//! ordinary finite subset of the naturals. When `tail` is `true`, every
//! integer at or beyond the materialized range is also considered a
//! member, so the set represents the complement of a finite set
//! (a *cofinite* set). Union, intersection, difference, symmetric
//! difference, membership, iteration, indexing, and slicing all honor this
//! dual nature uniformly — see `DESIGN.md` for the invariants this crate
//! maintains.
#![deny(missing_docs)]

mod algebra;
mod bits;
mod codec;
/// Error types returned by fallible operations.
pub mod error;
/// Ordered iteration, select-kth, and slicing over finite members.
pub mod iter;
mod word;

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Sub};

use algebra::BitOp;
pub use error::IntBitSetError;
pub use iter::FiniteIter;
use word::WordStore;

/// A dense, growable set of non-negative integers with a cofinite tail bit.
///
/// See the crate-level docs for the finite/cofinite duality this type
/// maintains across every operation.
#[derive(Clone, PartialEq, Eq)]
pub struct IntBitSet {
    store: WordStore,
}

impl fmt::Debug for IntBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntBitSet")
            .field("len", &self.len())
            .field("tail", &self.is_infinite())
            .field("size", &self.get_size())
            .field("allocated", &self.get_allocated())
            .finish()
    }
}

impl Default for IntBitSet {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------
// Constructors (§6)
// ---------------------------------------------------------------------

impl IntBitSet {
    /// An empty finite set (`tail = false`).
    pub fn new() -> Self {
        IntBitSet {
            store: WordStore::new(false),
        }
    }

    /// An empty set with the given initial tail. `tail = true` yields the
    /// cofinite set of *all* non-negative integers.
    pub fn with_tail(tail: bool) -> Self {
        IntBitSet {
            store: WordStore::new(tail),
        }
    }

    /// Build a finite set from an iterable of non-negative integers.
    pub fn from_values<I: IntoIterator<Item = u64>>(values: I) -> Self {
        let mut set = Self::new();
        for v in values {
            set.add(v);
        }
        set
    }

    /// Build a set from an iterable of non-negative integers, then apply
    /// `tail` as the initial trailing-bits flag (§6: "optional
    /// `trailing_bits` boolean that sets the initial tail after the finite
    /// contents are laid down").
    pub fn from_values_with_tail<I: IntoIterator<Item = u64>>(values: I, tail: bool) -> Self {
        let set = Self::from_values(values);
        if tail == set.store.tail() {
            return set;
        }
        IntBitSet {
            store: WordStore::from_parts(set.store.words().to_vec(), set.store.size(), tail),
        }
    }

    /// Build a finite set from an iterable of single-element tuples,
    /// the legacy record-id-pair affordance from §6: the tuple's first
    /// (only) element is used as the member.
    pub fn from_pairs<I: IntoIterator<Item = (u64,)>>(values: I) -> Self {
        Self::from_values(values.into_iter().map(|(v,)| v))
    }

    /// Build a set from an iterable of single-element tuples (as
    /// [`IntBitSet::from_pairs`]), then apply `tail` as the initial
    /// trailing-bits flag, same as [`IntBitSet::from_values_with_tail`]
    /// does for plain integers (§6: every constructor variant accepts the
    /// optional `trailing_bits` flag).
    pub fn from_pairs_with_tail<I: IntoIterator<Item = (u64,)>>(values: I, tail: bool) -> Self {
        Self::from_values_with_tail(values.into_iter().map(|(v,)| v), tail)
    }

    /// Build a set from an iterable of possibly-negative integers,
    /// validating each against the non-negative domain (§7 `DomainError`).
    /// Leaves no partial result on failure (strong exception safety, §7).
    pub fn try_from_values<I: IntoIterator<Item = i64>>(
        values: I,
    ) -> Result<Self, IntBitSetError> {
        let mut checked = Vec::new();
        for v in values {
            if v < 0 {
                return Err(IntBitSetError::DomainError(v));
            }
            checked.push(v as u64);
        }
        Ok(Self::from_values(checked))
    }

    /// Deserialize a set from a [`fastdump`](IntBitSet::fastdump) buffer
    /// (§4.6 "Load").
    pub fn from_bytes(data: &[u8]) -> Result<Self, IntBitSetError> {
        Ok(IntBitSet {
            store: codec::fastload(data)?,
        })
    }

    /// Alias of [`IntBitSet::from_bytes`] under its abstract serialization name.
    pub fn fastload(data: &[u8]) -> Result<Self, IntBitSetError> {
        Self::from_bytes(data)
    }

    /// A deep copy of this set (identical to [`Clone::clone`]; exposed
    /// as an explicit named method).
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// A deep copy of this set (identical to [`Clone::clone`]; exposed
    /// as an explicit named method).
    pub fn deepcopy(&self) -> Self {
        self.clone()
    }
}

// ---------------------------------------------------------------------
// Mutation API (§4.5)
// ---------------------------------------------------------------------

impl IntBitSet {
    /// Add `n` to the set. Idempotent.
    pub fn add(&mut self, n: u64) {
        if !self.store.test(n) {
            self.store.set(n);
        }
    }

    /// Add `n` to the set, validating non-negativity first (§7
    /// `DomainError`). Prefer [`IntBitSet::add`] when `n` is already a
    /// `u64`.
    pub fn try_add(&mut self, n: i64) -> Result<(), IntBitSetError> {
        if n < 0 {
            return Err(IntBitSetError::DomainError(n));
        }
        self.add(n as u64);
        Ok(())
    }

    /// `true` iff `n` is a member: either explicitly set, or `n` falls
    /// beyond the materialized range of a cofinite set (§4.2 `test`).
    pub fn contains(&self, n: u64) -> bool {
        self.store.test(n)
    }

    /// Remove `n` from the set if present. Never fails.
    pub fn discard(&mut self, n: u64) {
        self.store.clear_bit(n);
    }

    /// Remove `n` from the set, failing if it was not a member (§7
    /// `MissingElement`).
    pub fn remove(&mut self, n: u64) -> Result<(), IntBitSetError> {
        if !self.store.test(n) {
            return Err(IntBitSetError::MissingElement(n));
        }
        self.store.clear_bit(n);
        Ok(())
    }

    /// Remove and return the largest finite member, failing with
    /// `EmptySet` if none exists (regardless of tail, §4.5/§9).
    pub fn pop(&mut self) -> Result<u64, IntBitSetError> {
        let max = self.iter().last().ok_or(IntBitSetError::EmptySet)?;
        self.store.clear_bit(max);
        Ok(max)
    }

    /// Reset to the empty finite set: `tail = false`, `size = 0` (§4.5).
    pub fn clear(&mut self) {
        self.store.clear_all();
    }

    /// For each `(member, sign)` pair, add the member if `sign > 0`,
    /// otherwise discard it (§4.5).
    pub fn update_with_signs<I: IntoIterator<Item = (u64, i8)>>(&mut self, signs: I) {
        for (member, sign) in signs {
            if sign > 0 {
                self.add(member);
            } else {
                self.discard(member);
            }
        }
    }

    /// Discard every element of an arbitrary iterable of non-negative
    /// integers. The one cross-type in-place operation spec.md requires to
    /// *succeed* against a non-`IntBitSet` operand (§4.7/§9, scenario S9).
    ///
    /// Exposed as a named method rather than `-=` because `&IntBitSet`
    /// itself implements `IntoIterator<Item = u64>` (§6) — a single type
    /// can't be both the concrete `SubAssign<&IntBitSet>` receiver and a
    /// blanket `SubAssign<impl IntoIterator<Item = u64>>` receiver without
    /// an overlapping-impl error. `DESIGN.md` records this Open Question
    /// resolution.
    pub fn discard_all<I: IntoIterator<Item = u64>>(&mut self, items: I) {
        for item in items {
            self.discard(item);
        }
    }
}

// ---------------------------------------------------------------------
// Iteration, indexing, select, slicing (§4.4)
// ---------------------------------------------------------------------

impl IntBitSet {
    /// Ascending iterator over the finite members of this set. Does not
    /// observe `tail`; see [`IntBitSet::is_infinite`].
    pub fn iter(&self) -> FiniteIter<'_> {
        FiniteIter::new(&self.store)
    }

    /// The element at position `index` among the finite members in
    /// ascending order, Python-style (negative indices count from the
    /// end). Fails with `OutOfRange` outside `[-len, len)`.
    pub fn get(&self, index: i64) -> Result<u64, IntBitSetError> {
        let length = self.len() as usize;
        let normalized = iter::normalize_index(index, length)?;
        iter::nth_member(&self.store, normalized).ok_or(IntBitSetError::OutOfRange {
            index,
            length,
        })
    }

    /// A new set containing the members selected by `start:stop:step`
    /// (standard slice semantics against `len()`, §4.4). `step` must be
    /// `>= 1`.
    pub fn slice(
        &self,
        start: Option<i64>,
        stop: Option<i64>,
        step: i64,
    ) -> Result<Self, IntBitSetError> {
        let length = self.len() as usize;
        let (start, stop, step) = iter::slice_indices(start, stop, step, length)?;
        let mut members = Vec::new();
        let mut idx = start;
        while idx < stop {
            if let Some(member) = iter::nth_member(&self.store, idx as u64) {
                members.push(member);
            }
            idx += step;
        }
        Ok(Self::from_values(members))
    }

    /// The ordered list of finite members. If `up_to` is given and this
    /// set is cofinite, every integer in `[size * word_bits(), up_to]` is
    /// appended as well (§6).
    pub fn extract_finite_list(&self, up_to: Option<u64>) -> Vec<u64> {
        let mut out: Vec<u64> = self.iter().collect();
        if self.is_infinite() {
            if let Some(up_to) = up_to {
                let start = self.get_size() as u64 * Self::word_bits() as u64;
                if up_to >= start {
                    out.extend(start..=up_to);
                }
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a IntBitSet {
    type Item = u64;
    type IntoIter = FiniteIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<u64> for IntBitSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl FromIterator<(u64,)> for IntBitSet {
    fn from_iter<I: IntoIterator<Item = (u64,)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

// ---------------------------------------------------------------------
// Comparison & predicates (§4.7)
// ---------------------------------------------------------------------

impl IntBitSet {
    /// Finite popcount. Defined this way even for cofinite sets (§4.7,
    /// §9 Open Question); check [`IntBitSet::is_infinite`] first if you
    /// need true cardinality.
    pub fn len(&self) -> u64 {
        self.store.popcount_finite()
    }

    /// `true` iff this set has no finite members and is not cofinite.
    pub fn is_empty(&self) -> bool {
        !self.is_truthy()
    }

    /// `true` iff this set has any finite member, or `tail = true`
    /// (§4.7 `bool(S)`).
    pub fn is_truthy(&self) -> bool {
        self.len() > 0 || self.is_infinite()
    }

    /// `true` iff `tail = true`, i.e. this set is the complement of a
    /// finite set.
    pub fn is_infinite(&self) -> bool {
        self.store.tail()
    }

    /// Number of words currently considered live (§3 `size`).
    pub fn get_size(&self) -> usize {
        self.store.size()
    }

    /// Number of words actually allocated (§3 `capacity`).
    pub fn get_allocated(&self) -> usize {
        self.store.capacity()
    }

    /// Bit-width `W` of one word. Fixed at 64 for this implementation
    /// (see `DESIGN.md`'s Open Question resolution on word width).
    pub fn word_bits() -> u32 {
        bits::WORD_BITS
    }

    /// `true` iff no integer belongs to both sets (§4.7).
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let inter = self.intersection(other);
        inter.len() == 0 && !inter.is_infinite()
    }

    /// `true` iff every member of `self` is also a member of `other`
    /// (the partial-order `<=`, §4.7).
    pub fn is_subset(&self, other: &Self) -> bool {
        !self.difference(other).is_truthy()
    }

    /// `true` iff every member of `other` is also a member of `self`
    /// (the partial-order `>=`, §4.7).
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Render `size * word_bits()` bits as a string of `'0'`/`'1'`
    /// characters, bit 0 first. Output-only: the loader recognizes only
    /// the compressed binary form of [`IntBitSet::fastdump`] (§4.6).
    pub fn strbits(&self) -> String {
        codec::strbits(&self.store)
    }

    /// Compressed binary dump (§4.6).
    pub fn fastdump(&self) -> Vec<u8> {
        codec::fastdump(&self.store)
    }
}

impl PartialOrd for IntBitSet {
    /// A partial order on the subset relation. Incomparable sets compare
    /// as `None`, which makes every one of `<`, `<=`, `>`, `>=` evaluate
    /// to `false` for them (§4.7).
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;
        if self == other {
            Some(Ordering::Equal)
        } else if self.is_subset(other) {
            Some(Ordering::Less)
        } else if self.is_superset(other) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------
// Algebra (§4.3)
// ---------------------------------------------------------------------

impl IntBitSet {
    /// `self ∪ other`.
    pub fn union(&self, other: &Self) -> Self {
        IntBitSet {
            store: algebra::combine(BitOp::Or, &self.store, &other.store),
        }
    }

    /// `self ∩ other`.
    pub fn intersection(&self, other: &Self) -> Self {
        IntBitSet {
            store: algebra::combine(BitOp::And, &self.store, &other.store),
        }
    }

    /// `self − other` (`self AND NOT other`).
    pub fn difference(&self, other: &Self) -> Self {
        IntBitSet {
            store: algebra::combine(BitOp::AndNot, &self.store, &other.store),
        }
    }

    /// `self ⊖ other` (elements in exactly one of the two sets).
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        IntBitSet {
            store: algebra::combine(BitOp::Xor, &self.store, &other.store),
        }
    }

    /// In-place `self = self ∪ other`.
    pub fn union_with(&mut self, other: &Self) {
        algebra::combine_assign(BitOp::Or, &mut self.store, &other.store);
    }

    /// In-place `self = self ∩ other`.
    pub fn intersect_with(&mut self, other: &Self) {
        algebra::combine_assign(BitOp::And, &mut self.store, &other.store);
    }

    /// In-place `self = self − other`.
    pub fn difference_with(&mut self, other: &Self) {
        algebra::combine_assign(BitOp::AndNot, &mut self.store, &other.store);
    }

    /// In-place `self = self ⊖ other`.
    pub fn symmetric_difference_with(&mut self, other: &Self) {
        algebra::combine_assign(BitOp::Xor, &mut self.store, &other.store);
    }
}

impl BitAnd for &IntBitSet {
    type Output = IntBitSet;
    fn bitand(self, rhs: Self) -> IntBitSet {
        self.intersection(rhs)
    }
}

impl BitOr for &IntBitSet {
    type Output = IntBitSet;
    fn bitor(self, rhs: Self) -> IntBitSet {
        self.union(rhs)
    }
}

impl BitXor for &IntBitSet {
    type Output = IntBitSet;
    fn bitxor(self, rhs: Self) -> IntBitSet {
        self.symmetric_difference(rhs)
    }
}

impl Sub for &IntBitSet {
    type Output = IntBitSet;
    fn sub(self, rhs: Self) -> IntBitSet {
        self.difference(rhs)
    }
}

impl std::ops::BitAndAssign<&IntBitSet> for IntBitSet {
    fn bitand_assign(&mut self, rhs: &IntBitSet) {
        self.intersect_with(rhs);
    }
}

impl std::ops::BitOrAssign<&IntBitSet> for IntBitSet {
    fn bitor_assign(&mut self, rhs: &IntBitSet) {
        self.union_with(rhs);
    }
}

impl std::ops::BitXorAssign<&IntBitSet> for IntBitSet {
    fn bitxor_assign(&mut self, rhs: &IntBitSet) {
        self.symmetric_difference_with(rhs);
    }
}

impl std::ops::SubAssign<&IntBitSet> for IntBitSet {
    fn sub_assign(&mut self, rhs: &IntBitSet) {
        self.difference_with(rhs);
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::IntBitSet;

    impl Serialize for IntBitSet {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serde_bytes::Bytes::new(&self.fastdump()).serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for IntBitSet {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
            IntBitSet::from_bytes(&bytes).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_discard_is_noop() {
        let mut s = IntBitSet::new();
        s.add(42);
        s.discard(42);
        assert!(!s.is_truthy());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn remove_missing_errors() {
        let mut s = IntBitSet::from_values([1, 2, 3]);
        assert_eq!(s.remove(10), Err(IntBitSetError::MissingElement(10)));
        assert_eq!(s.remove(2), Ok(()));
        assert!(!s.iter().any(|x| x == 2));
    }

    #[test]
    fn pop_on_empty_cofinite_is_empty_set_error() {
        let mut s = IntBitSet::with_tail(true);
        assert_eq!(s.pop(), Err(IntBitSetError::EmptySet));
    }

    #[test]
    fn pop_returns_largest() {
        let mut s = IntBitSet::from_values([3, 1, 5, 2]);
        assert_eq!(s.pop(), Ok(5));
        assert_eq!(s.pop(), Ok(3));
    }

    #[test]
    fn indexing_positive_and_negative() {
        let s = IntBitSet::from_values([23, 45, 67, 89, 110]);
        assert_eq!(s.get(0).unwrap(), 23);
        assert_eq!(s.get(-1).unwrap(), 110);
        assert_eq!(s.get(-1).unwrap(), s.get((s.len() - 1) as i64).unwrap());
        assert!(s.get(5).is_err());
    }

    #[test]
    fn slicing_matches_python_semantics() {
        let s = IntBitSet::from_values([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let sliced = s.slice(Some(2), Some(8), 2).unwrap();
        let members: Vec<u64> = sliced.iter().collect();
        assert_eq!(members, vec![2, 4, 6]);
    }

    #[test]
    fn union_intersection_basic() {
        let a = IntBitSet::from_values([10, 20, 60, 70]);
        let b = IntBitSet::from_values([10, 40, 60, 80]);
        let inter = &a & &b;
        assert_eq!(inter.iter().collect::<Vec<_>>(), vec![10, 60]);
    }

    #[test]
    fn difference_against_cofinite_operand() {
        let a = IntBitSet::from_values_with_tail([10, 20], true);
        let b = IntBitSet::from_values([10, 40]);
        let c = a.difference(&b);
        assert!(c.is_infinite());
        assert!(!c.iter().any(|x| x == 10));
        assert!(c.iter().any(|x| x == 20));
    }

    #[test]
    fn idempotence_laws() {
        let a = IntBitSet::from_values([1, 5, 9, 500]);
        assert_eq!(a.union(&a), a);
        assert_eq!(a.intersection(&a), a);
        assert!(!a.symmetric_difference(&a).is_truthy());
        assert!(!a.difference(&a).is_truthy());
    }

    #[test]
    fn disjoint_sets() {
        let a = IntBitSet::from_values([1, 2, 3]);
        let b = IntBitSet::from_values([4, 5, 6]);
        assert!(a.is_disjoint(&b));
        let c = IntBitSet::from_values([3, 4]);
        assert!(!a.is_disjoint(&c));
    }

    #[test]
    fn subset_ordering_is_partial() {
        let a = IntBitSet::from_values([1, 2]);
        let b = IntBitSet::from_values([1, 2, 3]);
        let c = IntBitSet::from_values([4, 5]);
        assert!(a < b);
        assert!(b > a);
        assert!(!(a < c) && !(a > c) && !(a == c));
    }

    #[test]
    fn discard_all_from_arbitrary_iterable() {
        let mut s = IntBitSet::from_values([1, 2, 3]);
        s.discard_all(vec![1, 3]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn try_add_rejects_negative() {
        let mut s = IntBitSet::new();
        assert_eq!(s.try_add(-1), Err(IntBitSetError::DomainError(-1)));
        assert!(s.try_add(5).is_ok());
        assert!(s.iter().any(|x| x == 5));
    }

    #[test]
    fn extract_finite_list_extends_cofinite_range() {
        let s = IntBitSet::from_values_with_tail([1, 2], true);
        let start = s.get_size() as u64 * IntBitSet::word_bits() as u64;
        let list = s.extract_finite_list(Some(start + 3));
        assert_eq!(list.last(), Some(&(start + 3)));
    }

    #[test]
    fn fastdump_roundtrip() {
        let s = IntBitSet::from_values([20, 30, 1000, 40]);
        let bytes = s.fastdump();
        let loaded = IntBitSet::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, s);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_via_json() {
        let s = IntBitSet::from_values([1, 2, 3, 1000]);
        let json = serde_json::to_vec(&s).unwrap();
        let loaded: IntBitSet = serde_json::from_slice(&json).unwrap();
        assert_eq!(loaded, s);
    }
}
