//! Error types returned by fallible [`crate::IntBitSet`] operations.

use thiserror::Error;

/// Everything that can go wrong while building, mutating, indexing, or
/// (de)serializing an [`crate::IntBitSet`].
///
/// No operation that returns this error leaves its receiver mutated: every
/// mutating method validates its input before touching storage.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum IntBitSetError {
    /// An algebraic or comparison operation received an operand of an
    /// unsupported kind. Most of these collapse into compile errors in Rust
    /// (see `DESIGN.md`); the variant is kept for API completeness.
    #[error("operand type is incompatible with this operation")]
    TypeMismatch,

    /// An index or slice bound fell outside the addressable range for the
    /// set's current finite length.
    #[error("index {index} out of range for length {length}")]
    OutOfRange {
        /// The requested (possibly negative, pre-normalization) index.
        index: i64,
        /// The finite length the index was checked against.
        length: usize,
    },

    /// [`crate::IntBitSet::remove`] was called with an element that is not a
    /// member of the set.
    #[error("element {0} is not a member of the set")]
    MissingElement(u64),

    /// [`crate::IntBitSet::pop`] was called on a set with no finite members.
    #[error("pop() called on a set with no finite members")]
    EmptySet,

    /// [`crate::IntBitSet::fastload`] received a buffer that does not decode
    /// into a valid bitmap.
    #[error("invalid serialized bitmap: {0}")]
    EncodingError(String),

    /// A negative integer was supplied where only non-negative members are
    /// valid.
    #[error("{0} is negative; only non-negative integers are valid members")]
    DomainError(i64),
}
