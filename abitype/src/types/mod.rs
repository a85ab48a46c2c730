//! Types module
//!
//! This module contains the canonical description of value shapes ("schemas")
//! used by the `abitype` crate. It exposes a small type system built on two
//! layers:
//!
//! - Primary types: the fixed set of primitive kinds (see `primary.rs`).
//! - Aggregate types: tuples and dynamic-length arrays (see `aggregate.rs`).
//!
//! A [`Schema`] is a plain immutable value: two schemas are equal iff they are
//! structurally equal. The `Display` form of a schema is its canonical
//! signature text (e.g. `(address,uint256)[]`).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::types::{
    aggregate::{ArrayType, TupleType},
    primary::{PrimaryType, WORD_SIZE},
};

pub mod aggregate;
pub mod primary;

/// A sum-type representing the shape of any value of the interface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Schema {
    /// Primitive kinds
    ///
    /// All shapes that can be represented as [`PrimaryType`]:
    /// - Fixed-width kinds (`address`, `uint256`, `bool`, `bytes32`)
    /// - Length-prefixed kinds (`bytes`, `string`)
    Primary(PrimaryType),

    /// An ordered list of member schemas.
    Tuple(TupleType),

    /// A dynamic-length array of an element schema.
    Array(ArrayType),
}

impl Schema {
    pub const ADDRESS: Self = Schema::Primary(PrimaryType::Address);
    pub const UINT256: Self = Schema::Primary(PrimaryType::Uint256);
    pub const BOOL: Self = Schema::Primary(PrimaryType::Bool);
    pub const BYTES32: Self = Schema::Primary(PrimaryType::Bytes32);
    pub const BYTES: Self = Schema::Primary(PrimaryType::Bytes);
    pub const STRING: Self = Schema::Primary(PrimaryType::String);

    /// Build a tuple schema from its members.
    pub fn tuple(elements: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Tuple(TupleType::new(elements))
    }

    /// Build a dynamic-length array schema of `element`.
    pub fn array(element: Schema) -> Self {
        Schema::Array(ArrayType::new(element))
    }

    /// Wrap this schema as the sole member of a one-element tuple.
    ///
    /// This is the "outer wrapper" framing a single composite result may
    /// arrive in; see [`crate::codec::decode_resolving`].
    pub fn wrapped(&self) -> Self {
        Schema::tuple([self.clone()])
    }

    /// Returns `true` if values of this schema are fixed-width and encoded in
    /// place, without indirection.
    ///
    /// ```rust
    /// # use abitype::types::Schema;
    /// assert!(Schema::tuple([Schema::ADDRESS, Schema::UINT256]).is_static());
    /// assert!(!Schema::tuple([Schema::ADDRESS, Schema::STRING]).is_static());
    /// assert!(!Schema::array(Schema::UINT256).is_static());
    /// ```
    pub fn is_static(&self) -> bool {
        match self {
            Schema::Primary(primary) => primary.is_static(),
            Schema::Tuple(tuple) => tuple.is_static(),
            Schema::Array(_) => false,
        }
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    /// Number of bytes this schema occupies inside an enclosing head region.
    ///
    /// Dynamic schemas only contribute their offset word; static tuples are
    /// inlined member by member.
    pub fn head_size(&self) -> usize {
        match self {
            Schema::Tuple(tuple) if tuple.is_static() => tuple.head_region_size(),
            _ => WORD_SIZE,
        }
    }
}

impl From<PrimaryType> for Schema {
    fn from(value: PrimaryType) -> Self {
        Schema::Primary(value)
    }
}

impl From<TupleType> for Schema {
    fn from(value: TupleType) -> Self {
        Schema::Tuple(value)
    }
}

impl From<ArrayType> for Schema {
    fn from(value: ArrayType) -> Self {
        Schema::Array(value)
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schema::Primary(primary) => std::fmt::Display::fmt(primary, f),
            Schema::Tuple(tuple) => std::fmt::Display::fmt(tuple, f),
            Schema::Array(array) => std::fmt::Display::fmt(array, f),
        }
    }
}
