#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIs, EnumIter, EnumString, IntoStaticStr};

/// Width of a single word of the interface, in bytes.
///
/// Every primitive occupies exactly one word, and every length or offset is
/// stored as a one-word big-endian unsigned integer.
pub const WORD_SIZE: usize = 32;

/// Represents any primitive kind of the binary interface.
///
/// The string form of each kind (see [`Display`] and [`std::str::FromStr`]) is
/// its canonical name as it appears in function signatures. The canonical
/// names are what selectors are derived from, so they must never change.
///
/// ```rust
/// # use abitype::types::primary::PrimaryType;
/// assert_eq!(PrimaryType::Uint256.to_string(), "uint256");
/// assert_eq!("bytes32".parse::<PrimaryType>().unwrap(), PrimaryType::Bytes32);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumIs,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimaryType {
    /// A 20-byte account identifier, left-padded to one word.
    #[strum(serialize = "address")]
    Address,

    /// A 256-bit unsigned integer, big-endian.
    #[strum(serialize = "uint256")]
    Uint256,

    /// A boolean, encoded as the integer `0` or `1`.
    #[strum(serialize = "bool")]
    Bool,

    /// A fixed 32-byte string, stored verbatim in one word.
    #[strum(serialize = "bytes32")]
    Bytes32,

    /// A variable-length byte string (length word, then right-padded data).
    #[strum(serialize = "bytes")]
    Bytes,

    /// A variable-length UTF-8 string, laid out exactly like [`PrimaryType::Bytes`].
    #[strum(serialize = "string")]
    String,
}

impl PrimaryType {
    /// Returns `true` if the kind is fixed-width (encoded in place in a head slot).
    #[inline]
    pub const fn is_static(&self) -> bool {
        !matches!(self, PrimaryType::Bytes | PrimaryType::String)
    }

    /// Returns the canonical name of the kind.
    #[inline]
    pub fn canonical_name(&self) -> &'static str {
        self.into()
    }
}
