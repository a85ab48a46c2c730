use num_bigint::BigUint;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{types::primary::WORD_SIZE, utils::CodecError};

/// Number of bytes of an account address.
pub const ADDRESS_SIZE: usize = 20;

/// A 20-byte account address.
///
/// Rendered and parsed as `0x`-prefixed lowercase hexadecimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    pub const ZERO: Self = Self([0; ADDRESS_SIZE]);

    /// Returns the address left-padded to a full word.
    pub fn to_word(&self) -> [u8; WORD_SIZE] {
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - ADDRESS_SIZE..].copy_from_slice(&self.0);
        word
    }

    /// Extract an address from a word, provided its 12 high-order bytes are zero.
    pub fn from_word(word: &[u8; WORD_SIZE]) -> Option<Self> {
        let (padding, body) = word.split_at(WORD_SIZE - ADDRESS_SIZE);
        if padding.iter().any(|b| *b != 0) {
            return None;
        }

        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(body);
        Some(Self(bytes))
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(value: [u8; ADDRESS_SIZE]) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// A 256-bit unsigned integer.
///
/// Backed by a [`BigUint`]; the value is guaranteed to be strictly below
/// `2^256` by every constructor, so it always fits a single word.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "BigUint", into = "BigUint")
)]
#[repr(transparent)]
pub struct U256(BigUint);

impl U256 {
    pub const BITS: u64 = 256;

    pub const ZERO: Self = Self(BigUint::ZERO);

    /// Creates a new [`U256`], or `None` if `value` needs more than 256 bits.
    #[inline]
    pub fn new(value: BigUint) -> Option<Self> {
        if value.bits() <= Self::BITS {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The largest representable value, `2^256 - 1`.
    pub fn max_value() -> Self {
        Self(BigUint::from_bytes_be(&[0xff; WORD_SIZE]))
    }

    /// Interpret up to 32 big-endian bytes as an unsigned integer.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > WORD_SIZE {
            return None;
        }
        Some(Self(BigUint::from_bytes_be(bytes)))
    }

    /// Returns the value as a big-endian word, left-padded with zeros.
    pub fn to_be_word(&self) -> [u8; WORD_SIZE] {
        let bytes = self.0.to_bytes_be();
        let mut word = [0u8; WORD_SIZE];
        // `to_bytes_be` yields `[0]` for zero, which still fits.
        word[WORD_SIZE - bytes.len()..].copy_from_slice(&bytes);
        word
    }

    /// Returns the value if it fits in a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.0).ok()
    }

    #[inline]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    #[inline]
    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

macro_rules! u256_from {
    ($($typ:ty),+) => {
        $(
            impl From<$typ> for U256 {
                fn from(value: $typ) -> Self {
                    Self(BigUint::from(value))
                }
            }
        )+
    };
}

u256_from! { u8, u16, u32, u64, u128 }

impl TryFrom<BigUint> for U256 {
    type Error = CodecError;

    fn try_from(value: BigUint) -> Result<Self, Self::Error> {
        let bits = value.bits();
        Self::new(value).ok_or_else(|| CodecError::InvalidValue {
            message: format!("uint256 needs {} bits", bits),
        })
    }
}

impl From<U256> for BigUint {
    fn from(value: U256) -> Self {
        value.0
    }
}

impl std::fmt::Display for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A fixed 32-byte string (`bytes32`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct B256(pub [u8; WORD_SIZE]);

impl B256 {
    pub const ZERO: Self = Self([0; WORD_SIZE]);

    /// Right-pads `bytes` (at most 32 of them) to a full `bytes32`.
    pub fn right_padded(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > WORD_SIZE {
            return None;
        }
        let mut word = [0u8; WORD_SIZE];
        word[..bytes.len()].copy_from_slice(bytes);
        Some(Self(word))
    }
}

impl From<[u8; WORD_SIZE]> for B256 {
    fn from(value: [u8; WORD_SIZE]) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for B256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A variable-length byte string (`bytes`).
///
/// Distinct from `Vec<u8>` so that a byte string is never confused with an
/// array of integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_rejects_values_wider_than_a_word() {
        let max = U256::max_value();
        assert_eq!(max.to_be_word(), [0xff; WORD_SIZE]);

        let too_wide = max.into_biguint() + 1u32;
        assert!(U256::new(too_wide).is_none());
        assert!(U256::from_be_slice(&[1u8; WORD_SIZE + 1]).is_none());
    }

    #[test]
    fn u256_conversion_from_biguint_is_bounded() {
        let max = U256::max_value().into_biguint();
        assert_eq!(U256::try_from(max.clone()).unwrap(), U256::max_value());
        assert!(matches!(
            U256::try_from(max + 1u32),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn u256_deserialization_is_bounded() {
        #[derive(Debug, serde::Deserialize)]
        struct Holder {
            value: U256,
        }

        // `BigUint` travels as little-endian u32 digits.
        let small: Holder = toml::from_str("value = [7]").unwrap();
        assert_eq!(small.value, U256::from(7u8));

        let digits = ["4294967295"; 8].join(", ");
        let max: Holder = toml::from_str(&format!("value = [{digits}]")).unwrap();
        assert_eq!(max.value, U256::max_value());

        let too_wide = toml::from_str::<Holder>("value = [0, 0, 0, 0, 0, 0, 0, 0, 1]");
        assert!(too_wide.is_err());
    }

    #[test]
    fn u256_word_is_left_padded() {
        let word = U256::from(0x0102u32).to_be_word();
        assert!(word[..30].iter().all(|b| *b == 0));
        assert_eq!(&word[30..], &[0x01, 0x02]);
        assert_eq!(U256::ZERO.to_be_word(), [0; WORD_SIZE]);
    }

    #[test]
    fn address_word_padding() {
        let address = Address([0xab; ADDRESS_SIZE]);
        let word = address.to_word();
        assert_eq!(Address::from_word(&word), Some(address));

        let mut dirty = word;
        dirty[0] = 1;
        assert_eq!(Address::from_word(&dirty), None);
    }

    #[test]
    fn address_hex_round_trip() {
        let text = "0x00112233445566778899aabbccddeeff00112233";
        let address: Address = text.parse().unwrap();
        assert_eq!(address.to_string(), text);
        assert!("0x1234".parse::<Address>().is_err());
    }
}
