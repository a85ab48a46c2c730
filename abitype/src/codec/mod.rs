//! Head/tail codec
//!
//! Entry points to turn a [`Value`] into its word-aligned wire encoding and
//! back:
//!
//! - [`encode`] / [`encode_sequence`]: pure and infallible for values that
//!   satisfy [`Value::verify`].
//! - [`decode`] / [`decode_with`]: strict inverse of the encoder against an
//!   expected [`Schema`].
//! - [`decode_resolving`]: the decode used by every public typed entry point.
//!   It accepts a lone composite framed either bare or as the sole member of a
//!   one-element tuple.
//!
//! Offsets of dynamic members are measured from the start of the immediately
//! enclosing head region (for array elements, from the first byte after the
//! length word). This matches the layout produced by mainstream contract
//! compilers.
use log::{debug, trace};

use crate::{types::Schema, utils::CodecError, value::Value};

mod decoder;
mod encoder;

pub use encoder::encoded_size;

/// Knobs of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Re-encode the decoded value and require it to reproduce the input
    /// exactly. Rejects trailing bytes, overlapping tails and any other
    /// non-canonical layout. Enabled by default.
    pub validate: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl DecodeOptions {
    /// Options that accept any layout the head/tail rule can interpret.
    pub const fn lenient() -> Self {
        Self { validate: false }
    }
}

/// Encode `value` into its wire form.
///
/// ```rust
/// # use abitype::{codec::encode, value::Value};
/// let bytes = encode(&Value::Tuple(vec![Value::Bool(true), Value::uint(5u8)]));
/// assert_eq!(bytes.len(), 64);
/// assert_eq!(bytes[31], 1);
/// assert_eq!(bytes[63], 5);
/// ```
pub fn encode(value: &Value) -> Vec<u8> {
    trace!("Encoding value of schema `{}`", value.schema());
    let mut out = Vec::with_capacity(encoded_size(value));
    encoder::encode_into(value, &mut out);
    out
}

/// Encode `values` as the members of a tuple (e.g. call arguments).
pub fn encode_sequence(values: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    encoder::encode_sequence_into(values, &mut out);
    out
}

/// Decode `bytes` as a value of `schema` with the default (strict) options.
pub fn decode(bytes: &[u8], schema: &Schema) -> Result<Value, CodecError> {
    decode_with(bytes, schema, DecodeOptions::default())
}

/// Decode `bytes` as a value of `schema`.
///
/// Any tag or arity mismatch between the layout of the bytes and `schema`
/// fails with [`CodecError::MismatchedType`]; nothing is coerced.
pub fn decode_with(
    bytes: &[u8],
    schema: &Schema,
    options: DecodeOptions,
) -> Result<Value, CodecError> {
    trace!("Decoding {} bytes as `{}`", bytes.len(), schema);
    let value = decoder::decode_lenient(bytes, schema)?;

    if options.validate {
        let canonical = encode(&value);
        if canonical != bytes {
            return Err(CodecError::MismatchedType {
                expected: schema.clone(),
                actual: None,
                path: Default::default(),
                reason: crate::utils::MismatchReason::NonCanonical {
                    consumed: canonical.len(),
                    available: bytes.len(),
                },
            });
        }
    }

    Ok(value)
}

/// Decode a lone value of `schema` that may be framed bare or wrapped.
///
/// 1. Decode `bytes` canonically as `schema`; on success that is the result.
/// 2. Otherwise decode `bytes` as the one-element tuple `(schema)` and unwrap
///    its single member.
/// 3. If both fail, report the failure of step 1, so the mismatch is always
///    against the value's own schema and never against the synthetic wrapper.
///
/// ```rust
/// # use abitype::{codec::{decode_resolving, encode}, types::Schema, value::Value};
/// let record = Value::Tuple(vec![Value::from("ada"), Value::uint(36u8)]);
/// let bare = encode(&record);
/// let wrapped = encode(&Value::Tuple(vec![record.clone()]));
/// assert_ne!(bare, wrapped);
///
/// let schema = record.schema();
/// assert_eq!(decode_resolving(&bare, &schema).unwrap(), record);
/// assert_eq!(decode_resolving(&wrapped, &schema).unwrap(), record);
/// ```
pub fn decode_resolving(bytes: &[u8], schema: &Schema) -> Result<Value, CodecError> {
    decode_resolving_with(bytes, schema, DecodeOptions::default())
}

/// [`decode_resolving`] with explicit decoder options.
///
/// The bare attempt is always canonical: a lenient bare decode accepts nearly
/// any prefix and would shadow the wrapped framing. `options` apply to the
/// wrapped attempt, and a lenient bare decode is only the last resort.
pub fn decode_resolving_with(
    bytes: &[u8],
    schema: &Schema,
    options: DecodeOptions,
) -> Result<Value, CodecError> {
    let bare_error = match decode_with(bytes, schema, DecodeOptions::default()) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let wrapper = schema.wrapped();
    debug!(
        "Bare decode as `{}` failed ({}); retrying as `{}`",
        schema, bare_error, wrapper
    );

    if let Ok(Value::Tuple(mut members)) = decode_with(bytes, &wrapper, options) {
        if let (1, Some(member)) = (members.len(), members.pop()) {
            return Ok(member);
        }
    }

    debug!("Wrapped decode as `{}` failed as well", wrapper);
    if options.validate {
        Err(bare_error)
    } else {
        decode_with(bytes, schema, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::primary::WORD_SIZE,
        utils::MismatchReason,
        value::{Address, U256},
    };

    fn account() -> Address {
        let mut bytes = [0u8; 20];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        Address(bytes)
    }

    #[test]
    fn account_balance_is_two_words() {
        let balance = U256::from(1_000_000_007u64);
        let value = Value::Tuple(vec![Value::Address(account()), Value::Uint(balance.clone())]);
        let schema = Schema::tuple([Schema::ADDRESS, Schema::UINT256]);

        let bytes = encode(&value);
        assert_eq!(bytes.len(), 2 * WORD_SIZE);
        assert_eq!(&bytes[..12], &[0u8; 12]);
        assert_eq!(&bytes[12..32], &account().0);
        assert_eq!(&bytes[32..], &balance.to_be_word());

        assert_eq!(decode(&bytes, &schema).unwrap(), value);
        assert_eq!(
            decode_resolving(&bytes, &schema.wrapped()).unwrap(),
            Value::Tuple(vec![value])
        );
    }

    #[test]
    fn string_member_goes_to_the_tail() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789ABCD";
        assert_eq!(text.len(), 40);
        let value = Value::Tuple(vec![Value::uint(7u8), Value::from(text)]);
        let bytes = encode(&value);

        // head: uint, offset ; tail: length, 64 bytes of padded text
        assert_eq!(bytes.len(), 2 * WORD_SIZE + WORD_SIZE + 64);
        assert_eq!(bytes[2 * WORD_SIZE - 1], 0x40);
        assert_eq!(bytes[3 * WORD_SIZE - 1], 40);
        assert_eq!(&bytes[3 * WORD_SIZE..3 * WORD_SIZE + 40], text.as_bytes());
        assert!(bytes[3 * WORD_SIZE + 40..].iter().all(|b| *b == 0));

        assert_eq!(decode(&bytes, &value.schema()).unwrap(), value);
    }

    #[test]
    fn trailing_bytes_are_not_canonical() {
        let mut bytes = encode(&Value::uint(1u8));
        bytes.extend_from_slice(&[0u8; WORD_SIZE]);

        let err = decode(&bytes, &Schema::UINT256).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MismatchedType {
                reason: MismatchReason::NonCanonical {
                    consumed: 32,
                    available: 64
                },
                ..
            }
        ));

        // A lenient decode accepts the prefix.
        assert_eq!(
            decode_with(&bytes, &Schema::UINT256, DecodeOptions::lenient()).unwrap(),
            Value::uint(1u8)
        );
    }

    #[test]
    fn exhausted_ambiguity_reports_the_bare_schema() {
        let schema = Schema::tuple([Schema::BOOL, Schema::STRING]);
        let bytes = encode(&Value::Tuple(vec![Value::uint(3u8), Value::from("x")]));

        let err = decode_resolving(&bytes, &schema).unwrap_err();
        match err {
            CodecError::MismatchedType { path, expected, .. } => {
                assert_eq!(path.to_string(), "$.0");
                assert_eq!(expected, Schema::BOOL);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(Some(decode(&bytes, &schema).unwrap_err()), decode_resolving(&bytes, &schema).err());
    }

    #[test]
    fn lenient_resolution_still_prefers_a_canonical_framing() {
        let lenient = DecodeOptions::lenient();

        let wrapped = encode(&Value::Tuple(vec![Value::from("abc")]));
        assert_eq!(
            decode_resolving_with(&wrapped, &Schema::STRING, lenient).unwrap(),
            Value::from("abc")
        );

        let record = Value::Tuple(vec![Value::from("abc")]);
        let wrapped = encode(&Value::Tuple(vec![record.clone()]));
        assert_eq!(
            decode_resolving_with(&wrapped, &record.schema(), lenient).unwrap(),
            record
        );

        // Neither framing is canonical; the trailing word is ignored.
        let mut padded = encode(&Value::uint(9u8));
        padded.extend_from_slice(&[0xff; WORD_SIZE]);
        assert_eq!(
            decode_resolving_with(&padded, &Schema::UINT256, lenient).unwrap(),
            Value::uint(9u8)
        );
        assert!(decode_resolving(&padded, &Schema::UINT256).is_err());
    }

    #[test]
    fn static_composites_encode_identically_bare_and_wrapped() {
        let value = Value::Tuple(vec![Value::Address(account()), Value::Bool(true)]);
        assert_eq!(encode(&value), encode(&Value::Tuple(vec![value.clone()])));
    }

    #[test]
    fn encode_sequence_matches_tuple_encoding() {
        let values = vec![Value::from("a"), Value::Bytes(vec![1; 33]), Value::Bool(false)];
        assert_eq!(encode_sequence(&values), encode(&Value::Tuple(values)));
    }
}
