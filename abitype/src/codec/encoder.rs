//! Head/tail encoder.
//!
//! Layout of a sequence of N values (a tuple, the elements of an array, or the
//! argument list of a call):
//!  - N head slots, one per value, in order. A static value is written inline
//!    into its slot (a static tuple spans several words). A dynamic value writes
//!    a single word holding the byte offset, relative to the first head slot, at
//!    which its payload starts.
//!  - the tail: payloads of the dynamic values, in order, right after the heads.
//!
//! Arrays prefix the sequence with their element count; `bytes`/`string` are a
//! length word followed by the data right-padded to a word boundary.
use crate::{
    types::primary::WORD_SIZE,
    value::Value,
};

/// Round `len` up to the next multiple of [`WORD_SIZE`].
#[inline]
pub(crate) const fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

/// Encode a machine-sized integer (offset or length) as a big-endian word.
#[inline]
pub(crate) fn usize_word(value: usize) -> [u8; WORD_SIZE] {
    let mut word = [0u8; WORD_SIZE];
    word[WORD_SIZE - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Returns `true` if `value` is encoded in place, without indirection.
pub(crate) fn is_static_value(value: &Value) -> bool {
    match value {
        Value::Bytes(_) | Value::String(_) | Value::Array(_) => false,
        Value::Tuple(values) => values.iter().all(is_static_value),
        _ => true,
    }
}

/// Size of the whole encoding of `value`, heads and tails included.
pub fn encoded_size(value: &Value) -> usize {
    match value {
        Value::Address(_) | Value::Uint(_) | Value::Bool(_) | Value::Bytes32(_) => WORD_SIZE,
        Value::Bytes(bytes) => WORD_SIZE + padded_len(bytes.len()),
        Value::String(text) => WORD_SIZE + padded_len(text.len()),
        Value::Tuple(values) => sequence_size(values),
        Value::Array(array) => WORD_SIZE + sequence_size(&array.values),
    }
}

fn sequence_size(values: &[Value]) -> usize {
    values
        .iter()
        .map(|value| {
            if is_static_value(value) {
                encoded_size(value)
            } else {
                WORD_SIZE + encoded_size(value)
            }
        })
        .sum()
}

fn head_size_of(value: &Value) -> usize {
    if is_static_value(value) {
        encoded_size(value)
    } else {
        WORD_SIZE
    }
}

/// Append the encoding of `value` to `out`.
pub(crate) fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Address(address) => out.extend_from_slice(&address.to_word()),
        Value::Uint(uint) => out.extend_from_slice(&uint.to_be_word()),
        Value::Bool(flag) => out.extend_from_slice(&usize_word(*flag as usize)),
        Value::Bytes32(word) => out.extend_from_slice(&word.0),
        Value::Bytes(bytes) => encode_packed(bytes, out),
        Value::String(text) => encode_packed(text.as_bytes(), out),
        Value::Tuple(values) => encode_sequence_into(values, out),
        Value::Array(array) => {
            out.extend_from_slice(&usize_word(array.values.len()));
            encode_sequence_into(&array.values, out);
        }
    }
}

/// Length word, then the data right-padded with zeros to a word boundary.
fn encode_packed(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(data.len()));
    out.extend_from_slice(data);
    out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
}

/// Apply the head/tail rule to `values`; offsets are relative to the first
/// byte written by this call.
pub(crate) fn encode_sequence_into(values: &[Value], out: &mut Vec<u8>) {
    let head_size: usize = values.iter().map(head_size_of).sum();
    let mut tail = Vec::new();

    for value in values {
        if is_static_value(value) {
            encode_into(value, out);
        } else {
            out.extend_from_slice(&usize_word(head_size + tail.len()));
            encode_into(value, &mut tail);
        }
    }

    out.extend_from_slice(&tail);
}
