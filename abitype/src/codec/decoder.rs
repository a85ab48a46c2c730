//! Strict head/tail decoder.
//!
//! The decoder is driven by the expected [`Schema`], never by the data: the
//! recursion depth is bounded by the schema and every offset or length read
//! from the buffer is bounds-checked before use.
use crate::{
    types::{
        Schema,
        aggregate::ArrayType,
        primary::{PrimaryType, WORD_SIZE},
    },
    utils::{CodecError, DecodePath, MismatchReason},
    value::{Address, ArrayValue, B256, U256, Value},
};

type Word = [u8; WORD_SIZE];

/// Read the word starting at `pos` in `region`.
fn read_word<'a>(
    region: &'a [u8],
    pos: usize,
    expected: &Schema,
    path: &DecodePath,
) -> Result<&'a Word, CodecError> {
    pos.checked_add(WORD_SIZE)
        .and_then(|end| region.get(pos..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            CodecError::mismatch(
                expected,
                None,
                path,
                MismatchReason::OutOfBounds {
                    offset: pos,
                    len: WORD_SIZE,
                    available: region.len(),
                },
            )
        })
}

/// Interpret a word as an offset or length. The 24 high-order bytes must be
/// zero so the value fits every supported `usize`.
fn word_to_usize(word: &Word, expected: &Schema, path: &DecodePath) -> Result<usize, CodecError> {
    let (high, low) = word.split_at(WORD_SIZE - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(CodecError::mismatch(
            expected,
            Some(Schema::UINT256),
            path,
            MismatchReason::OffsetOverflow,
        ));
    }

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(bytes)).map_err(|_| {
        CodecError::mismatch(
            expected,
            Some(Schema::UINT256),
            path,
            MismatchReason::OffsetOverflow,
        )
    })
}

/// Decode a primitive from a single head word.
fn decode_word(
    word: &Word,
    primary: PrimaryType,
    expected: &Schema,
    path: &DecodePath,
) -> Result<Value, CodecError> {
    match primary {
        PrimaryType::Uint256 => Ok(Value::Uint(
            // A word is at most 256 bits wide by construction.
            U256::from_be_slice(word).unwrap_or_default(),
        )),
        PrimaryType::Bytes32 => Ok(Value::Bytes32(B256(*word))),
        PrimaryType::Address => Address::from_word(word).map(Value::Address).ok_or_else(|| {
            CodecError::mismatch(
                expected,
                Some(Schema::UINT256),
                path,
                MismatchReason::DirtyPadding,
            )
        }),
        PrimaryType::Bool => {
            let (high, last) = word.split_at(WORD_SIZE - 1);
            match (high.iter().all(|b| *b == 0), last[0]) {
                (true, 0) => Ok(Value::Bool(false)),
                (true, 1) => Ok(Value::Bool(true)),
                _ => Err(CodecError::mismatch(
                    expected,
                    Some(Schema::UINT256),
                    path,
                    MismatchReason::InvalidBool,
                )),
            }
        }
        PrimaryType::Bytes | PrimaryType::String => {
            unreachable!("variable-length kinds are never decoded from a head word")
        }
    }
}

/// Decode a length-prefixed byte string located at the start of `region`.
fn decode_packed<'a>(
    region: &'a [u8],
    expected: &Schema,
    path: &DecodePath,
) -> Result<&'a [u8], CodecError> {
    let len = word_to_usize(read_word(region, 0, expected, path)?, expected, path)?;
    let data = &region[WORD_SIZE..];

    let padded = match len.checked_next_multiple_of(WORD_SIZE) {
        Some(padded) if padded <= data.len() => padded,
        _ => {
            return Err(CodecError::mismatch(
                expected,
                None,
                path,
                MismatchReason::OutOfBounds {
                    offset: WORD_SIZE,
                    len,
                    available: data.len(),
                },
            ));
        }
    };

    if data[len..padded].iter().any(|b| *b != 0) {
        return Err(CodecError::mismatch(
            expected,
            Some(Schema::BYTES),
            path,
            MismatchReason::DirtyPadding,
        ));
    }

    Ok(&data[..len])
}

/// Decode a sequence of values laid out with the head/tail rule, starting at
/// the first byte of `region`. Offsets are relative to that first byte.
fn decode_sequence<'s>(
    region: &[u8],
    schemas: impl ExactSizeIterator<Item = &'s Schema>,
    path: &DecodePath,
) -> Result<Vec<Value>, CodecError> {
    let mut values = Vec::with_capacity(schemas.len());
    let mut pos = 0usize;

    for (index, schema) in schemas.enumerate() {
        let child = path.child(index);

        if schema.is_static() {
            values.push(decode_static(region, pos, schema, &child)?);
            pos += schema.head_size();
        } else {
            let offset = word_to_usize(read_word(region, pos, schema, &child)?, schema, &child)?;
            if offset > region.len() {
                return Err(CodecError::mismatch(
                    schema,
                    None,
                    &child,
                    MismatchReason::OutOfBounds {
                        offset,
                        len: 0,
                        available: region.len(),
                    },
                ));
            }
            values.push(decode_dynamic(&region[offset..], schema, &child)?);
            pos += WORD_SIZE;
        }
    }

    Ok(values)
}

/// Decode a static value written in place at `pos`.
fn decode_static(
    region: &[u8],
    pos: usize,
    schema: &Schema,
    path: &DecodePath,
) -> Result<Value, CodecError> {
    match schema {
        Schema::Primary(primary) => {
            decode_word(read_word(region, pos, schema, path)?, *primary, schema, path)
        }
        Schema::Tuple(tuple) => {
            let inner = region.get(pos..).unwrap_or_default();
            decode_sequence(inner, tuple.elements.iter(), path).map(Value::Tuple)
        }
        Schema::Array(_) => unreachable!("arrays are always dynamic"),
    }
}

/// Decode a dynamic value whose payload starts at the first byte of `region`.
fn decode_dynamic(region: &[u8], schema: &Schema, path: &DecodePath) -> Result<Value, CodecError> {
    match schema {
        Schema::Primary(PrimaryType::Bytes) => {
            decode_packed(region, schema, path).map(|data| Value::Bytes(data.to_vec()))
        }
        Schema::Primary(PrimaryType::String) => {
            let data = decode_packed(region, schema, path)?;
            let text = std::str::from_utf8(data).map_err(|_| {
                CodecError::mismatch(
                    schema,
                    Some(Schema::BYTES),
                    path,
                    MismatchReason::InvalidUtf8,
                )
            })?;
            Ok(Value::String(text.to_string()))
        }
        Schema::Tuple(tuple) => {
            decode_sequence(region, tuple.elements.iter(), path).map(Value::Tuple)
        }
        Schema::Array(array) => decode_array(region, array, schema, path),
        Schema::Primary(_) => decode_static(region, 0, schema, path),
    }
}

fn decode_array(
    region: &[u8],
    array: &ArrayType,
    schema: &Schema,
    path: &DecodePath,
) -> Result<Value, CodecError> {
    let length = word_to_usize(read_word(region, 0, schema, path)?, schema, path)?;
    let elements = &region[WORD_SIZE..];

    // The announced length must be backed by actual bytes before anything is
    // allocated for it. Zero-sized elements are bounded by the buffer size.
    let fits = match array.element_head_size() {
        0 => length <= elements.len(),
        size => length
            .checked_mul(size)
            .is_some_and(|needed| needed <= elements.len()),
    };
    if !fits {
        return Err(CodecError::mismatch(
            schema,
            None,
            path,
            MismatchReason::LengthOverflow {
                length,
                available: elements.len(),
            },
        ));
    }

    let values = decode_sequence(
        elements,
        std::iter::repeat_n(&*array.element, length),
        path,
    )?;
    Ok(Value::Array(ArrayValue {
        element: (*array.element).clone(),
        values,
    }))
}

/// Decode `bytes` as a single value of `schema`, with no canonical-form check.
///
/// The buffer is interpreted as the head region of `schema`: a tuple's head
/// words start at byte 0, a lone dynamic value starts with its length word.
pub(crate) fn decode_lenient(bytes: &[u8], schema: &Schema) -> Result<Value, CodecError> {
    let root = DecodePath::root();
    if schema.is_static() {
        decode_static(bytes, 0, schema, &root)
    } else {
        decode_dynamic(bytes, schema, &root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(last: u8) -> Vec<u8> {
        let mut w = vec![0u8; WORD_SIZE];
        w[WORD_SIZE - 1] = last;
        w
    }

    #[test]
    fn bool_word_must_be_zero_or_one() {
        assert_eq!(
            decode_lenient(&word(1), &Schema::BOOL).unwrap(),
            Value::Bool(true)
        );

        let err = decode_lenient(&word(2), &Schema::BOOL).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MismatchedType {
                actual: Some(Schema::UINT256),
                reason: MismatchReason::InvalidBool,
                ..
            }
        ));
    }

    #[test]
    fn offset_past_the_buffer_is_rejected() {
        let mut bytes = word(0);
        bytes[WORD_SIZE - 1] = 0xff;
        let err = decode_lenient(&bytes, &Schema::tuple([Schema::STRING])).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MismatchedType {
                reason: MismatchReason::OutOfBounds { offset: 0xff, .. },
                ..
            }
        ));
    }

    #[test]
    fn huge_array_length_does_not_allocate() {
        let mut bytes = vec![0xffu8; WORD_SIZE];
        bytes[..24].fill(0);
        let err = decode_lenient(&bytes, &Schema::array(Schema::UINT256)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MismatchedType {
                reason: MismatchReason::LengthOverflow { .. },
                ..
            }
        ));
    }

    #[test]
    fn dirty_string_padding_is_rejected() {
        let mut bytes = word(3);
        let mut data = vec![0u8; WORD_SIZE];
        data[..3].copy_from_slice(b"abc");
        data[5] = 1;
        bytes.extend_from_slice(&data);

        let err = decode_lenient(&bytes, &Schema::STRING).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MismatchedType {
                reason: MismatchReason::DirtyPadding,
                ..
            }
        ));
    }

    #[test]
    fn invalid_utf8_reports_bytes_as_actual() {
        let mut bytes = word(2);
        let mut data = vec![0u8; WORD_SIZE];
        data[..2].copy_from_slice(&[0xc3, 0x28]);
        bytes.extend_from_slice(&data);

        let err = decode_lenient(&bytes, &Schema::STRING).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MismatchedType {
                actual: Some(Schema::Primary(PrimaryType::Bytes)),
                reason: MismatchReason::InvalidUtf8,
                ..
            }
        ));
    }

    #[test]
    fn failure_path_points_at_the_nested_member() {
        // (uint256, (bool, bool)) with a bad second bool
        let mut bytes = word(9);
        bytes.extend(word(1));
        bytes.extend(word(7));
        let schema = Schema::tuple([
            Schema::UINT256,
            Schema::tuple([Schema::BOOL, Schema::BOOL]),
        ]);

        match decode_lenient(&bytes, &schema).unwrap_err() {
            CodecError::MismatchedType { path, expected, .. } => {
                assert_eq!(path.to_string(), "$.1.1");
                assert_eq!(expected, Schema::BOOL);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
