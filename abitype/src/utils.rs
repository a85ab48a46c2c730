use smallvec::SmallVec;
use strum::EnumIs;
use thiserror::Error;

use crate::types::Schema;

/// Location of a failure inside a nested value: the sequence of tuple member or
/// array element indices leading to it from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecodePath(pub SmallVec<usize, 8>);

impl DecodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the path extended by one more index.
    pub fn child(&self, index: usize) -> Self {
        let mut inner = self.0.clone();
        inner.push(index);
        Self(inner)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for DecodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for index in self.0.iter() {
            write!(f, ".{}", index)?;
        }
        Ok(())
    }
}

/// Why a byte layout could not be interpreted under the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum MismatchReason {
    /// A read would run past the end of the buffer.
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// An offset or length word does not fit in a machine-sized integer.
    OffsetOverflow,

    /// Bytes that must be zero (word padding) are not.
    DirtyPadding,

    /// A boolean word is neither `0` nor `1`.
    InvalidBool,

    /// String data is not valid UTF-8.
    InvalidUtf8,

    /// An array announces more elements than the buffer can hold.
    LengthOverflow { length: usize, available: usize },

    /// The bytes decode, but are not the canonical encoding of the value they
    /// decode to (trailing data, overlapping or out-of-order tails, ...).
    NonCanonical { consumed: usize, available: usize },

    /// A decoded value does not have the tag or arity a record expects.
    RecordShape,
}

impl std::fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchReason::OutOfBounds {
                offset,
                len,
                available,
            } => write!(
                f,
                "reading {} bytes at offset {} exceeds the {} available bytes",
                len, offset, available
            ),
            MismatchReason::OffsetOverflow => {
                write!(f, "offset or length word does not fit in memory")
            }
            MismatchReason::DirtyPadding => write!(f, "padding bytes are not zero"),
            MismatchReason::InvalidBool => write!(f, "boolean word is neither 0 nor 1"),
            MismatchReason::InvalidUtf8 => write!(f, "string data is not valid UTF-8"),
            MismatchReason::LengthOverflow { length, available } => write!(
                f,
                "array of {} elements cannot fit in the {} remaining bytes",
                length, available
            ),
            MismatchReason::NonCanonical {
                consumed,
                available,
            } => write!(
                f,
                "not a canonical encoding (canonical form is {} bytes, got {})",
                consumed, available
            ),
            MismatchReason::RecordShape => write!(f, "value shape does not match the record"),
        }
    }
}

struct ActualFmt<'a>(&'a Option<Schema>);

impl std::fmt::Display for ActualFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(schema) => write!(f, "`{}`", schema),
            None => write!(f, "an incompatible layout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum CodecError {
    /// The bytes cannot be consistently interpreted under the expected schema.
    ///
    /// `actual` is the schema inferred from the bytes when one can be inferred
    /// (e.g. a word that is a valid `uint256` but not a valid `bool`).
    #[error(
        "Mismatched type at `{path}`: expected `{expected}`, found {}: {reason}.",
        ActualFmt(.actual)
    )]
    MismatchedType {
        expected: Schema,
        actual: Option<Schema>,
        path: DecodePath,
        reason: MismatchReason,
    },

    /// A value violates an invariant of its own shape (e.g. a heterogeneous array).
    #[error("Invalid value: {message}.")]
    InvalidValue { message: String },
}

impl CodecError {
    pub(crate) fn mismatch(
        expected: &Schema,
        actual: Option<Schema>,
        path: &DecodePath,
        reason: MismatchReason,
    ) -> Self {
        CodecError::MismatchedType {
            expected: expected.clone(),
            actual,
            path: path.clone(),
            reason,
        }
    }

    /// A record (or other typed mapping) received a value of the wrong shape.
    pub fn record_shape(expected: Schema, actual: Schema) -> Self {
        CodecError::MismatchedType {
            expected,
            actual: Some(actual),
            path: DecodePath::root(),
            reason: MismatchReason::RecordShape,
        }
    }

    /// Returns the expected schema of a [`CodecError::MismatchedType`].
    pub fn expected(&self) -> Option<&Schema> {
        match self {
            CodecError::MismatchedType { expected, .. } => Some(expected),
            CodecError::InvalidValue { .. } => None,
        }
    }
}
