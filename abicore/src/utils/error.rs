use abitype::{parser::ParseError, utils::CodecError};
use thiserror::Error;

use crate::function::Selector;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No registered descriptor has selector {selector}")]
    UnrecognizedSelector { selector: Selector },

    #[error("Selector {selector} of `{signature}` collides with already registered `{existing}`")]
    SelectorCollision {
        selector: Selector,
        signature: String,
        existing: String,
    },

    #[error("Arguments do not match `{signature}`: expected `{expected}`, found `{found}`")]
    ArgumentMismatch {
        signature: String,
        expected: String,
        found: String,
    },

    #[error("`{signature}` declares {count} outputs where exactly one was expected")]
    OutputArity { signature: String, count: usize },

    #[error("Payload of {len} bytes is too short to hold a selector")]
    PayloadTooShort { len: usize },

    #[error("Failure descriptor `{signature}` must not declare outputs")]
    UnexpectedOutputs { signature: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest file '{file}': {source}")]
    ManifestParse {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize manifest to '{file}': {source}")]
    ManifestSerialize {
        source: toml::ser::Error,
        file: String,
    },
}

pub type AbiResult<T> = Result<T, AbiError>;
