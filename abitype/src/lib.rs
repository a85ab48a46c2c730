//! Typed, word-aligned binary interface for contract calls.
//!
//! This crate defines the shape language ([`types::Schema`]), the dynamically
//! typed data model ([`value::Value`]) and the head/tail word codec
//! ([`codec`]) that translates between values and their byte encoding. The
//! [`mapping::AbiValue`] trait binds native Rust types to schemas, and
//! [`abi_record!`] declares records on top of it.
//!
//! ```rust
//! use abitype::{codec, types::Schema, value::{Address, Value}};
//!
//! let value = Value::Tuple(vec![Value::Address(Address::ZERO), Value::uint(42u8)]);
//! let bytes = codec::encode(&value);
//! assert_eq!(bytes.len(), 64);
//!
//! let schema = Schema::tuple([Schema::ADDRESS, Schema::UINT256]);
//! assert_eq!(codec::decode(&bytes, &schema).unwrap(), value);
//! ```
pub mod codec;
pub mod mapping;
#[cfg(feature = "chumsky")]
pub mod parser;
pub mod types;
pub mod utils;
pub mod value;

pub use codec::{DecodeOptions, decode, decode_resolving, encode};
pub use mapping::AbiValue;
pub use types::Schema;
pub use utils::CodecError;
pub use value::Value;
