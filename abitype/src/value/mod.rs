//! Concrete values carried by the interface.
//!
//! A [`Value`] mirrors [`Schema`] tag for tag and carries the actual data. The
//! schema of a value is derived by stripping the data (see [`Value::schema`]);
//! arrays additionally record their element schema so that empty arrays still
//! describe their shape.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::{
    types::{Schema, primary::PrimaryType},
    utils::CodecError,
};

pub mod primitive;

pub use primitive::{Address, B256, Bytes, U256};

/// Array value: the element schema plus the ordered elements.
///
/// Every element is expected to have exactly `element` as its schema; use
/// [`Value::array`] to build one with that invariant checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayValue {
    pub element: Schema,
    pub values: Vec<Value>,
}

/// A tagged union representing any value of the interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Address(Address),
    Uint(U256),
    Bool(bool),
    Bytes32(B256),
    Bytes(Vec<u8>),
    String(String),
    Tuple(Vec<Value>),
    Array(ArrayValue),
}

impl Value {
    /// Build an array value, checking that every element conforms to `element`.
    ///
    /// ```rust
    /// # use abitype::{types::Schema, value::Value};
    /// let ok = Value::array(Schema::BOOL, vec![Value::Bool(true), Value::Bool(false)]);
    /// assert!(ok.is_ok());
    ///
    /// let mixed = Value::array(Schema::BOOL, vec![Value::Bool(true), Value::String("x".into())]);
    /// assert!(mixed.is_err());
    /// ```
    pub fn array(element: Schema, values: Vec<Value>) -> Result<Self, CodecError> {
        for (index, value) in values.iter().enumerate() {
            let actual = value.schema();
            if actual != element {
                return Err(CodecError::InvalidValue {
                    message: format!(
                        "array element {} has schema `{}` but the array holds `{}`",
                        index, actual, element
                    ),
                });
            }
        }
        Ok(Value::Array(ArrayValue { element, values }))
    }

    /// Build a uint256 value from anything convertible into [`U256`].
    pub fn uint(value: impl Into<U256>) -> Self {
        Value::Uint(value.into())
    }

    /// Derive the schema this value conforms to.
    ///
    /// This is total and exact: same tag, same tuple arity and order, same
    /// array element schema.
    pub fn schema(&self) -> Schema {
        match self {
            Value::Address(_) => Schema::Primary(PrimaryType::Address),
            Value::Uint(_) => Schema::Primary(PrimaryType::Uint256),
            Value::Bool(_) => Schema::Primary(PrimaryType::Bool),
            Value::Bytes32(_) => Schema::Primary(PrimaryType::Bytes32),
            Value::Bytes(_) => Schema::Primary(PrimaryType::Bytes),
            Value::String(_) => Schema::Primary(PrimaryType::String),
            Value::Tuple(values) => Schema::tuple(values.iter().map(Value::schema)),
            Value::Array(array) => Schema::array(array.element.clone()),
        }
    }

    /// Returns `true` if this value's schema is structurally equal to `schema`.
    ///
    /// Cheaper than comparing against [`Value::schema`] since nothing is
    /// allocated.
    pub fn conforms_to(&self, schema: &Schema) -> bool {
        match (self, schema) {
            (Value::Address(_), Schema::Primary(PrimaryType::Address))
            | (Value::Uint(_), Schema::Primary(PrimaryType::Uint256))
            | (Value::Bool(_), Schema::Primary(PrimaryType::Bool))
            | (Value::Bytes32(_), Schema::Primary(PrimaryType::Bytes32))
            | (Value::Bytes(_), Schema::Primary(PrimaryType::Bytes))
            | (Value::String(_), Schema::Primary(PrimaryType::String)) => true,
            (Value::Tuple(values), Schema::Tuple(tuple)) => {
                values.len() == tuple.elements.len()
                    && values
                        .iter()
                        .zip(tuple.elements.iter())
                        .all(|(value, schema)| value.conforms_to(schema))
            }
            (Value::Array(array), Schema::Array(schema)) => array.element == *schema.element,
            _ => false,
        }
    }

    /// Recursively check the array homogeneity invariant.
    ///
    /// Values built through [`Value::array`] or produced by the decoder always
    /// pass; hand-assembled [`ArrayValue`]s may not.
    pub fn verify(&self) -> Result<(), CodecError> {
        match self {
            Value::Tuple(values) => values.iter().try_for_each(Value::verify),
            Value::Array(array) => {
                for (index, value) in array.values.iter().enumerate() {
                    if !value.conforms_to(&array.element) {
                        return Err(CodecError::InvalidValue {
                            message: format!(
                                "array element {} has schema `{}` but the array holds `{}`",
                                index,
                                value.schema(),
                                array.element
                            ),
                        });
                    }
                    value.verify()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<B256> for Value {
    fn from(value: B256) -> Self {
        Value::Bytes32(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Textual rendering, used wherever a value has to be reported without a
/// typed mapping (e.g. unrecognized failure shapes).
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(f: &mut std::fmt::Formatter<'_>, values: &[Value]) -> std::fmt::Result {
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            Ok(())
        }

        match self {
            Value::Address(address) => std::fmt::Display::fmt(address, f),
            Value::Uint(uint) => std::fmt::Display::fmt(uint, f),
            Value::Bool(flag) => std::fmt::Display::fmt(flag, f),
            Value::Bytes32(word) => std::fmt::Display::fmt(word, f),
            Value::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Value::String(text) => write!(f, "{:?}", text),
            Value::Tuple(values) => {
                write!(f, "(")?;
                join(f, values)?;
                write!(f, ")")
            }
            Value::Array(array) => {
                write!(f, "[")?;
                join(f, &array.values)?;
                write!(f, "]")
            }
        }
    }
}
