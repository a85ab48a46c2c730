//! Typed mapping between Rust types and [`Value`]s.
//!
//! Every record type of the interface holds a constant [`Schema`] plus two
//! small mapping functions: [`AbiValue::to_value`] and [`AbiValue::from_value`].
//! The wire format is entirely owned by the generic codec; records never
//! touch bytes themselves.
use crate::{
    codec::{self, DecodeOptions},
    types::Schema,
    utils::CodecError,
    value::{Address, ArrayValue, B256, Bytes, U256, Value},
};

/// A Rust type with a fixed interface shape.
pub trait AbiValue: Sized {
    /// The constant schema of the type.
    fn schema() -> Schema;

    /// Map `self` to its [`Value`]. Total.
    fn to_value(&self) -> Value;

    /// Inverse of [`AbiValue::to_value`]; fails if the tag or arity of `value`
    /// does not match [`AbiValue::schema`].
    fn from_value(value: Value) -> Result<Self, CodecError>;

    /// Encode `self` into its wire form.
    fn abi_encode(&self) -> Vec<u8> {
        codec::encode(&self.to_value())
    }

    /// Decode a value of this type, accepting both the bare and the
    /// single-wrapped framing (see [`codec::decode_resolving`]).
    fn abi_decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::abi_decode_with(bytes, DecodeOptions::default())
    }

    /// [`AbiValue::abi_decode`] with explicit decoder options.
    fn abi_decode_with(bytes: &[u8], options: DecodeOptions) -> Result<Self, CodecError> {
        let value = codec::decode_resolving_with(bytes, &Self::schema(), options)?;
        Self::from_value(value)
    }
}

macro_rules! abi_value_primitive {
    ($typ:ty, $schema:expr, $variant:ident) => {
        impl AbiValue for $typ {
            fn schema() -> Schema {
                $schema
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, CodecError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(CodecError::record_shape($schema, other.schema())),
                }
            }
        }
    };
}

abi_value_primitive! { Address, Schema::ADDRESS, Address }
abi_value_primitive! { U256, Schema::UINT256, Uint }
abi_value_primitive! { bool, Schema::BOOL, Bool }
abi_value_primitive! { B256, Schema::BYTES32, Bytes32 }
abi_value_primitive! { String, Schema::STRING, String }

impl AbiValue for Bytes {
    fn schema() -> Schema {
        Schema::BYTES
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Bytes(inner) => Ok(Bytes(inner)),
            other => Err(CodecError::record_shape(Schema::BYTES, other.schema())),
        }
    }
}

impl<T: AbiValue> AbiValue for Vec<T> {
    fn schema() -> Schema {
        Schema::array(T::schema())
    }

    fn to_value(&self) -> Value {
        Value::Array(ArrayValue {
            element: T::schema(),
            values: self.iter().map(AbiValue::to_value).collect(),
        })
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Array(array) if array.element == T::schema() => {
                array.values.into_iter().map(T::from_value).collect()
            }
            other => Err(CodecError::record_shape(Self::schema(), other.schema())),
        }
    }
}

impl AbiValue for () {
    fn schema() -> Schema {
        Schema::tuple([])
    }

    fn to_value(&self) -> Value {
        Value::Tuple(Vec::new())
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Tuple(members) if members.is_empty() => Ok(()),
            other => Err(CodecError::record_shape(Self::schema(), other.schema())),
        }
    }
}

macro_rules! abi_value_tuple {
    ($count:literal => $( $name:ident . $idx:tt ),+) => {
        impl<$( $name: AbiValue ),+> AbiValue for ($( $name, )+) {
            fn schema() -> Schema {
                Schema::tuple([ $( $name::schema() ),+ ])
            }

            fn to_value(&self) -> Value {
                Value::Tuple(vec![ $( self.$idx.to_value() ),+ ])
            }

            fn from_value(value: Value) -> Result<Self, CodecError> {
                match value {
                    Value::Tuple(members) if members.len() == $count => {
                        let mut members = members.into_iter();
                        Ok(($(
                            $name::from_value(members.next().ok_or_else(|| {
                                CodecError::record_shape(Self::schema(), Schema::tuple([]))
                            })?)?,
                        )+))
                    }
                    other => Err(CodecError::record_shape(Self::schema(), other.schema())),
                }
            }
        }
    };
}

abi_value_tuple! { 1 => A.0 }
abi_value_tuple! { 2 => A.0, B.1 }
abi_value_tuple! { 3 => A.0, B.1, C.2 }
abi_value_tuple! { 4 => A.0, B.1, C.2, D.3 }
abi_value_tuple! { 5 => A.0, B.1, C.2, D.3, E.4 }
abi_value_tuple! { 6 => A.0, B.1, C.2, D.3, E.4, F.5 }

/// Declare a record: a struct with named, ordered, immutable fields whose
/// schema is the tuple of its field schemas in declaration order.
///
/// ```rust
/// use abitype::{abi_record, mapping::AbiValue, value::{Address, U256}};
///
/// abi_record! {
///     /// Balance of one account.
///     pub struct AccountBalance {
///         pub account: Address,
///         pub balance: U256,
///     }
/// }
///
/// assert_eq!(AccountBalance::schema().to_string(), "(address,uint256)");
/// let record = AccountBalance { account: Address::ZERO, balance: U256::from(5u8) };
/// assert_eq!(AccountBalance::abi_decode(&record.abi_encode()).unwrap(), record);
/// ```
#[macro_export]
macro_rules! abi_record {
    (@count) => { 0usize };
    (@count $head:ident $( $tail:ident )*) => {
        1usize + $crate::abi_record!(@count $( $tail )*)
    };
    (
        $( #[$meta:meta] )*
        $vis:vis struct $name:ident {
            $(
                $( #[$field_meta:meta] )*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $( #[$meta] )*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            $(
                $( #[$field_meta] )*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::mapping::AbiValue for $name {
            fn schema() -> $crate::types::Schema {
                $crate::types::Schema::tuple([
                    $( <$ty as $crate::mapping::AbiValue>::schema() ),*
                ])
            }

            fn to_value(&self) -> $crate::value::Value {
                $crate::value::Value::Tuple(vec![
                    $( $crate::mapping::AbiValue::to_value(&self.$field) ),*
                ])
            }

            #[allow(unused_mut, unused_variables)]
            fn from_value(
                value: $crate::value::Value,
            ) -> ::std::result::Result<Self, $crate::utils::CodecError> {
                let schema = <Self as $crate::mapping::AbiValue>::schema();
                match value {
                    $crate::value::Value::Tuple(members)
                        if members.len() == $crate::abi_record!(@count $( $field )*) =>
                    {
                        let mut members = members.into_iter();
                        Ok(Self {
                            $(
                                $field: <$ty as $crate::mapping::AbiValue>::from_value(
                                    members.next().ok_or_else(|| {
                                        $crate::utils::CodecError::record_shape(
                                            schema.clone(),
                                            $crate::types::Schema::tuple([]),
                                        )
                                    })?,
                                )?,
                            )*
                        })
                    }
                    other => Err($crate::utils::CodecError::record_shape(schema, other.schema())),
                }
            }
        }
    };
}
