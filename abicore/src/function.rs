//! Function descriptors and selectors.
//!
//! A [`FunctionDescriptor`] names an operation of the interface together with
//! the ordered schemas of its inputs and outputs. Its [`Selector`] is derived
//! once, at construction, from the canonical signature `name(t1,t2,...)`.
use abitype::{
    codec::{self, DecodeOptions},
    parser,
    types::Schema,
    value::Value,
};
use log::trace;
use sha3::{Digest, Keccak256};

use crate::{
    magic::SELECTOR_SIZE,
    utils::error::{AbiError, AbiResult},
};

/// Short fingerprint of a canonical signature: the first four bytes of its
/// Keccak-256 digest.
///
/// ```rust
/// # use abicore::function::Selector;
/// let selector = Selector::of_signature("transfer(address,uint256)");
/// assert_eq!(selector.to_string(), "0xa9059cbb");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; SELECTOR_SIZE]);

impl Selector {
    pub fn of_signature(signature: &str) -> Self {
        let digest = Keccak256::digest(signature.as_bytes());
        let mut bytes = [0u8; SELECTOR_SIZE];
        bytes.copy_from_slice(&digest[..SELECTOR_SIZE]);
        Self(bytes)
    }

    /// Split a call or failure payload into its selector and trailing bytes.
    pub fn split_payload(payload: &[u8]) -> AbiResult<(Self, &[u8])> {
        payload
            .split_first_chunk::<SELECTOR_SIZE>()
            .map(|(selector, rest)| (Self(*selector), rest))
            .ok_or(AbiError::PayloadTooShort { len: payload.len() })
    }
}

impl From<[u8; SELECTOR_SIZE]> for Selector {
    fn from(value: [u8; SELECTOR_SIZE]) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Render a schema list as `(t1,t2,...)`.
fn schema_list(schemas: &[Schema]) -> String {
    let parts: Vec<String> = schemas.iter().map(Schema::to_string).collect();
    format!("({})", parts.join(","))
}

/// Render the schemas of a list of values as `(t1,t2,...)`.
fn value_list(values: &[Value]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.schema().to_string()).collect();
    format!("({})", parts.join(","))
}

/// An operation of the interface: name, ordered input and output schemas,
/// and the cached selector of its signature. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDescriptor {
    name: String,
    inputs: Vec<Schema>,
    outputs: Vec<Schema>,
    signature: String,
    selector: Selector,
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        inputs: impl IntoIterator<Item = Schema>,
        outputs: impl IntoIterator<Item = Schema>,
    ) -> Self {
        let name = name.into();
        let inputs: Vec<Schema> = inputs.into_iter().collect();
        let outputs: Vec<Schema> = outputs.into_iter().collect();
        let signature = format!("{}{}", name, schema_list(&inputs));
        let selector = Selector::of_signature(&signature);

        Self {
            name,
            inputs,
            outputs,
            signature,
            selector,
        }
    }

    /// Build a descriptor without outputs from a signature such as
    /// `transfer(address,uint256)`.
    pub fn parse(signature: &str) -> AbiResult<Self> {
        let (name, inputs) = parser::parse_signature(signature)?;
        Ok(Self::new(name, inputs, []))
    }

    /// Build a descriptor from a signature and an output list such as
    /// `(uint256,bool)`.
    ///
    /// ```rust
    /// # use abicore::function::FunctionDescriptor;
    /// let f = FunctionDescriptor::parse_with_outputs("balanceOf(address)", "(uint256)").unwrap();
    /// assert_eq!(f.signature(), "balanceOf(address)");
    /// assert_eq!(f.selector().to_string(), "0x70a08231");
    /// assert_eq!(f.outputs().len(), 1);
    /// ```
    pub fn parse_with_outputs(signature: &str, outputs: &str) -> AbiResult<Self> {
        let (name, inputs) = parser::parse_signature(signature)?;
        let outputs = parser::parse_schema_list(outputs)?;
        Ok(Self::new(name, inputs, outputs))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Schema] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Schema] {
        &self.outputs
    }

    /// Canonical signature `name(t1,t2,...)`; outputs do not take part in it.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// The tuple of all input schemas.
    pub fn input_schema(&self) -> Schema {
        Schema::tuple(self.inputs.iter().cloned())
    }

    /// The tuple of all output schemas.
    pub fn output_schema(&self) -> Schema {
        Schema::tuple(self.outputs.iter().cloned())
    }

    fn check_values(&self, expected: &[Schema], values: &[Value]) -> AbiResult<()> {
        let matches = expected.len() == values.len()
            && values
                .iter()
                .zip(expected.iter())
                .all(|(value, schema)| value.conforms_to(schema));

        if !matches {
            return Err(AbiError::ArgumentMismatch {
                signature: self.signature.clone(),
                expected: schema_list(expected),
                found: value_list(values),
            });
        }

        values.iter().try_for_each(Value::verify)?;
        Ok(())
    }

    /// Encode a call payload: the selector followed by the head/tail encoding
    /// of the argument tuple.
    ///
    /// The payload of a failure case is framed the same way, so this also
    /// encodes failures when `self` describes one.
    pub fn encode_call(&self, args: &[Value]) -> AbiResult<Vec<u8>> {
        self.check_values(&self.inputs, args)?;
        trace!("Encoding call to `{}` ({})", self.signature, self.selector);

        let mut payload = self.selector.0.to_vec();
        payload.extend(codec::encode_sequence(args));
        Ok(payload)
    }

    /// Encode the return data of this function (no selector).
    pub fn encode_output(&self, outputs: &[Value]) -> AbiResult<Vec<u8>> {
        self.check_values(&self.outputs, outputs)?;
        Ok(codec::encode_sequence(outputs))
    }

    /// Decode return data as the tuple of all outputs.
    pub fn decode_output(&self, bytes: &[u8]) -> AbiResult<Value> {
        self.decode_output_with(bytes, DecodeOptions::default())
    }

    pub fn decode_output_with(&self, bytes: &[u8], options: DecodeOptions) -> AbiResult<Value> {
        Ok(codec::decode_with(bytes, &self.output_schema(), options)?)
    }

    /// Decode return data holding exactly one output.
    ///
    /// A primitive output is always framed as the one-member output tuple and
    /// is decoded that way only. A tuple or array output is accepted in both
    /// the bare and the single-wrapped framing.
    pub fn decode_single_output(&self, bytes: &[u8]) -> AbiResult<Value> {
        self.decode_single_output_with(bytes, DecodeOptions::default())
    }

    pub fn decode_single_output_with(
        &self,
        bytes: &[u8],
        options: DecodeOptions,
    ) -> AbiResult<Value> {
        match self.outputs.as_slice() {
            [output] if output.is_primary() => {
                match codec::decode_with(bytes, &output.wrapped(), options)? {
                    Value::Tuple(mut members) if members.len() == 1 => Ok(members.remove(0)),
                    other => unreachable!("`{}` decoded to `{}`", output.wrapped(), other),
                }
            }
            [output] => Ok(codec::decode_resolving_with(bytes, output, options)?),
            outputs => Err(AbiError::OutputArity {
                signature: self.signature.clone(),
                count: outputs.len(),
            }),
        }
    }

    /// Decode the argument tuple of a payload whose selector was already
    /// stripped.
    pub fn decode_input(&self, bytes: &[u8]) -> AbiResult<Value> {
        self.decode_input_with(bytes, DecodeOptions::default())
    }

    pub fn decode_input_with(&self, bytes: &[u8], options: DecodeOptions) -> AbiResult<Value> {
        Ok(codec::decode_with(bytes, &self.input_schema(), options)?)
    }

    /// Decode a full call payload, checking that it targets this function.
    pub fn decode_call(&self, payload: &[u8]) -> AbiResult<Value> {
        let (selector, args) = Selector::split_payload(payload)?;
        if selector != self.selector {
            return Err(AbiError::UnrecognizedSelector { selector });
        }
        self.decode_input(args)
    }
}

impl std::fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.signature)?;
        if !self.outputs.is_empty() {
            write!(f, " returns {}", schema_list(&self.outputs))?;
        }
        Ok(())
    }
}
