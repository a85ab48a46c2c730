//! Boundary of the query executor.
//!
//! The executor runs opaque code against an encoded call and answers with
//! either raw return bytes or a raw failure payload. Its semantics are not
//! part of this crate; only the shape of the exchange is.
use std::{collections::BTreeMap, sync::Arc};

use abitype::value::Value;
use async_trait::async_trait;
use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

use crate::{
    function::{FunctionDescriptor, Selector},
    utils::error::{AbiError, AbiResult},
};

/// Shared, immutable code blob.
///
/// Cloning is cheap, so a single blob can back a process-wide constant:
///
/// ```rust
/// # use abicore::executor::Bytecode;
/// use once_cell::sync::Lazy;
///
/// static POOL_CODE: Lazy<Bytecode> = Lazy::new(|| Bytecode::from(vec![0x60, 0x80]));
/// assert_eq!(POOL_CODE.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bytecode(Arc<[u8]>);

impl Bytecode {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Parse `0x`-prefixed (or bare) hexadecimal text.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let digits = text.trim().strip_prefix("0x").unwrap_or(text.trim());
        Ok(Self(hex::decode(digits)?.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Bytecode {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into())
    }
}

impl From<&[u8]> for Bytecode {
    fn from(value: &[u8]) -> Self {
        Self(value.into())
    }
}

impl AsRef<[u8]> for Bytecode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A failure payload as returned by the executor: a selector plus opaque
/// trailing bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawFailure {
    pub selector: Selector,
    pub data: Vec<u8>,
}

impl RawFailure {
    pub fn new(selector: Selector, data: Vec<u8>) -> Self {
        Self { selector, data }
    }

    /// Split a complete failure payload into selector and trailing bytes.
    pub fn from_payload(payload: &[u8]) -> AbiResult<Self> {
        let (selector, data) = Selector::split_payload(payload)?;
        Ok(Self::new(selector, data.to_vec()))
    }

    pub fn to_payload(&self) -> Vec<u8> {
        let mut payload = self.selector.0.to_vec();
        payload.extend_from_slice(&self.data);
        payload
    }
}

impl std::fmt::Display for RawFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} with {} bytes of data", self.selector, self.data.len())
    }
}

/// Handler of an injectable external function: maps the decoded input tuple
/// to the output values, or to a failure.
pub type ExternalHandler = Arc<dyn Fn(Value) -> Result<Vec<Value>, RawFailure> + Send + Sync>;

/// Stand-in for a function the executed code calls out to.
#[derive(Clone)]
pub struct ExternalFunction {
    pub descriptor: FunctionDescriptor,
    pub handler: ExternalHandler,
}

impl ExternalFunction {
    pub fn new(
        descriptor: FunctionDescriptor,
        handler: impl Fn(Value) -> Result<Vec<Value>, RawFailure> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            handler: Arc::new(handler),
        }
    }

    pub fn invoke(&self, inputs: Value) -> Result<Vec<Value>, RawFailure> {
        (self.handler)(inputs)
    }

    /// Decode a call payload, run the handler and encode its outputs.
    ///
    /// The outer result reports codec failures; the inner one is the
    /// handler's own outcome.
    pub fn invoke_encoded(&self, call: &[u8]) -> AbiResult<Result<Vec<u8>, RawFailure>> {
        let inputs = self.descriptor.decode_call(call)?;
        match self.invoke(inputs) {
            Ok(outputs) => Ok(Ok(self.descriptor.encode_output(&outputs)?)),
            Err(failure) => Ok(Err(failure)),
        }
    }
}

impl std::fmt::Debug for ExternalFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalFunction")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Table of external functions, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ExternalFunctions {
    functions: BTreeMap<String, ExternalFunction>,
}

impl ExternalFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ExternalFunctions::insert`].
    pub fn with(mut self, function: ExternalFunction) -> Self {
        self.insert(function);
        self
    }

    /// Register `function` under its descriptor's name, returning the one it
    /// replaces, if any.
    pub fn insert(&mut self, function: ExternalFunction) -> Option<ExternalFunction> {
        self.functions
            .insert(function.descriptor.name().to_string(), function)
    }

    pub fn get(&self, name: &str) -> Option<&ExternalFunction> {
        self.functions.get(name)
    }

    pub fn by_selector(&self, selector: Selector) -> Option<&ExternalFunction> {
        self.functions
            .values()
            .find(|f| f.descriptor.selector() == selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExternalFunction)> {
        self.functions.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// One request to the executor.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub code: Bytecode,
    /// Selector followed by the encoded argument tuple.
    pub call: Vec<u8>,
    /// Failure cases the caller is able to resolve.
    pub known_errors: Vec<FunctionDescriptor>,
    pub external_functions: ExternalFunctions,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumTryAs)]
pub enum ExecutionOutcome {
    /// Raw return bytes.
    Success(Vec<u8>),
    Failure(RawFailure),
}

/// The executor could not run the request at all.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Query executor is unavailable: {0}")]
    Unavailable(String),

    #[error("Query execution failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Runs code against an encoded call.
///
/// Each call is a single request/response with no partial results. Dropping
/// the returned future abandons the request.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutcome, ExecutorError>;
}

#[cfg(test)]
mod tests {
    use abitype::types::Schema;

    use super::*;

    fn doubler() -> ExternalFunction {
        let descriptor = FunctionDescriptor::new("double", [Schema::UINT256], [Schema::UINT256]);
        ExternalFunction::new(descriptor, |inputs| match inputs {
            Value::Tuple(args) => match args.as_slice() {
                [Value::Uint(x)] => Ok(vec![Value::Uint(
                    abitype::value::U256::new(x.as_biguint() * 2u32).unwrap_or_default(),
                )]),
                _ => Err(RawFailure::new(Selector([0; 4]), vec![])),
            },
            _ => Err(RawFailure::new(Selector([0; 4]), vec![])),
        })
    }

    #[test]
    fn external_function_round_trip() {
        let double = doubler();
        let call = double.descriptor.encode_call(&[Value::uint(21u8)]).unwrap();
        let output = double.invoke_encoded(&call).unwrap().unwrap();
        assert_eq!(
            double.descriptor.decode_single_output(&output).unwrap(),
            Value::uint(42u8)
        );
    }

    #[test]
    fn external_functions_lookup() {
        let table = ExternalFunctions::new().with(doubler());
        let selector = table.get("double").unwrap().descriptor.selector();
        assert!(table.by_selector(selector).is_some());
        assert!(table.by_selector(Selector([9; 4])).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn raw_failure_payload() {
        let failure = RawFailure::from_payload(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(failure.selector, Selector([1, 2, 3, 4]));
        assert_eq!(failure.data, vec![5, 6]);
        assert_eq!(failure.to_payload(), vec![1, 2, 3, 4, 5, 6]);
        assert!(RawFailure::from_payload(&[1, 2, 3]).is_err());
    }

    #[test]
    fn bytecode_from_hex() {
        let code = Bytecode::from_hex("0x6080").unwrap();
        assert_eq!(code.as_bytes(), &[0x60, 0x80]);
        assert!(Bytecode::from_hex("0xzz").is_err());
    }
}
