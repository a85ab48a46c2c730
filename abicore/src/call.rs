//! End-to-end call pipeline: encode, execute, then decode the output or
//! resolve the failure.
use abitype::{codec::DecodeOptions, mapping::AbiValue, value::Value};
use log::debug;
use thiserror::Error;

use crate::{
    executor::{
        Bytecode, ExecutionOutcome, ExecutionRequest, ExecutorError, ExternalFunctions,
        QueryExecutor, RawFailure,
    },
    failure::FailureSet,
    function::FunctionDescriptor,
    utils::error::AbiError,
};

#[derive(Debug, Error)]
pub enum CallError<F: std::fmt::Debug> {
    /// The call failed with a case of the failure set.
    #[error("Call reverted: {0:?}")]
    Reverted(F),

    /// The call failed with a selector the failure set does not know.
    #[error("Call failed with unrecognized failure {0}")]
    UnrecognizedFailure(RawFailure),

    #[error(transparent)]
    Decode(#[from] AbiError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl<F: std::fmt::Debug> CallError<F> {
    /// Returns the failure case if the call reverted with a known one.
    pub fn reverted(&self) -> Option<&F> {
        match self {
            CallError::Reverted(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Call `descriptor` on `code` and decode its output.
///
/// With a single output, the result is that output (see
/// [`FunctionDescriptor::decode_single_output`]); otherwise it is the tuple of
/// all outputs.
/// Failures are resolved against `F`'s registry.
pub async fn call<F, E>(
    executor: &E,
    code: &Bytecode,
    descriptor: &FunctionDescriptor,
    inputs: &[Value],
    externals: &ExternalFunctions,
) -> Result<Value, CallError<F>>
where
    F: FailureSet,
    E: QueryExecutor + ?Sized,
{
    call_with_options(
        executor,
        code,
        descriptor,
        inputs,
        externals,
        DecodeOptions::default(),
    )
    .await
}

/// [`call`] with explicit decoder options.
pub async fn call_with_options<F, E>(
    executor: &E,
    code: &Bytecode,
    descriptor: &FunctionDescriptor,
    inputs: &[Value],
    externals: &ExternalFunctions,
    options: DecodeOptions,
) -> Result<Value, CallError<F>>
where
    F: FailureSet,
    E: QueryExecutor + ?Sized,
{
    let request = ExecutionRequest {
        code: code.clone(),
        call: descriptor.encode_call(inputs)?,
        known_errors: F::registry().descriptors().to_vec(),
        external_functions: externals.clone(),
    };

    debug!("Calling `{}` ({})", descriptor, descriptor.selector());
    match executor.execute(request).await? {
        ExecutionOutcome::Success(bytes) if descriptor.outputs().len() == 1 => {
            Ok(descriptor.decode_single_output_with(&bytes, options)?)
        }
        ExecutionOutcome::Success(bytes) => Ok(descriptor.decode_output_with(&bytes, options)?),
        ExecutionOutcome::Failure(failure) => match F::resolve(&failure) {
            Ok(resolved) => Err(CallError::Reverted(resolved)),
            Err(AbiError::UnrecognizedSelector { .. }) => {
                Err(CallError::UnrecognizedFailure(failure))
            }
            Err(err) => Err(CallError::Decode(err)),
        },
    }
}

/// [`call`], then map the output into `R`.
///
/// `R` maps the sole output for single-output functions and the output tuple
/// otherwise.
pub async fn call_typed<R, F, E>(
    executor: &E,
    code: &Bytecode,
    descriptor: &FunctionDescriptor,
    inputs: &[Value],
    externals: &ExternalFunctions,
) -> Result<R, CallError<F>>
where
    R: AbiValue,
    F: FailureSet,
    E: QueryExecutor + ?Sized,
{
    let value = call(executor, code, descriptor, inputs, externals).await?;
    R::from_value(value).map_err(|err| CallError::Decode(err.into()))
}
