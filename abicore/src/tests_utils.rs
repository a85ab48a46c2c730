//! Scripted executor for tests.
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use abitype::value::Value;
use async_trait::async_trait;

use crate::{
    executor::{ExecutionOutcome, ExecutionRequest, ExecutorError, QueryExecutor, RawFailure},
    function::{FunctionDescriptor, Selector},
    utils::error::AbiResult,
};

/// What the [`ScriptedExecutor`] answers to a call.
#[derive(Debug, Clone)]
pub enum Script {
    Succeed(Vec<u8>),
    Fail(RawFailure),
    /// Delegate to the external function of that name from the request.
    External(String),
    /// Report that the request could not be executed.
    Unavailable,
    /// Never answer.
    Pending,
}

/// Executor answering each call selector with a canned [`Script`].
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    scripts: BTreeMap<Selector, Script>,
    calls: AtomicUsize,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, selector: Selector, script: Script) -> Self {
        self.scripts.insert(selector, script);
        self
    }

    /// Answer calls to `function` with the encoding of `outputs`.
    pub fn succeed(self, function: &FunctionDescriptor, outputs: &[Value]) -> AbiResult<Self> {
        let bytes = function.encode_output(outputs)?;
        Ok(self.on(function.selector(), Script::Succeed(bytes)))
    }

    /// Answer calls to `function` with the failure case `failure(args)`.
    pub fn revert(
        self,
        function: &FunctionDescriptor,
        failure: &FunctionDescriptor,
        args: &[Value],
    ) -> AbiResult<Self> {
        let raw = RawFailure::from_payload(&failure.encode_call(args)?)?;
        Ok(self.on(function.selector(), Script::Fail(raw)))
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutcome, ExecutorError> {
        self.calls.fetch_add(1, Ordering::AcqRel);

        let (selector, _) = Selector::split_payload(&request.call)?;
        let script = self.scripts.get(&selector).ok_or_else(|| {
            ExecutorError::Failed(format!("no script for selector {}", selector))
        })?;

        match script {
            Script::Succeed(bytes) => Ok(ExecutionOutcome::Success(bytes.clone())),
            Script::Fail(failure) => Ok(ExecutionOutcome::Failure(failure.clone())),
            Script::External(name) => {
                let function = request.external_functions.get(name).ok_or_else(|| {
                    ExecutorError::Failed(format!("no external function `{}`", name))
                })?;
                Ok(match function.invoke_encoded(&request.call)? {
                    Ok(bytes) => ExecutionOutcome::Success(bytes),
                    Err(failure) => ExecutionOutcome::Failure(failure),
                })
            }
            Script::Unavailable => Err(ExecutorError::Unavailable("scripted".into())),
            Script::Pending => std::future::pending().await,
        }
    }
}
