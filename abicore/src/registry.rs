//! Selector-indexed catalog of failure cases.
//!
//! Every entry is a [`FunctionDescriptor`] without outputs; a failure payload
//! is framed exactly like a call to it (selector, then the head/tail encoding
//! of its input tuple).
use abitype::value::Value;
use log::debug;

use crate::{
    executor::RawFailure,
    function::{FunctionDescriptor, Selector},
    interface::Interface,
    utils::error::{AbiError, AbiResult},
};

/// A failure payload decoded against its registered descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFailure<'a> {
    pub descriptor: &'a FunctionDescriptor,
    /// The decoded input tuple.
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRegistry {
    entries: Interface,
}

impl ErrorRegistry {
    /// Build a registry, preserving the order of `descriptors`.
    ///
    /// Fails on selector collisions and on descriptors declaring outputs.
    pub fn new(descriptors: impl IntoIterator<Item = FunctionDescriptor>) -> AbiResult<Self> {
        let mut entries = Interface::default();
        for descriptor in descriptors {
            if !descriptor.outputs().is_empty() {
                return Err(AbiError::UnexpectedOutputs {
                    signature: descriptor.signature().to_string(),
                });
            }
            entries.push(descriptor)?;
        }

        debug!("Built error registry of {} failure cases", entries.len());
        Ok(Self { entries })
    }

    pub fn match_selector(&self, selector: Selector) -> Option<&FunctionDescriptor> {
        self.entries.match_selector(selector)
    }

    pub fn by_name(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.entries.by_name(name)
    }

    /// Find the descriptor of `failure` and decode its trailing bytes against
    /// the descriptor's input tuple.
    ///
    /// An unrecognized selector is not resolvable here and is returned as
    /// [`AbiError::UnrecognizedSelector`].
    pub fn decode_failure(&self, failure: &RawFailure) -> AbiResult<DecodedFailure<'_>> {
        let descriptor = self
            .match_selector(failure.selector)
            .ok_or(AbiError::UnrecognizedSelector {
                selector: failure.selector,
            })?;
        let value = descriptor.decode_input(&failure.data)?;
        Ok(DecodedFailure { descriptor, value })
    }

    /// The registered descriptors, in registration order.
    pub fn descriptors(&self) -> &[FunctionDescriptor] {
        self.entries.iter().as_slice()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
