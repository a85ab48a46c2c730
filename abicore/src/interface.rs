use std::collections::BTreeMap;

use abitype::value::Value;
use log::debug;

use crate::{
    function::{FunctionDescriptor, Selector},
    utils::error::{AbiError, AbiResult},
};

/// Registration-ordered set of function descriptors, indexed by selector.
///
/// No two descriptors of an interface may share a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    functions: Vec<FunctionDescriptor>,
    by_selector: BTreeMap<Selector, usize>,
}

impl Interface {
    pub fn new(functions: impl IntoIterator<Item = FunctionDescriptor>) -> AbiResult<Self> {
        let mut interface = Self::default();
        for function in functions {
            interface.push(function)?;
        }
        debug!("Built interface of {} functions", interface.len());
        Ok(interface)
    }

    /// Register one more descriptor. Fails if its selector is already taken.
    pub fn push(&mut self, function: FunctionDescriptor) -> AbiResult<()> {
        if let Some(existing) = self.match_selector(function.selector()) {
            return Err(AbiError::SelectorCollision {
                selector: function.selector(),
                signature: function.signature().to_string(),
                existing: existing.signature().to_string(),
            });
        }

        self.by_selector
            .insert(function.selector(), self.functions.len());
        self.functions.push(function);
        Ok(())
    }

    pub fn match_selector(&self, selector: Selector) -> Option<&FunctionDescriptor> {
        self.by_selector
            .get(&selector)
            .map(|index| &self.functions[*index])
    }

    /// Returns the first registered descriptor named `name`.
    pub fn by_name(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Returns every overload named `name`, in registration order.
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FunctionDescriptor> {
        self.functions.iter().filter(move |f| f.name() == name)
    }

    /// Find the targeted function of a call payload and decode its arguments.
    pub fn decode_call(&self, payload: &[u8]) -> AbiResult<(&FunctionDescriptor, Value)> {
        let (selector, args) = Selector::split_payload(payload)?;
        let function = self
            .match_selector(selector)
            .ok_or(AbiError::UnrecognizedSelector { selector })?;
        Ok((function, function.decode_input(args)?))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FunctionDescriptor> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Interface {
    type Item = &'a FunctionDescriptor;
    type IntoIter = std::slice::Iter<'a, FunctionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
