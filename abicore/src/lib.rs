//! Function descriptors, selector-indexed failure registries and the query
//! executor boundary of the contract binary interface.
//!
//! The codec itself lives in [`abitype`]. This crate frames calls with their
//! [`function::Selector`], maps failure payloads to closed enums
//! ([`failure::FailureSet`], [`define_failures!`]) and drives calls through an
//! opaque [`executor::QueryExecutor`] ([`call::call`]).

pub mod call;
pub mod config;
pub mod executor;
pub mod failure;
pub mod function;
pub mod interface;
pub mod magic;
pub mod records;
pub mod registry;
#[cfg(any(test, feature = "test-utils"))]
pub mod tests_utils;
pub mod utils;

pub extern crate abitype;
pub extern crate once_cell;
