//! Closed sets of typed failure cases.
//!
//! A failure set is an enum with one arm per registered failure case plus the
//! catch-all `UnknownRevert { name, value }` arm. [`define_failures!`] declares
//! the enum, its [`ErrorRegistry`] and the mapping between the two from a
//! single list, so arms and registry entries cannot drift apart.
use log::{debug, warn};

use crate::{
    executor::RawFailure,
    function::FunctionDescriptor,
    registry::ErrorRegistry,
    utils::error::{AbiError, AbiResult},
};
use abitype::value::Value;

/// A closed enum of failure cases backed by a process-wide registry.
pub trait FailureSet: Sized + std::fmt::Debug {
    /// The registry of every non-fallback arm, in declaration order.
    fn registry() -> &'static ErrorRegistry;

    /// Total mapping from a registered descriptor and its decoded input tuple
    /// to an arm. Falls back to [`FailureSet::unknown_revert`] when the value
    /// does not have the field layout the arm expects.
    fn from_decoded(descriptor: &FunctionDescriptor, value: Value) -> Self;

    /// Build the catch-all arm.
    fn unknown_revert(name: String, value: String) -> Self;

    fn is_unknown_revert(&self) -> bool;

    /// See [`resolve`].
    fn resolve(failure: &RawFailure) -> AbiResult<Self> {
        resolve(failure)
    }
}

/// Resolve a raw failure payload into an arm of `F`.
///
/// 1. The selector must belong to `F`'s registry, otherwise the failure is
///    not resolvable here and [`AbiError::UnrecognizedSelector`] is returned.
/// 2. The trailing bytes are decoded against the descriptor's input tuple and
///    mapped through [`FailureSet::from_decoded`].
/// 3. If the trailing bytes do not decode, the result is
///    `UnknownRevert { name, value }` where `value` is the hex of the bytes.
pub fn resolve<F: FailureSet>(failure: &RawFailure) -> AbiResult<F> {
    let registry = F::registry();
    let descriptor = registry
        .match_selector(failure.selector)
        .ok_or(AbiError::UnrecognizedSelector {
            selector: failure.selector,
        })?;

    let resolved = match descriptor.decode_input(&failure.data) {
        Ok(value) => F::from_decoded(descriptor, value),
        Err(err) => {
            debug!("Failure data of `{}` does not decode: {}", descriptor, err);
            F::unknown_revert(
                descriptor.name().to_string(),
                format!("0x{}", hex::encode(&failure.data)),
            )
        }
    };

    if resolved.is_unknown_revert() {
        warn!(
            "Failure {} matched `{}` but not its field layout",
            failure.selector,
            descriptor.signature()
        );
    }
    Ok(resolved)
}

/// Declare a closed failure set.
///
/// Each arm lists its fields with their Rust types; the arm name and the
/// schemas of the field types form the signature of the registered
/// descriptor. An `UnknownRevert { name: String, value: String }` arm is added.
///
/// ```rust
/// use abicore::{define_failures, failure::FailureSet};
/// use abitype::value::{Address, U256};
///
/// define_failures! {
///     pub enum VaultFailure {
///         InsufficientShares { owner: Address, shares: U256 },
///         Paused {},
///     }
/// }
///
/// let descriptor = VaultFailure::registry().by_name("InsufficientShares").unwrap();
/// assert_eq!(descriptor.signature(), "InsufficientShares(address,uint256)");
/// assert_eq!(VaultFailure::registry().len(), 2);
/// ```
///
/// # Panics
///
/// The first access to the registry panics if two arms have colliding
/// selectors.
#[macro_export]
macro_rules! define_failures {
    (
        $( #[$meta:meta] )*
        $vis:vis enum $name:ident {
            $(
                $( #[$arm_meta:meta] )*
                $arm:ident { $( $field:ident : $ty:ty ),* $(,)? }
            ),* $(,)?
        }
    ) => {
        $( #[$meta] )*
        #[derive(Debug, Clone, PartialEq, Eq)]
        $vis enum $name {
            $(
                $( #[$arm_meta] )*
                $arm { $( $field: $ty ),* },
            )*
            /// The selector matched a registered case but the payload did not
            /// have its field layout.
            UnknownRevert { name: String, value: String },
        }

        impl $crate::failure::FailureSet for $name {
            fn registry() -> &'static $crate::registry::ErrorRegistry {
                static REGISTRY: $crate::once_cell::sync::Lazy<$crate::registry::ErrorRegistry> =
                    $crate::once_cell::sync::Lazy::new(|| {
                        $crate::registry::ErrorRegistry::new([
                            $(
                                $crate::function::FunctionDescriptor::new(
                                    stringify!($arm),
                                    [ $( <$ty as $crate::abitype::mapping::AbiValue>::schema() ),* ],
                                    [],
                                ),
                            )*
                        ])
                        .unwrap_or_else(|err| {
                            panic!("invalid failure set `{}`: {}", stringify!($name), err)
                        })
                    });
                &REGISTRY
            }

            #[allow(unused_variables)]
            fn from_decoded(
                descriptor: &$crate::function::FunctionDescriptor,
                value: $crate::abitype::value::Value,
            ) -> Self {
                let registry = Self::registry();
                $(
                    if registry
                        .by_name(stringify!($arm))
                        .is_some_and(|entry| entry.selector() == descriptor.selector())
                    {
                        let fallback = value.to_string();
                        return match <( $( $ty, )* ) as $crate::abitype::mapping::AbiValue>::from_value(value) {
                            Ok(( $( $field, )* )) => Self::$arm { $( $field ),* },
                            Err(_) => Self::UnknownRevert {
                                name: descriptor.name().to_string(),
                                value: fallback,
                            },
                        };
                    }
                )*
                Self::UnknownRevert {
                    name: descriptor.name().to_string(),
                    value: value.to_string(),
                }
            }

            fn unknown_revert(name: String, value: String) -> Self {
                Self::UnknownRevert { name, value }
            }

            fn is_unknown_revert(&self) -> bool {
                matches!(self, Self::UnknownRevert { .. })
            }
        }
    };
}

define_failures! {
    /// Failure cases raised by the executor itself rather than by the code.
    pub enum StandardFailure {
        /// `Error(string)`: a failure with a human-readable reason.
        Error { message: String },
        /// `Panic(uint256)`: an internal assertion with a numeric code.
        Panic { code: abitype::value::U256 },
    }
}
