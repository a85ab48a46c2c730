//! Aggregate schemas
//!
//! This file provides the composite shapes built on top of [`Schema`]:
//! - `TupleType`: an ordered, fixed-arity list of member schemas.
//! - `ArrayType`: a homogeneous, dynamic-length sequence of one element schema.
//!
//! Both render their canonical signature form through `Display`, which is the
//! text selectors are computed from.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Schema;

/// Tuple schema
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TupleType {
    pub elements: Vec<Schema>,
}

impl TupleType {
    pub fn new(elements: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// Number of members of the tuple.
    #[inline]
    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    /// A tuple is static iff every member is static.
    pub fn is_static(&self) -> bool {
        self.elements.iter().all(Schema::is_static)
    }

    /// Size of the head region of this tuple: every member contributes either
    /// its inline size (static) or a single offset word (dynamic).
    pub fn head_region_size(&self) -> usize {
        self.elements.iter().map(Schema::head_size).sum()
    }
}

impl std::fmt::Display for TupleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, ")")
    }
}

/// Dynamic-length array schema.
///
/// Notice that fixed-length arrays are not modelled: an array always carries
/// its element count as a leading word and is therefore always dynamic.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayType {
    pub element: Box<Schema>,
}

impl ArrayType {
    pub fn new(element: Schema) -> Self {
        Self {
            element: Box::new(element),
        }
    }

    /// Number of bytes a single element occupies in the element region's
    /// head. Used to reject length words that cannot possibly fit.
    pub fn element_head_size(&self) -> usize {
        self.element.head_size()
    }
}

impl std::fmt::Display for ArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[]", self.element)
    }
}
