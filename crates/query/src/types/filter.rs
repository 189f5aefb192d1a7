//! The recursive filter tree.
//!
//! Client-supplied, entity-specific filter inputs are converted into
//! this uniform sum type before translation into a store predicate,
//! keeping the translator and the pagination engine entity-agnostic.
//!
//! A leaf whose input value was absent is simply never built: absence
//! is vacuous truth, so the leaf is omitted from its parent combinator
//! rather than short-circuiting the combinator to false.

use std::fmt;

use bson::Bson;

/// A node in a filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// A single field comparison.
    Leaf {
        /// The document field path the comparison applies to.
        field: String,
        /// The comparison operator.
        op: FilterOp,
        /// The comparison operand. For [`FilterOp::In`] and
        /// [`FilterOp::NotIn`] this is a [`Bson::Array`].
        value: Bson,
    },
    /// All children must match.
    And(Vec<FilterNode>),
    /// At least one child must match.
    Or(Vec<FilterNode>),
}

/// Comparison operators supported by filter leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equality.
    Eq,
    /// Negated equality.
    Neq,
    /// Set membership.
    In,
    /// Negated set membership.
    NotIn,
    /// Case-insensitive substring match.
    Contains,
    /// Case-insensitive prefix match.
    StartsWith,
    /// Case-insensitive suffix match.
    EndsWith,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::In => "in",
            FilterOp::NotIn => "nin",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "startsWith",
            FilterOp::EndsWith => "endsWith",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
        };
        write!(f, "{}", name)
    }
}

impl FilterNode {
    /// Creates a leaf comparison node.
    pub fn leaf(field: impl Into<String>, op: FilterOp, value: impl Into<Bson>) -> Self {
        FilterNode::Leaf {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Combines nodes under AND, returning `None` when no children
    /// survive. An empty combinator is the identity element, not false.
    pub fn all(children: impl IntoIterator<Item = FilterNode>) -> Option<Self> {
        let children: Vec<_> = children.into_iter().collect();
        match children.len() {
            0 => None,
            1 => children.into_iter().next(),
            _ => Some(FilterNode::And(children)),
        }
    }

    /// Combines nodes under OR, returning `None` when no children
    /// survive.
    pub fn any(children: impl IntoIterator<Item = FilterNode>) -> Option<Self> {
        let children: Vec<_> = children.into_iter().collect();
        match children.len() {
            0 => None,
            1 => children.into_iter().next(),
            _ => Some(FilterNode::Or(children)),
        }
    }
}
