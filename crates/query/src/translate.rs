//! Filter translation: [`FilterNode`] trees into store predicates.
//!
//! Translation is a pure function. An absent filter translates to
//! "match all live records"; a combinator whose children all translate
//! to nothing collapses to the identity predicate rather than to
//! false.

use bson::{Bson, Document, doc};

use crate::registry::SoftDelete;
use crate::types::{FilterNode, FilterOp};

/// The base predicate for an entity: soft-delete exclusion AND the
/// translated client filter.
pub fn base_predicate(soft_delete: &SoftDelete, filter: Option<&FilterNode>) -> Document {
    let excluded = not_deleted(soft_delete);
    match filter.map(translate) {
        Some(translated) if !translated.is_empty() => {
            doc! { "$and": [excluded, translated] }
        }
        _ => excluded,
    }
}

/// The predicate excluding soft-deleted records. Matches records where
/// the marker field is absent or holds any non-sentinel value.
pub fn not_deleted(soft_delete: &SoftDelete) -> Document {
    doc! { &soft_delete.field: { "$ne": soft_delete.sentinel.clone() } }
}

/// Translates a filter tree into a store predicate document.
///
/// Combinators recurse depth-first; children translating to the empty
/// document are dropped before wrapping.
pub fn translate(node: &FilterNode) -> Document {
    match node {
        FilterNode::Leaf { field, op, value } => leaf(field, *op, value),
        FilterNode::And(children) => combine("$and", children),
        FilterNode::Or(children) => combine("$or", children),
    }
}

fn combine(operator: &str, children: &[FilterNode]) -> Document {
    let mut translated: Vec<Document> = children
        .iter()
        .map(translate)
        .filter(|d| !d.is_empty())
        .collect();
    match translated.len() {
        0 => Document::new(),
        1 => translated.remove(0),
        _ => doc! { operator: translated },
    }
}

fn leaf(field: &str, op: FilterOp, value: &Bson) -> Document {
    match op {
        FilterOp::Eq => doc! { field: { "$eq": value.clone() } },
        FilterOp::Neq => doc! { field: { "$ne": value.clone() } },
        FilterOp::In => doc! { field: { "$in": in_operand(value) } },
        FilterOp::NotIn => doc! { field: { "$nin": in_operand(value) } },
        FilterOp::Contains => regex_leaf(field, value, "", ""),
        FilterOp::StartsWith => regex_leaf(field, value, "^", ""),
        FilterOp::EndsWith => regex_leaf(field, value, "", "$"),
        FilterOp::Gt => doc! { field: { "$gt": value.clone() } },
        FilterOp::Gte => doc! { field: { "$gte": value.clone() } },
        FilterOp::Lt => doc! { field: { "$lt": value.clone() } },
        FilterOp::Lte => doc! { field: { "$lte": value.clone() } },
    }
}

// Membership operators require an array operand; a scalar is treated
// as a one-element set.
fn in_operand(value: &Bson) -> Bson {
    match value {
        Bson::Array(_) => value.clone(),
        other => Bson::Array(vec![other.clone()]),
    }
}

// Case-insensitive anchored match on the literal (escaped) value.
fn regex_leaf(field: &str, value: &Bson, prefix: &str, suffix: &str) -> Document {
    let literal = match value {
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    };
    let pattern = format!("{}{}{}", prefix, regex::escape(&literal), suffix);
    doc! { field: { "$regex": pattern, "$options": "i" } }
}
