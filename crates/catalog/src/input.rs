//! Reusable per-field filter inputs.
//!
//! Every record type's filter is assembled from these building blocks:
//! a [`StringFilter`] for text fields and a [`RangeFilter`] for
//! ordered scalars. Each block converts itself into filter-tree leaves
//! for one named field; absent members contribute nothing, so an empty
//! block is vacuously true.

use bson::Bson;
use serde::Deserialize;

use meridian_query::{FilterNode, FilterOp};

/// Constraints on a string field.
///
/// `contains`, `starts_with`, and `ends_with` match case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringFilter {
    /// Exact match.
    pub eq: Option<String>,
    /// Exact mismatch.
    pub neq: Option<String>,
    /// Membership in a set of values.
    #[serde(rename = "in")]
    pub any_of: Option<Vec<String>>,
    /// Exclusion from a set of values.
    #[serde(rename = "nin")]
    pub none_of: Option<Vec<String>>,
    /// Substring match.
    pub contains: Option<String>,
    /// Prefix match.
    pub starts_with: Option<String>,
    /// Suffix match.
    pub ends_with: Option<String>,
}

impl StringFilter {
    /// Appends one leaf per present member, constraining `field`.
    pub fn leaves(&self, field: &str, out: &mut Vec<FilterNode>) {
        if let Some(v) = &self.eq {
            out.push(FilterNode::leaf(field, FilterOp::Eq, v.clone()));
        }
        if let Some(v) = &self.neq {
            out.push(FilterNode::leaf(field, FilterOp::Neq, v.clone()));
        }
        if let Some(vs) = &self.any_of {
            let values: Vec<Bson> = vs.iter().map(|v| Bson::String(v.clone())).collect();
            out.push(FilterNode::leaf(field, FilterOp::In, values));
        }
        if let Some(vs) = &self.none_of {
            let values: Vec<Bson> = vs.iter().map(|v| Bson::String(v.clone())).collect();
            out.push(FilterNode::leaf(field, FilterOp::NotIn, values));
        }
        if let Some(v) = &self.contains {
            out.push(FilterNode::leaf(field, FilterOp::Contains, v.clone()));
        }
        if let Some(v) = &self.starts_with {
            out.push(FilterNode::leaf(field, FilterOp::StartsWith, v.clone()));
        }
        if let Some(v) = &self.ends_with {
            out.push(FilterNode::leaf(field, FilterOp::EndsWith, v.clone()));
        }
    }
}

/// Constraints on an ordered scalar field (numbers, timestamps).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeFilter<T> {
    /// Exact match.
    pub eq: Option<T>,
    /// Exact mismatch.
    pub neq: Option<T>,
    /// Strictly greater than.
    pub gt: Option<T>,
    /// Greater than or equal.
    pub gte: Option<T>,
    /// Strictly less than.
    pub lt: Option<T>,
    /// Less than or equal.
    pub lte: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            eq: None,
            neq: None,
            gt: None,
            gte: None,
            lt: None,
            lte: None,
        }
    }
}

impl<T: Clone + Into<Bson>> RangeFilter<T> {
    /// Appends one leaf per present member, constraining `field`.
    pub fn leaves(&self, field: &str, out: &mut Vec<FilterNode>) {
        let pairs: [(FilterOp, &Option<T>); 6] = [
            (FilterOp::Eq, &self.eq),
            (FilterOp::Neq, &self.neq),
            (FilterOp::Gt, &self.gt),
            (FilterOp::Gte, &self.gte),
            (FilterOp::Lt, &self.lt),
            (FilterOp::Lte, &self.lte),
        ];
        for (op, value) in pairs {
            if let Some(v) = value {
                out.push(FilterNode::leaf(field, op, v.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_filter_yields_no_leaves() {
        let mut out = Vec::new();
        StringFilter::default().leaves("name", &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_string_filter_emits_one_leaf_per_member() {
        let filter = StringFilter {
            eq: Some("Acme".to_string()),
            ends_with: Some("corp".to_string()),
            ..Default::default()
        };
        let mut out = Vec::new();
        filter.leaves("name", &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_range_filter_emits_bounds() {
        let filter = RangeFilter::<i64> {
            gte: Some(10),
            lt: Some(20),
            ..Default::default()
        };
        let mut out = Vec::new();
        filter.leaves("quantity", &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_string_filter_deserializes_camel_case() {
        let filter: StringFilter = serde_json::from_str(
            r#"{ "startsWith": "A", "in": ["x", "y"] }"#,
        )
        .unwrap();
        assert_eq!(filter.starts_with.as_deref(), Some("A"));
        assert_eq!(filter.any_of.as_deref(), Some(&["x".to_string(), "y".to_string()][..]));
    }
}
