//! Predicate and pipeline evaluation over in-memory documents.
//!
//! Supports exactly the operator and stage subset the engine emits:
//! `$and`/`$or`/`$eq`/`$ne`/`$in`/`$nin`/`$regex`/`$gt`/`$gte`/`$lt`/
//! `$lte` in predicates, and `$addFields` (with the `$cond`/`$eq`/
//! `$ifNull` null-key expression), `$sort`, `$project`, `$match`, and
//! `$limit` stages. Anything else is rejected rather than silently
//! ignored.

use std::cmp::Ordering;

use bson::{Bson, Document};

use crate::error::StoreError;
use crate::util::lookup;

/// Evaluates a match predicate against a document.
pub(crate) fn matches(doc: &Document, predicate: &Document) -> Result<bool, StoreError> {
    for (key, condition) in predicate {
        let matched = match key.as_str() {
            "$and" => {
                let clauses = as_clause_array(condition)?;
                let mut all = true;
                for clause in clauses {
                    if !matches(doc, clause)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => {
                let clauses = as_clause_array(condition)?;
                let mut any = false;
                for clause in clauses {
                    if matches(doc, clause)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            field => field_matches(lookup(doc, field), condition)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn as_clause_array(value: &Bson) -> Result<Vec<&Document>, StoreError> {
    match value {
        Bson::Array(items) => items
            .iter()
            .map(|item| match item {
                Bson::Document(d) => Ok(d),
                other => Err(unsupported(format!("combinator clause: {}", other))),
            })
            .collect(),
        other => Err(unsupported(format!("combinator operand: {}", other))),
    }
}

fn field_matches(value: Option<&Bson>, condition: &Bson) -> Result<bool, StoreError> {
    match condition {
        Bson::Document(operators) if is_operator_doc(operators) => {
            let mut regex_options = "";
            if let Ok(options) = operators.get_str("$options") {
                regex_options = options;
            }
            for (op, operand) in operators {
                let matched = match op.as_str() {
                    "$eq" => eq(value, operand),
                    "$ne" => !eq(value, operand),
                    "$in" => membership(value, operand)?,
                    "$nin" => !membership(value, operand)?,
                    "$gt" => ordered(value, operand, Ordering::Greater, false),
                    "$gte" => ordered(value, operand, Ordering::Greater, true),
                    "$lt" => ordered(value, operand, Ordering::Less, false),
                    "$lte" => ordered(value, operand, Ordering::Less, true),
                    "$regex" => regex_match(value, operand, regex_options)?,
                    "$options" => true,
                    other => return Err(unsupported(format!("operator {}", other))),
                };
                if !matched {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        // A bare value is an equality condition.
        literal => Ok(eq(value, literal)),
    }
}

fn is_operator_doc(doc: &Document) -> bool {
    doc.keys().next().is_some_and(|k| k.starts_with('$'))
}

// Query equality: a null target matches null and missing values;
// numbers compare across integer/double representations.
fn eq(value: Option<&Bson>, target: &Bson) -> bool {
    match (value, target) {
        (None | Some(Bson::Null), Bson::Null) => true,
        (None, _) | (_, Bson::Null) => false,
        (Some(v), t) => match (numeric(v), numeric(t)) {
            (Some(a), Some(b)) => a == b,
            _ => v == t,
        },
    }
}

fn membership(value: Option<&Bson>, operand: &Bson) -> Result<bool, StoreError> {
    match operand {
        Bson::Array(candidates) => Ok(candidates.iter().any(|c| eq(value, c))),
        other => Err(unsupported(format!("$in operand: {}", other))),
    }
}

// Ordering comparisons only match values in the same type bracket;
// null and missing values never match.
fn ordered(value: Option<&Bson>, target: &Bson, wanted: Ordering, or_equal: bool) -> bool {
    let Some(value) = value else { return false };
    if matches!(value, Bson::Null) || matches!(target, Bson::Null) {
        return false;
    }
    if type_rank(value) != type_rank(target) {
        return false;
    }
    let ordering = compare(value, target);
    ordering == wanted || (or_equal && ordering == Ordering::Equal)
}

fn regex_match(value: Option<&Bson>, pattern: &Bson, options: &str) -> Result<bool, StoreError> {
    let Bson::String(pattern) = pattern else {
        return Err(unsupported(format!("$regex operand: {}", pattern)));
    };
    let regex = regex::RegexBuilder::new(pattern)
        .case_insensitive(options.contains('i'))
        .build()
        .map_err(|e| StoreError::Query {
            message: format!("invalid regex: {}", e),
            source: Some(Box::new(e)),
        })?;
    Ok(match value {
        Some(Bson::String(s)) => regex.is_match(s),
        _ => false,
    })
}

/// Applies pipeline stages to a document set.
pub(crate) fn apply_stages(
    mut documents: Vec<Document>,
    stages: &[Document],
) -> Result<Vec<Document>, StoreError> {
    for stage in stages {
        let (name, body) = stage
            .iter()
            .next()
            .ok_or_else(|| unsupported("empty pipeline stage".to_string()))?;
        documents = match (name.as_str(), body) {
            ("$match", Bson::Document(predicate)) => {
                let mut kept = Vec::with_capacity(documents.len());
                for doc in documents {
                    if matches(&doc, predicate)? {
                        kept.push(doc);
                    }
                }
                kept
            }
            ("$addFields", Bson::Document(fields)) => {
                let mut out = Vec::with_capacity(documents.len());
                for mut doc in documents {
                    for (key, expr) in fields {
                        let computed = evaluate_expr(&doc, expr)?;
                        doc.insert(key.clone(), computed);
                    }
                    out.push(doc);
                }
                out
            }
            ("$sort", Bson::Document(keys)) => {
                let keys: Vec<(String, i32)> = keys
                    .iter()
                    .map(|(k, v)| match v {
                        Bson::Int32(d) => Ok((k.clone(), *d)),
                        Bson::Int64(d) => Ok((k.clone(), *d as i32)),
                        other => Err(unsupported(format!("$sort direction: {}", other))),
                    })
                    .collect::<Result<_, _>>()?;
                documents.sort_by(|a, b| {
                    for (field, direction) in &keys {
                        let left = lookup(a, field).unwrap_or(&Bson::Null);
                        let right = lookup(b, field).unwrap_or(&Bson::Null);
                        let ordering = compare(left, right);
                        if ordering != Ordering::Equal {
                            return if *direction >= 0 {
                                ordering
                            } else {
                                ordering.reverse()
                            };
                        }
                    }
                    Ordering::Equal
                });
                documents
            }
            ("$project", Bson::Document(projection)) => {
                let dropped: Vec<&String> = projection.keys().collect();
                for doc in &mut documents {
                    for key in &dropped {
                        doc.remove(*key);
                    }
                }
                documents
            }
            ("$limit", limit) => {
                let limit = match limit {
                    Bson::Int32(n) => *n as usize,
                    Bson::Int64(n) => *n as usize,
                    other => return Err(unsupported(format!("$limit operand: {}", other))),
                };
                documents.truncate(limit);
                documents
            }
            (other, _) => return Err(unsupported(format!("pipeline stage {}", other))),
        };
    }
    Ok(documents)
}

// Aggregation expression subset used by the sort planner's null keys.
fn evaluate_expr(doc: &Document, expr: &Bson) -> Result<Bson, StoreError> {
    match expr {
        Bson::String(s) if s.starts_with('$') => {
            Ok(lookup(doc, &s[1..]).cloned().unwrap_or(Bson::Null))
        }
        Bson::Document(d) => {
            let (op, body) = d
                .iter()
                .next()
                .ok_or_else(|| unsupported("empty expression".to_string()))?;
            match (op.as_str(), body) {
                ("$cond", Bson::Document(cond)) => {
                    let test = evaluate_expr(doc, cond.get("if").unwrap_or(&Bson::Null))?;
                    let branch = if test == Bson::Boolean(true) { "then" } else { "else" };
                    evaluate_expr(doc, cond.get(branch).unwrap_or(&Bson::Null))
                }
                ("$eq", Bson::Array(operands)) if operands.len() == 2 => {
                    let left = evaluate_expr(doc, &operands[0])?;
                    let right = evaluate_expr(doc, &operands[1])?;
                    Ok(Bson::Boolean(expr_eq(&left, &right)))
                }
                ("$ifNull", Bson::Array(operands)) if operands.len() == 2 => {
                    match evaluate_expr(doc, &operands[0])? {
                        Bson::Null => evaluate_expr(doc, &operands[1]),
                        value => Ok(value),
                    }
                }
                (other, _) => Err(unsupported(format!("expression {}", other))),
            }
        }
        literal => Ok(literal.clone()),
    }
}

fn expr_eq(a: &Bson, b: &Bson) -> bool {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Compares two values in the store's canonical type order:
/// null < numbers < strings < booleans < dates.
pub(crate) fn compare(a: &Bson, b: &Bson) -> Ordering {
    let (ra, rb) = (type_rank(a), type_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_), _) => {
            let (x, y) = (numeric(a).unwrap_or(0.0), numeric(b).unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Null => 0,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 1,
        Bson::String(_) => 2,
        Bson::Boolean(_) => 3,
        Bson::DateTime(_) => 4,
        _ => 5,
    }
}

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn unsupported(what: String) -> StoreError {
    StoreError::Query {
        message: format!("memory backend does not support {}", what),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_equality_and_null() {
        let d = doc! { "name": "Smith", "score": 10i64 };
        assert!(matches(&d, &doc! { "name": { "$eq": "Smith" } }).unwrap());
        assert!(matches(&d, &doc! { "score": { "$eq": 10.0 } }).unwrap());
        assert!(matches(&d, &doc! { "missing": { "$eq": Bson::Null } }).unwrap());
        assert!(!matches(&d, &doc! { "name": { "$eq": Bson::Null } }).unwrap());
        assert!(matches(&d, &doc! { "name": { "$ne": Bson::Null } }).unwrap());
    }

    #[test]
    fn test_ordering_ignores_nulls_and_type_mismatch() {
        let d = doc! { "score": 10i64 };
        assert!(matches(&d, &doc! { "score": { "$gt": 5i32 } }).unwrap());
        assert!(!matches(&d, &doc! { "score": { "$gt": "5" } }).unwrap());
        assert!(!matches(&d, &doc! { "missing": { "$gt": 5i32 } }).unwrap());
        assert!(matches(&d, &doc! { "score": { "$gte": 10i64 } }).unwrap());
        assert!(!matches(&d, &doc! { "score": { "$lt": 10i64 } }).unwrap());
    }

    #[test]
    fn test_combinators() {
        let d = doc! { "a": 1i32, "b": 2i32 };
        let predicate = doc! {
            "$and": [
                { "a": { "$eq": 1 } },
                { "$or": [ { "b": { "$eq": 3 } }, { "b": { "$gt": 1 } } ] },
            ]
        };
        assert!(matches(&d, &predicate).unwrap());
    }

    #[test]
    fn test_regex_case_insensitive() {
        let d = doc! { "email": "Ada@Example.IO" };
        let predicate = doc! { "email": { "$regex": "\\.io$", "$options": "i" } };
        assert!(matches(&d, &predicate).unwrap());
        let predicate = doc! { "email": { "$regex": "^ada", "$options": "i" } };
        assert!(matches(&d, &predicate).unwrap());
    }

    #[test]
    fn test_in_and_nin() {
        let d = doc! { "region": "emea" };
        assert!(matches(&d, &doc! { "region": { "$in": ["emea", "apac"] } }).unwrap());
        assert!(!matches(&d, &doc! { "region": { "$nin": ["emea"] } }).unwrap());
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let d = doc! { "a": 1 };
        assert!(matches(&d, &doc! { "a": { "$near": 1 } }).is_err());
    }

    #[test]
    fn test_sort_stage_orders_documents() {
        let documents = vec![
            doc! { "n": "Zimmerman" },
            doc! { "n": "Anderson" },
            doc! { "n": "Brown" },
        ];
        let sorted = apply_stages(documents, &[doc! { "$sort": { "n": 1 } }]).unwrap();
        let names: Vec<_> = sorted.iter().map(|d| d.get_str("n").unwrap()).collect();
        assert_eq!(names, vec!["Anderson", "Brown", "Zimmerman"]);
    }

    #[test]
    fn test_add_fields_null_key_expression() {
        let expr = bson::bson!({
            "$cond": {
                "if": { "$eq": [ { "$ifNull": [ "$v", Bson::Null ] }, Bson::Null ] },
                "then": 1,
                "else": 0,
            }
        });
        let stages = vec![doc! { "$addFields": { "__nulls_0": expr } }];
        let documents = vec![doc! { "v": "x" }, doc! {}, doc! { "v": Bson::Null }];
        let out = apply_stages(documents, &stages).unwrap();
        assert_eq!(out[0].get_i32("__nulls_0").unwrap(), 0);
        assert_eq!(out[1].get_i32("__nulls_0").unwrap(), 1);
        assert_eq!(out[2].get_i32("__nulls_0").unwrap(), 1);
    }

    #[test]
    fn test_project_removes_keys() {
        let documents = vec![doc! { "a": 1, "__nulls_0": 0 }];
        let out = apply_stages(documents, &[doc! { "$project": { "__nulls_0": 0 } }]).unwrap();
        assert!(!out[0].contains_key("__nulls_0"));
        assert!(out[0].contains_key("a"));
    }

    #[test]
    fn test_limit_stage() {
        let documents = vec![doc! { "a": 1 }, doc! { "a": 2 }, doc! { "a": 3 }];
        let out = apply_stages(documents, &[doc! { "$limit": 2i64 }]).unwrap();
        assert_eq!(out.len(), 2);
    }
}
