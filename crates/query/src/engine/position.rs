//! Keyset position filters.
//!
//! Resuming a multi-key sort at a cursor is expressed as a disjunction
//! of prefix-equality-then-strict-inequality clauses: for sort fields
//! `f1..fn` with cursor values `v1..vn`, a record comes strictly after
//! the cursor when `f1 > v1`, or `f1 = v1 AND f2 > v2`, … , or all
//! fields are equal and the identifier breaks the tie. Comparisons
//! flip for backward windows.
//!
//! Null sort values need structural care because the store's
//! comparison operators do not place nulls the way the sort plan does.
//! With the traversal direction pointing toward the null block
//! (effective ascending: nulls last), "strictly after a value" is
//! `> v OR is-null`, and nothing at that field comes after a null;
//! pointing away from the null block, "strictly after null" is simply
//! `is-not-null`, and "strictly after a value" is `< v`.

use bson::{Bson, Document, doc};

use crate::error::InputError;
use crate::plan::effective_direction;
use crate::types::{PageCursor, SortDirection, SortField};

/// Builds the position predicate for `cursor` under the given active
/// sort fields.
///
/// `fields` is the planned field list, identifier tiebreaker included;
/// the cursor must carry exactly one value per non-identifier field,
/// otherwise it was minted under a different sort and is rejected.
pub fn build(
    cursor: &PageCursor,
    fields: &[SortField],
    id_field: &str,
    backward: bool,
) -> Result<Document, InputError> {
    let keyed: Vec<&SortField> = fields.iter().filter(|f| f.field != id_field).collect();
    if cursor.sort_values().len() != keyed.len() {
        return Err(InputError::InvalidCursor);
    }
    let id_direction = fields
        .iter()
        .find(|f| f.field == id_field)
        .map(|f| f.direction)
        .unwrap_or(SortDirection::Asc);

    let mut disjuncts: Vec<Document> = Vec::with_capacity(keyed.len() + 1);
    for depth in 0..=keyed.len() {
        let mut clauses: Vec<Document> = Vec::with_capacity(depth + 1);
        for (field, value) in keyed.iter().zip(cursor.sort_values()).take(depth) {
            clauses.push(doc! { &field.field: { "$eq": value.clone() } });
        }

        let strict = if depth < keyed.len() {
            let field = keyed[depth];
            let value = &cursor.sort_values()[depth];
            let direction = effective_direction(field.direction, backward);
            match strict_after(&field.field, value, direction) {
                Some(clause) => clause,
                // Nothing comes after a null at this field; deeper
                // tiebreak levels still apply.
                None => continue,
            }
        } else {
            let direction = effective_direction(id_direction, backward);
            let op = comparison_op(direction);
            doc! { id_field: { op: cursor.id() } }
        };
        clauses.push(strict);

        disjuncts.push(match clauses.len() {
            1 => clauses.remove(0),
            _ => doc! { "$and": clauses },
        });
    }

    Ok(match disjuncts.len() {
        1 => disjuncts.remove(0),
        _ => doc! { "$or": disjuncts },
    })
}

// "Strictly after `value` at this field", in traversal order. `None`
// when unsatisfiable.
fn strict_after(field: &str, value: &Bson, direction: SortDirection) -> Option<Document> {
    match direction {
        // Nulls sit at the end of the traversal.
        SortDirection::Asc => match value {
            Bson::Null => None,
            v => Some(doc! {
                "$or": [
                    { field: { "$gt": v.clone() } },
                    { field: Bson::Null },
                ]
            }),
        },
        // Nulls sit at the start of the traversal.
        SortDirection::Desc => match value {
            Bson::Null => Some(doc! { field: { "$ne": Bson::Null } }),
            v => Some(doc! { field: { "$lt": v.clone() } }),
        },
    }
}

fn comparison_op(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "$gt",
        SortDirection::Desc => "$lt",
    }
}
