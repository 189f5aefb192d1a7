//! Sort planning: [`SortSpec`] into store-native sort stages.
//!
//! The store's native sort places nulls first regardless of direction.
//! The planner instead enforces SQL-standard placement — ascending
//! puts null/missing values last, descending puts them first — by
//! pairing each sort field with a computed is-null key that sorts
//! before the field itself and is projected away afterwards. An
//! explicit boolean key, not a sentinel value, so no legitimate field
//! value can collide with it.

use bson::{Bson, Document, doc};

use crate::types::{SortDirection, SortField, SortSpec};

/// A planned sort: the ordered active fields plus the pipeline stages
/// realizing them.
#[derive(Debug, Clone)]
pub struct SortPlan {
    /// Active sort fields in order, identifier tiebreaker included.
    pub fields: Vec<SortField>,
    /// `$addFields` / `$sort` / `$project` stages, in pipeline order.
    pub stages: Vec<Document>,
}

/// Plans the sort stages for a spec.
///
/// The identifier tiebreaker is appended when absent, so the produced
/// order is always total. With `reverse` set, every direction is
/// flipped (used to execute backward windows); `fields` still reports
/// the caller-facing directions.
pub fn plan(spec: &SortSpec, id_field: &str, reverse: bool) -> SortPlan {
    let spec = spec.clone().with_tiebreaker(id_field);
    let fields = spec.fields().to_vec();

    let mut null_keys = Document::new();
    let mut sort_doc = Document::new();
    let mut projection = Document::new();

    for (index, field) in fields.iter().enumerate() {
        let direction = effective_direction(field.direction, reverse);
        if field.field != id_field {
            let key = format!("__nulls_{}", index);
            null_keys.insert(&key, is_null_expr(&field.field));
            // The is-null key sorts in the field's own direction:
            // ascending puts 0 (present) before 1 (null), descending
            // the reverse.
            sort_doc.insert(&key, direction_value(direction));
            projection.insert(&key, 0);
        }
        sort_doc.insert(&field.field, direction_value(direction));
    }

    let mut stages = Vec::new();
    if !null_keys.is_empty() {
        stages.push(doc! { "$addFields": null_keys });
    }
    stages.push(doc! { "$sort": sort_doc });
    if !projection.is_empty() {
        stages.push(doc! { "$project": projection });
    }

    SortPlan { fields, stages }
}

/// The direction a field is actually traversed in, accounting for
/// backward windows executing under the reversed sort.
pub fn effective_direction(direction: SortDirection, reverse: bool) -> SortDirection {
    if reverse { direction.reversed() } else { direction }
}

fn direction_value(direction: SortDirection) -> i32 {
    match direction {
        SortDirection::Asc => 1,
        SortDirection::Desc => -1,
    }
}

// 1 when the field is null or missing, else 0.
fn is_null_expr(field: &str) -> Bson {
    bson::bson!({
        "$cond": {
            "if": { "$eq": [ { "$ifNull": [ format!("${}", field), Bson::Null ] }, Bson::Null ] },
            "then": 1,
            "else": 0,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ID_FIELD;

    #[test]
    fn test_empty_spec_plans_identifier_ascending() {
        let plan = plan(&SortSpec::new(), ID_FIELD, false);
        assert_eq!(plan.fields, vec![SortField::asc(ID_FIELD)]);
        assert_eq!(plan.stages, vec![doc! { "$sort": { ID_FIELD: 1 } }]);
    }

    #[test]
    fn test_ascending_field_emits_null_key_stages() {
        let spec = SortSpec::new().with(SortField::asc("last_name"));
        let plan = plan(&spec, ID_FIELD, false);

        assert_eq!(plan.stages.len(), 3);
        let add_fields = plan.stages[0].get_document("$addFields").unwrap();
        assert!(add_fields.contains_key("__nulls_0"));

        let sort = plan.stages[1].get_document("$sort").unwrap();
        let keys: Vec<_> = sort.keys().collect();
        assert_eq!(keys, vec!["__nulls_0", "last_name", ID_FIELD]);
        assert_eq!(sort.get_i32("__nulls_0").unwrap(), 1);
        assert_eq!(sort.get_i32("last_name").unwrap(), 1);

        let projection = plan.stages[2].get_document("$project").unwrap();
        assert_eq!(projection.get_i32("__nulls_0").unwrap(), 0);
    }

    #[test]
    fn test_descending_flips_null_key_too() {
        let spec = SortSpec::new().with(SortField::desc("hired_at"));
        let plan = plan(&spec, ID_FIELD, false);
        let sort = plan.stages[1].get_document("$sort").unwrap();
        // Nulls first: 1 sorts before 0 under descending.
        assert_eq!(sort.get_i32("__nulls_0").unwrap(), -1);
        assert_eq!(sort.get_i32("hired_at").unwrap(), -1);
        assert_eq!(sort.get_i32(ID_FIELD).unwrap(), 1);
    }

    #[test]
    fn test_reverse_flips_every_direction() {
        let spec = SortSpec::new().with(SortField::asc("last_name"));
        let plan = plan(&spec, ID_FIELD, true);
        let sort = plan.stages[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("__nulls_0").unwrap(), -1);
        assert_eq!(sort.get_i32("last_name").unwrap(), -1);
        assert_eq!(sort.get_i32(ID_FIELD).unwrap(), -1);
        // Reported fields keep the caller-facing directions.
        assert_eq!(plan.fields[0].direction, SortDirection::Asc);
    }

    #[test]
    fn test_identifier_gets_no_null_key() {
        let plan = plan(&SortSpec::new(), ID_FIELD, false);
        assert_eq!(plan.stages.len(), 1, "no $addFields/$project for id-only sort");
    }
}
