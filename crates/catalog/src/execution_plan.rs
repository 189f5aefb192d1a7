//! The execution plan record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_query::{
    Entity, EntityConfig, FilterConvert, FilterNode, SortConvert, SortDirection, SortField,
    SortSpec,
};

use crate::input::{RangeFilter, StringFilter};

/// A scheduled unit of operational work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Plan name.
    pub name: String,
    /// Lifecycle status, when set.
    #[serde(default)]
    pub status: Option<String>,
    /// Execution priority; higher runs first.
    #[serde(default)]
    pub priority: Option<i64>,
    /// Scheduled start time, when planned.
    #[serde(default)]
    pub scheduled_for: Option<bson::DateTime>,
    /// Identifier of the owning employee, when assigned.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

/// Filter input for execution plan searches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionPlanFilter {
    /// Constraints on the plan name.
    pub name: Option<StringFilter>,
    /// Constraints on the lifecycle status.
    pub status: Option<StringFilter>,
    /// Constraints on the execution priority.
    pub priority: Option<RangeFilter<i64>>,
    /// Constraints on the scheduled start time.
    pub scheduled_for: Option<RangeFilter<DateTime<Utc>>>,
    /// Constraints on the owning employee identifier.
    pub owner_id: Option<StringFilter>,
    /// Sub-filters that must all hold.
    pub and: Vec<ExecutionPlanFilter>,
    /// Sub-filters of which at least one must hold.
    pub or: Vec<ExecutionPlanFilter>,
}

impl FilterConvert for ExecutionPlanFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut children = Vec::new();
        if let Some(f) = &self.name {
            f.leaves("name", &mut children);
        }
        if let Some(f) = &self.status {
            f.leaves("status", &mut children);
        }
        if let Some(f) = &self.priority {
            f.leaves("priority", &mut children);
        }
        if let Some(f) = &self.scheduled_for {
            f.leaves("scheduledFor", &mut children);
        }
        if let Some(f) = &self.owner_id {
            f.leaves("ownerId", &mut children);
        }
        children.extend(self.and.iter().filter_map(FilterConvert::to_node));
        if let Some(any) = FilterNode::any(self.or.iter().filter_map(FilterConvert::to_node)) {
            children.push(any);
        }
        FilterNode::all(children)
    }
}

/// Sortable execution plan fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionPlanSortField {
    /// Plan name.
    Name,
    /// Lifecycle status.
    Status,
    /// Execution priority.
    Priority,
    /// Scheduled start time.
    ScheduledFor,
}

impl ExecutionPlanSortField {
    fn stored_name(self) -> &'static str {
        match self {
            ExecutionPlanSortField::Name => "name",
            ExecutionPlanSortField::Status => "status",
            ExecutionPlanSortField::Priority => "priority",
            ExecutionPlanSortField::ScheduledFor => "scheduledFor",
        }
    }
}

/// One entry of an execution plan sort.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ExecutionPlanSort {
    /// Field to order by.
    pub field: ExecutionPlanSortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortConvert for Vec<ExecutionPlanSort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.stored_name(), s.direction))
            .collect()
    }
}

impl Entity for ExecutionPlan {
    const NAME: &'static str = "ExecutionPlan";
    type Filter = ExecutionPlanFilter;
    type Sort = Vec<ExecutionPlanSort>;
}

/// Registry configuration for execution plans.
pub fn config() -> EntityConfig {
    EntityConfig::new(ExecutionPlan::NAME, "execution_plans")
}
