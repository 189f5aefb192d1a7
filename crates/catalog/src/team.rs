//! The team record type.

use serde::{Deserialize, Serialize};

use meridian_query::{
    Entity, EntityConfig, FilterConvert, FilterNode, SortConvert, SortDirection, SortField,
    SortSpec,
};

use crate::input::{RangeFilter, StringFilter};

/// A team of employees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Team name.
    pub name: String,
    /// Owning department, when assigned.
    #[serde(default)]
    pub department: Option<String>,
    /// Headcount, when known.
    #[serde(default)]
    pub size: Option<i64>,
    /// Identifier of the team lead, when assigned.
    #[serde(default)]
    pub lead_id: Option<String>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

/// Filter input for team searches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamFilter {
    /// Constraints on the team name.
    pub name: Option<StringFilter>,
    /// Constraints on the owning department.
    pub department: Option<StringFilter>,
    /// Constraints on the headcount.
    pub size: Option<RangeFilter<i64>>,
    /// Constraints on the team lead identifier.
    pub lead_id: Option<StringFilter>,
    /// Sub-filters that must all hold.
    pub and: Vec<TeamFilter>,
    /// Sub-filters of which at least one must hold.
    pub or: Vec<TeamFilter>,
}

impl FilterConvert for TeamFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut children = Vec::new();
        if let Some(f) = &self.name {
            f.leaves("name", &mut children);
        }
        if let Some(f) = &self.department {
            f.leaves("department", &mut children);
        }
        if let Some(f) = &self.size {
            f.leaves("size", &mut children);
        }
        if let Some(f) = &self.lead_id {
            f.leaves("leadId", &mut children);
        }
        children.extend(self.and.iter().filter_map(FilterConvert::to_node));
        if let Some(any) = FilterNode::any(self.or.iter().filter_map(FilterConvert::to_node)) {
            children.push(any);
        }
        FilterNode::all(children)
    }
}

/// Sortable team fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamSortField {
    /// Team name.
    Name,
    /// Owning department.
    Department,
    /// Headcount.
    Size,
}

impl TeamSortField {
    fn stored_name(self) -> &'static str {
        match self {
            TeamSortField::Name => "name",
            TeamSortField::Department => "department",
            TeamSortField::Size => "size",
        }
    }
}

/// One entry of a team sort.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TeamSort {
    /// Field to order by.
    pub field: TeamSortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortConvert for Vec<TeamSort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.stored_name(), s.direction))
            .collect()
    }
}

impl Entity for Team {
    const NAME: &'static str = "Team";
    type Filter = TeamFilter;
    type Sort = Vec<TeamSort>;
}

/// Registry configuration for teams.
pub fn config() -> EntityConfig {
    EntityConfig::new(Team::NAME, "teams")
}
