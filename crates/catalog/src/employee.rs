//! The employee record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_query::{
    Entity, EntityConfig, FilterConvert, FilterNode, SortConvert, SortDirection, SortField,
    SortSpec,
};

use crate::input::{RangeFilter, StringFilter};

/// An employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name, when recorded.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Work email.
    pub email: String,
    /// Department, when assigned.
    #[serde(default)]
    pub department: Option<String>,
    /// Hire date, when recorded.
    #[serde(default)]
    pub hired_at: Option<bson::DateTime>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

/// Filter input for employee searches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeFilter {
    /// Constraints on the given name.
    pub first_name: Option<StringFilter>,
    /// Constraints on the family name.
    pub last_name: Option<StringFilter>,
    /// Constraints on the work email.
    pub email: Option<StringFilter>,
    /// Constraints on the department.
    pub department: Option<StringFilter>,
    /// Constraints on the hire date.
    pub hired_at: Option<RangeFilter<DateTime<Utc>>>,
    /// Sub-filters that must all hold.
    pub and: Vec<EmployeeFilter>,
    /// Sub-filters of which at least one must hold.
    pub or: Vec<EmployeeFilter>,
}

impl FilterConvert for EmployeeFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut children = Vec::new();
        if let Some(f) = &self.first_name {
            f.leaves("firstName", &mut children);
        }
        if let Some(f) = &self.last_name {
            f.leaves("lastName", &mut children);
        }
        if let Some(f) = &self.email {
            f.leaves("email", &mut children);
        }
        if let Some(f) = &self.department {
            f.leaves("department", &mut children);
        }
        if let Some(f) = &self.hired_at {
            f.leaves("hiredAt", &mut children);
        }
        children.extend(self.and.iter().filter_map(FilterConvert::to_node));
        if let Some(any) = FilterNode::any(self.or.iter().filter_map(FilterConvert::to_node)) {
            children.push(any);
        }
        FilterNode::all(children)
    }
}

/// Sortable employee fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeSortField {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Work email.
    Email,
    /// Department.
    Department,
    /// Hire date.
    HiredAt,
}

impl EmployeeSortField {
    fn stored_name(self) -> &'static str {
        match self {
            EmployeeSortField::FirstName => "firstName",
            EmployeeSortField::LastName => "lastName",
            EmployeeSortField::Email => "email",
            EmployeeSortField::Department => "department",
            EmployeeSortField::HiredAt => "hiredAt",
        }
    }
}

/// One entry of an employee sort.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EmployeeSort {
    /// Field to order by.
    pub field: EmployeeSortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortConvert for Vec<EmployeeSort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.stored_name(), s.direction))
            .collect()
    }
}

impl Entity for Employee {
    const NAME: &'static str = "Employee";
    type Filter = EmployeeFilter;
    type Sort = Vec<EmployeeSort>;
}

/// Registry configuration for employees.
pub fn config() -> EntityConfig {
    EntityConfig::new(Employee::NAME, "employees")
}
