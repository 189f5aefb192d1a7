//! The customer record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_query::{
    Entity, EntityConfig, FilterConvert, FilterNode, SortConvert, SortDirection, SortField,
    SortSpec,
};

use crate::input::{RangeFilter, StringFilter};

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sales region, when assigned.
    #[serde(default)]
    pub region: Option<String>,
    /// Primary contact email.
    pub email: String,
    /// Service tier, when assigned.
    #[serde(default)]
    pub tier: Option<String>,
    /// Account creation time.
    pub created_at: bson::DateTime,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

/// Filter input for customer searches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerFilter {
    /// Constraints on the display name.
    pub name: Option<StringFilter>,
    /// Constraints on the sales region.
    pub region: Option<StringFilter>,
    /// Constraints on the contact email.
    pub email: Option<StringFilter>,
    /// Constraints on the service tier.
    pub tier: Option<StringFilter>,
    /// Constraints on the creation time.
    pub created_at: Option<RangeFilter<DateTime<Utc>>>,
    /// Sub-filters that must all hold.
    pub and: Vec<CustomerFilter>,
    /// Sub-filters of which at least one must hold.
    pub or: Vec<CustomerFilter>,
}

impl FilterConvert for CustomerFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut children = Vec::new();
        if let Some(f) = &self.name {
            f.leaves("name", &mut children);
        }
        if let Some(f) = &self.region {
            f.leaves("region", &mut children);
        }
        if let Some(f) = &self.email {
            f.leaves("email", &mut children);
        }
        if let Some(f) = &self.tier {
            f.leaves("tier", &mut children);
        }
        if let Some(f) = &self.created_at {
            f.leaves("createdAt", &mut children);
        }
        children.extend(self.and.iter().filter_map(FilterConvert::to_node));
        if let Some(any) = FilterNode::any(self.or.iter().filter_map(FilterConvert::to_node)) {
            children.push(any);
        }
        FilterNode::all(children)
    }
}

/// Sortable customer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSortField {
    /// Display name.
    Name,
    /// Sales region.
    Region,
    /// Service tier.
    Tier,
    /// Account creation time.
    CreatedAt,
}

impl CustomerSortField {
    fn stored_name(self) -> &'static str {
        match self {
            CustomerSortField::Name => "name",
            CustomerSortField::Region => "region",
            CustomerSortField::Tier => "tier",
            CustomerSortField::CreatedAt => "createdAt",
        }
    }
}

/// One entry of a customer sort.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CustomerSort {
    /// Field to order by.
    pub field: CustomerSortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortConvert for Vec<CustomerSort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.stored_name(), s.direction))
            .collect()
    }
}

impl Entity for Customer {
    const NAME: &'static str = "Customer";
    type Filter = CustomerFilter;
    type Sort = Vec<CustomerSort>;
}

/// Registry configuration for customers.
pub fn config() -> EntityConfig {
    EntityConfig::new(Customer::NAME, "customers")
}
