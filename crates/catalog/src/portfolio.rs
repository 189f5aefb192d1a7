//! The portfolio record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_query::{
    Entity, EntityConfig, FilterConvert, FilterNode, SortConvert, SortDirection, SortField,
    SortSpec,
};

use crate::input::{RangeFilter, StringFilter};

/// A managed portfolio of holdings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Portfolio name.
    pub name: String,
    /// Identifier of the managing employee, when assigned.
    #[serde(default)]
    pub manager_id: Option<String>,
    /// Reporting currency code.
    pub currency: String,
    /// Current market value in the reporting currency, when priced.
    #[serde(default)]
    pub total_value: Option<f64>,
    /// Inception time.
    pub opened_at: bson::DateTime,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

/// Filter input for portfolio searches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioFilter {
    /// Constraints on the portfolio name.
    pub name: Option<StringFilter>,
    /// Constraints on the managing employee identifier.
    pub manager_id: Option<StringFilter>,
    /// Constraints on the reporting currency code.
    pub currency: Option<StringFilter>,
    /// Constraints on the current market value.
    pub total_value: Option<RangeFilter<f64>>,
    /// Constraints on the inception time.
    pub opened_at: Option<RangeFilter<DateTime<Utc>>>,
    /// Sub-filters that must all hold.
    pub and: Vec<PortfolioFilter>,
    /// Sub-filters of which at least one must hold.
    pub or: Vec<PortfolioFilter>,
}

impl FilterConvert for PortfolioFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut children = Vec::new();
        if let Some(f) = &self.name {
            f.leaves("name", &mut children);
        }
        if let Some(f) = &self.manager_id {
            f.leaves("managerId", &mut children);
        }
        if let Some(f) = &self.currency {
            f.leaves("currency", &mut children);
        }
        if let Some(f) = &self.total_value {
            f.leaves("totalValue", &mut children);
        }
        if let Some(f) = &self.opened_at {
            f.leaves("openedAt", &mut children);
        }
        children.extend(self.and.iter().filter_map(FilterConvert::to_node));
        if let Some(any) = FilterNode::any(self.or.iter().filter_map(FilterConvert::to_node)) {
            children.push(any);
        }
        FilterNode::all(children)
    }
}

/// Sortable portfolio fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortfolioSortField {
    /// Portfolio name.
    Name,
    /// Reporting currency code.
    Currency,
    /// Current market value.
    TotalValue,
    /// Inception time.
    OpenedAt,
}

impl PortfolioSortField {
    fn stored_name(self) -> &'static str {
        match self {
            PortfolioSortField::Name => "name",
            PortfolioSortField::Currency => "currency",
            PortfolioSortField::TotalValue => "totalValue",
            PortfolioSortField::OpenedAt => "openedAt",
        }
    }
}

/// One entry of a portfolio sort.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PortfolioSort {
    /// Field to order by.
    pub field: PortfolioSortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortConvert for Vec<PortfolioSort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.stored_name(), s.direction))
            .collect()
    }
}

impl Entity for Portfolio {
    const NAME: &'static str = "Portfolio";
    type Filter = PortfolioFilter;
    type Sort = Vec<PortfolioSort>;
}

/// Registry configuration for portfolios.
pub fn config() -> EntityConfig {
    EntityConfig::new(Portfolio::NAME, "portfolios")
}
