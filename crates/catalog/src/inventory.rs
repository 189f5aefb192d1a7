//! The inventory record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_query::{
    Entity, EntityConfig, FilterConvert, FilterNode, SortConvert, SortDirection, SortField,
    SortSpec,
};

use crate::input::{RangeFilter, StringFilter};

/// A stock position for one item in one warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    /// Unique identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Warehouse code, when the item is assigned to one.
    #[serde(default)]
    pub warehouse: Option<String>,
    /// Units on hand.
    pub quantity: i64,
    /// Cost per unit, when known.
    #[serde(default)]
    pub unit_cost: Option<f64>,
    /// Time of the last stock movement.
    pub updated_at: bson::DateTime,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

/// Filter input for inventory searches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryFilter {
    /// Constraints on the SKU code.
    pub sku: Option<StringFilter>,
    /// Constraints on the warehouse code.
    pub warehouse: Option<StringFilter>,
    /// Constraints on the units on hand.
    pub quantity: Option<RangeFilter<i64>>,
    /// Constraints on the cost per unit.
    pub unit_cost: Option<RangeFilter<f64>>,
    /// Constraints on the last movement time.
    pub updated_at: Option<RangeFilter<DateTime<Utc>>>,
    /// Sub-filters that must all hold.
    pub and: Vec<InventoryFilter>,
    /// Sub-filters of which at least one must hold.
    pub or: Vec<InventoryFilter>,
}

impl FilterConvert for InventoryFilter {
    fn to_node(&self) -> Option<FilterNode> {
        let mut children = Vec::new();
        if let Some(f) = &self.sku {
            f.leaves("sku", &mut children);
        }
        if let Some(f) = &self.warehouse {
            f.leaves("warehouse", &mut children);
        }
        if let Some(f) = &self.quantity {
            f.leaves("quantity", &mut children);
        }
        if let Some(f) = &self.unit_cost {
            f.leaves("unitCost", &mut children);
        }
        if let Some(f) = &self.updated_at {
            f.leaves("updatedAt", &mut children);
        }
        children.extend(self.and.iter().filter_map(FilterConvert::to_node));
        if let Some(any) = FilterNode::any(self.or.iter().filter_map(FilterConvert::to_node)) {
            children.push(any);
        }
        FilterNode::all(children)
    }
}

/// Sortable inventory fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventorySortField {
    /// SKU code.
    Sku,
    /// Warehouse code.
    Warehouse,
    /// Units on hand.
    Quantity,
    /// Time of the last stock movement.
    UpdatedAt,
}

impl InventorySortField {
    fn stored_name(self) -> &'static str {
        match self {
            InventorySortField::Sku => "sku",
            InventorySortField::Warehouse => "warehouse",
            InventorySortField::Quantity => "quantity",
            InventorySortField::UpdatedAt => "updatedAt",
        }
    }
}

/// One entry of an inventory sort.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InventorySort {
    /// Field to order by.
    pub field: InventorySortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl SortConvert for Vec<InventorySort> {
    fn to_spec(&self) -> SortSpec {
        self.iter()
            .map(|s| SortField::new(s.field.stored_name(), s.direction))
            .collect()
    }
}

impl Entity for Inventory {
    const NAME: &'static str = "Inventory";
    type Filter = InventoryFilter;
    type Sort = Vec<InventorySort>;
}

/// Registry configuration for inventories.
pub fn config() -> EntityConfig {
    EntityConfig::new(Inventory::NAME, "inventories")
}
