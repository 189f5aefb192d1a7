//! Meridian Record Catalog
//!
//! The record types served by the Meridian query backend, each with a
//! typed filter and sort surface that converts into the engine's
//! uniform filter tree and sort specification. The engine itself is
//! entity-agnostic; everything entity-specific lives here.
//!
//! # Record Types
//!
//! Customers, employees, teams, inventories, execution plans, and
//! portfolios. Each module defines the record struct, its filter and
//! sort inputs, the conversion impls, and a `config()` for the
//! registry.
//!
//! # Quick Start
//!
//! ```no_run
//! use meridian_catalog::{Employee, standard_registry};
//! use meridian_query::backends::memory::MemoryStore;
//! use meridian_query::{PageRequest, QueryService};
//!
//! # async fn example() -> Result<(), meridian_query::QueryError> {
//! let service = QueryService::new(MemoryStore::new(), standard_registry());
//! let page = service
//!     .search::<Employee>(None, None, &PageRequest::first(20))
//!     .await?;
//! println!("{} of {} employees", page.len(), page.total_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod customer;
pub mod employee;
pub mod execution_plan;
pub mod input;
pub mod inventory;
pub mod portfolio;
pub mod team;

pub use customer::{Customer, CustomerFilter, CustomerSort, CustomerSortField};
pub use employee::{Employee, EmployeeFilter, EmployeeSort, EmployeeSortField};
pub use execution_plan::{
    ExecutionPlan, ExecutionPlanFilter, ExecutionPlanSort, ExecutionPlanSortField,
};
pub use input::{RangeFilter, StringFilter};
pub use inventory::{Inventory, InventoryFilter, InventorySort, InventorySortField};
pub use portfolio::{Portfolio, PortfolioFilter, PortfolioSort, PortfolioSortField};
pub use team::{Team, TeamFilter, TeamSort, TeamSortField};

use meridian_query::EntityRegistry;

/// The registry holding every record type this catalog defines.
///
/// Built once at process start and shared read-only by all requests.
pub fn standard_registry() -> EntityRegistry {
    EntityRegistry::new()
        .register(customer::config())
        .register(employee::config())
        .register(team::config())
        .register(inventory::config())
        .register(execution_plan::config())
        .register(portfolio::config())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_holds_all_record_types() {
        let registry = standard_registry();
        assert_eq!(registry.len(), 6);
        for name in [
            "Customer",
            "Employee",
            "Team",
            "Inventory",
            "ExecutionPlan",
            "Portfolio",
        ] {
            assert!(registry.config(name).is_some(), "missing config for {name}");
        }
    }

    #[test]
    fn test_collections_are_distinct() {
        let registry = standard_registry();
        let mut collections: Vec<_> = ["Customer", "Employee", "Team", "Inventory", "ExecutionPlan", "Portfolio"]
            .iter()
            .map(|name| registry.config(name).unwrap().collection)
            .collect();
        collections.sort_unstable();
        collections.dedup();
        assert_eq!(collections.len(), 6);
    }
}
