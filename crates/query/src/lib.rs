//! Meridian Query Engine
//!
//! This crate provides cursor-based search over collections of BSON
//! documents. Callers describe an entity's filter and sort surface once,
//! register it, and get stable keyset pagination, consistent totals, and
//! batch lookups against any configured document store.
//!
//! # Features
//!
//! - **Keyset Pagination**: opaque cursors encoding the boundary record's
//!   sort values, with forward (`first`/`after`) and backward
//!   (`last`/`before`) traversal
//! - **Deterministic Ordering**: a record identifier tiebreaker is always
//!   appended, and null values sort last ascending / first descending
//!   regardless of the store's native ordering
//! - **Consistent Totals**: the total count and the page rows come from a
//!   single store command, never two racing reads
//! - **Soft Deletes**: per-entity delete markers scope every search,
//!   count, and lookup
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! meridian-query = { version = "0.1", features = ["mongodb"] }
//! ```
//!
//! Available backend features:
//! - `memory` (default) - process-local store for tests and embedding
//! - `mongodb` - MongoDB via `$facet` aggregations
//!
//! # Architecture
//!
//! - [`types`] - filters, sort specifications, page requests, and cursors
//! - [`registry`] - entity configuration and conversion traits
//! - [`validate`] - input validation and page-window resolution
//! - [`translate`] - filter trees to store predicates
//! - [`plan`] - sort specifications to pipeline stages
//! - [`store`] - the document store abstraction
//! - [`engine`] - the query service tying the layers together
//! - [`backends`] - store implementations (memory, MongoDB)
//! - [`error`] - error types for all operations
//!
//! # Quick Start
//!
//! ```no_run
//! use meridian_query::backends::memory::MemoryStore;
//! use meridian_query::{EntityConfig, EntityRegistry, PageRequest, QueryService};
//!
//! let registry = EntityRegistry::new()
//!     .register(EntityConfig::new("Customer", "customers"));
//! let service = QueryService::new(MemoryStore::new(), registry);
//!
//! // First page of twenty, then follow the end cursor.
//! let page = PageRequest::first(20);
//! let next = PageRequest::first_after(20, "<opaque cursor>");
//! # let _ = (service, page, next);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod engine;
pub mod error;
pub mod plan;
pub mod registry;
pub mod store;
pub mod translate;
pub mod types;
pub mod validate;

mod util;

// Re-export commonly used types at crate root
pub use engine::QueryService;
pub use error::{ErrorCode, InputError, QueryError, QueryResult, StoreError};
pub use registry::{Entity, EntityConfig, EntityRegistry, FilterConvert, SortConvert, ID_FIELD};
pub use store::{DocumentStore, FacetPage, PageQuery};
pub use types::{
    FilterNode, FilterOp, PageCursor, PageRequest, PageResult, PageWindow, SortDirection,
    SortField, SortSpec,
};
pub use validate::{DEFAULT_PAGE_SIZE, MAX_BATCH_KEYS, MAX_PAGE_SIZE};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
