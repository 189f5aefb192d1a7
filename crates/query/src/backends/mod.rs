//! Document store implementations.
//!
//! Each backend implements [`DocumentStore`](crate::store::DocumentStore)
//! and is gated behind a feature flag.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | `memory` | Process-local store, great for tests and embedding |
//! | MongoDB | `mongodb` | Document database with aggregation pipelines |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "memory")]
//! use meridian_query::backends::memory::MemoryStore;
//!
//! # #[cfg(feature = "memory")]
//! # fn example() {
//! let store = MemoryStore::new();
//! store.insert("customers", bson::doc! { "_id": "c-1", "name": "Acme" });
//! # }
//! ```

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "mongodb")]
pub mod mongodb;
