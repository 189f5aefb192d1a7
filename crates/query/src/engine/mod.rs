//! The query service: search, batch-by-key, and single-key lookup
//! over any [`DocumentStore`] backend.
//!
//! The service is stateless per request — its only shared state is the
//! immutable registry — so arbitrarily many requests may run
//! concurrently without internal locking. Each request issues at most
//! one awaited store call.

mod batch;
mod position;
mod search;

use crate::error::{QueryError, QueryResult};
use crate::registry::{EntityConfig, EntityRegistry};
use crate::store::DocumentStore;

/// Typed, filterable, sortable, cursor-paginated read access to the
/// registered entities.
#[derive(Debug, Clone)]
pub struct QueryService<S> {
    store: S,
    registry: EntityRegistry,
}

impl<S: DocumentStore> QueryService<S> {
    /// Creates a service over `store` for the entities in `registry`.
    pub fn new(store: S, registry: EntityRegistry) -> Self {
        Self { store, registry }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The entity registry.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub(crate) fn config_for(&self, entity: &str) -> QueryResult<&EntityConfig> {
        self.registry
            .config(entity)
            .ok_or_else(|| QueryError::internal(format!("entity not registered: {}", entity)))
    }
}
