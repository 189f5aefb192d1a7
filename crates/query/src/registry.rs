//! Entity configuration and the entity registry.
//!
//! Per-entity behavior is plain data plus two converter traits, not
//! runtime type inspection: an [`EntityConfig`] names the collection
//! and the soft-delete shape, and an entity's typed filter and sorter
//! inputs implement [`FilterConvert`] / [`SortConvert`] to produce the
//! uniform [`FilterNode`] / [`SortSpec`] types the engine consumes.
//! The registry is built once at process start and shared read-only by
//! all concurrent requests.

use std::collections::HashMap;

use bson::Bson;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{FilterNode, SortSpec};

/// The document field that carries a record's identifier.
pub const ID_FIELD: &str = "_id";

/// How an entity marks records as logically deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftDelete {
    /// Path of the field holding the deletion marker.
    pub field: String,
    /// The value that marks a record as deleted. Records where the
    /// field is absent or holds any other value are live.
    pub sentinel: Bson,
}

/// Static configuration for one entity.
///
/// Constructed once at startup and read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityConfig {
    /// The entity name the registry is keyed by.
    pub name: &'static str,
    /// The store collection holding this entity's records.
    pub collection: &'static str,
    /// Soft-delete marker shape.
    pub soft_delete: SoftDelete,
}

impl EntityConfig {
    /// Creates a config with the standard soft-delete shape
    /// (`deleted == true`).
    pub fn new(name: &'static str, collection: &'static str) -> Self {
        Self {
            name,
            collection,
            soft_delete: SoftDelete {
                field: "deleted".to_string(),
                sentinel: Bson::Boolean(true),
            },
        }
    }

    /// Overrides the soft-delete field and sentinel.
    pub fn with_soft_delete(mut self, field: impl Into<String>, sentinel: impl Into<Bson>) -> Self {
        self.soft_delete = SoftDelete {
            field: field.into(),
            sentinel: sentinel.into(),
        };
        self
    }
}

/// Converts an entity-specific filter input into the uniform filter
/// tree.
///
/// Returning `None` means "no constraints": the request matches every
/// live record. Implementations must omit leaves whose input value is
/// absent instead of producing a never-matching predicate.
pub trait FilterConvert {
    /// Produces the filter tree, or `None` when the input carries no
    /// constraints.
    fn to_node(&self) -> Option<FilterNode>;
}

/// Converts an entity-specific sorter input into a [`SortSpec`].
///
/// An empty spec resolves to the identifier-ascending default sort.
pub trait SortConvert {
    /// Produces the ordered sort specification.
    fn to_spec(&self) -> SortSpec;
}

/// A record type served by the query engine.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The registry key for this entity.
    const NAME: &'static str;

    /// The typed filter input for this entity.
    type Filter: FilterConvert + Send + Sync;

    /// The typed sorter input for this entity.
    type Sort: SortConvert + Send + Sync;
}

/// Immutable map from entity name to [`EntityConfig`].
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    configs: HashMap<&'static str, EntityConfig>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a config under its entity name, replacing any
    /// previous entry.
    pub fn register(mut self, config: EntityConfig) -> Self {
        self.configs.insert(config.name, config);
        self
    }

    /// Looks up the config for an entity name.
    pub fn config(&self, name: &str) -> Option<&EntityConfig> {
        self.configs.get(name)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true when no entity is registered.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
