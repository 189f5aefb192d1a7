//! Batch-by-key and single-key lookup.

use std::collections::HashSet;

use bson::{Bson, doc};

use super::QueryService;
use crate::error::{QueryError, QueryResult, StoreError};
use crate::registry::{Entity, ID_FIELD, SortConvert};
use crate::store::DocumentStore;
use crate::{plan, translate, validate};

impl<S: DocumentStore> QueryService<S> {
    /// Fetches exactly the records with the given identifiers.
    ///
    /// Identifiers are validated, capped at
    /// [`validate::MAX_BATCH_KEYS`], and deduplicated. Result order is
    /// whatever the sorter produces (identifier ascending by default).
    /// Identifiers with no live record are silently omitted; a
    /// partially-missing set is not an error. An empty input returns
    /// empty without touching the store.
    pub async fn get_by_keys<E: Entity>(
        &self,
        ids: &[String],
        sort: Option<&E::Sort>,
    ) -> QueryResult<Vec<E>> {
        let config = self.config_for(E::NAME)?;
        validate::validate_batch(ids)?;

        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<Bson> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .map(|id| Bson::String(id.clone()))
            .collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let filter = doc! {
            "$and": [
                { ID_FIELD: { "$in": unique } },
                translate::not_deleted(&config.soft_delete),
            ]
        };
        let sort_spec = sort.map(|s| s.to_spec()).unwrap_or_default();
        let sort_plan = plan::plan(&sort_spec, ID_FIELD, false);

        tracing::debug!(
            entity = E::NAME,
            collection = config.collection,
            keys = seen.len(),
            "executing batch fetch"
        );

        let documents = self
            .store()
            .fetch(config.collection, filter, &sort_plan.stages)
            .await
            .map_err(QueryError::from)?;

        documents
            .into_iter()
            .map(|d| bson::from_document::<E>(d).map_err(|e| StoreError::from(e).into()))
            .collect()
    }

    /// Fetches the record with the given identifier, or `None` when no
    /// live record exists.
    pub async fn get<E: Entity>(&self, id: &str) -> QueryResult<Option<E>> {
        let config = self.config_for(E::NAME)?;
        validate::validate_identifier(id)?;

        let filter = doc! {
            "$and": [
                { ID_FIELD: { "$eq": id } },
                translate::not_deleted(&config.soft_delete),
            ]
        };
        let document = self
            .store()
            .find_one(config.collection, filter)
            .await
            .map_err(QueryError::from)?;
        match document {
            Some(d) => Ok(Some(bson::from_document::<E>(d).map_err(StoreError::from)?)),
            None => Ok(None),
        }
    }

    /// Like [`get`](Self::get), but absence is an error. This is the
    /// only path that produces the `NOT_FOUND` code.
    pub async fn require<E: Entity>(&self, id: &str) -> QueryResult<E> {
        self.get::<E>(id).await?.ok_or_else(|| QueryError::NotFound {
            entity: E::NAME.to_string(),
            id: id.to_string(),
        })
    }
}
