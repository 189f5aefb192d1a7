//! In-memory document store.
//!
//! Collections are plain vectors of BSON documents behind a
//! read-write lock. The backend evaluates the same predicate and
//! pipeline documents the query engine would send to a real server,
//! so behavior observed here carries over to the MongoDB backend
//! unchanged. Intended for tests and embedded use.

mod eval;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::Document;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::store::{DocumentStore, FacetPage, PageQuery};

/// Document store backed by process memory.
///
/// Cloning is cheap; clones share the same underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document to a collection, creating it if needed.
    pub fn insert(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Appends a batch of documents to a collection.
    pub fn insert_many<I>(&self, collection: &str, documents: I)
    where
        I: IntoIterator<Item = Document>,
    {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Number of documents in a collection, including soft-deleted ones.
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Removes all documents from all collections.
    pub fn clear(&self) {
        self.collections.write().clear();
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn search_page(
        &self,
        collection: &str,
        query: PageQuery,
    ) -> Result<FacetPage, StoreError> {
        let mut scoped = Vec::new();
        for doc in self.snapshot(collection) {
            if eval::matches(&doc, &query.base)? {
                scoped.push(doc);
            }
        }
        // The count and the page come from the same snapshot, matching
        // the single-command $facet contract of the server backend.
        let total = scoped.len() as u64;

        let mut page = scoped;
        if let Some(position) = &query.position {
            let mut kept = Vec::with_capacity(page.len());
            for doc in page {
                if eval::matches(&doc, position)? {
                    kept.push(doc);
                }
            }
            page = kept;
        }
        let mut documents = eval::apply_stages(page, &query.stages)?;
        documents.truncate(query.limit as usize);

        Ok(FacetPage { total, documents })
    }

    async fn fetch(
        &self,
        collection: &str,
        filter: Document,
        stages: &[Document],
    ) -> Result<Vec<Document>, StoreError> {
        let mut matched = Vec::new();
        for doc in self.snapshot(collection) {
            if eval::matches(&doc, &filter)? {
                matched.push(doc);
            }
        }
        eval::apply_stages(matched, stages)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        for doc in self.snapshot(collection) {
            if eval::matches(&doc, &filter)? {
                return Ok(Some(doc));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn store_with_people() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_many(
            "people",
            vec![
                doc! { "_id": "a", "name": "Anderson", "deleted": false },
                doc! { "_id": "b", "name": "Brown" },
                doc! { "_id": "z", "name": "Zimmerman", "deleted": true },
            ],
        );
        store
    }

    #[tokio::test]
    async fn test_search_page_counts_and_pages_from_same_scope() {
        let store = store_with_people();
        let query = PageQuery {
            base: doc! { "deleted": { "$ne": true } },
            position: None,
            stages: vec![doc! { "$sort": { "name": 1, "_id": 1 } }],
            limit: 10,
        };
        let page = store.search_page("people", query).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.documents.len(), 2);
        assert_eq!(page.documents[0].get_str("name").unwrap(), "Anderson");
    }

    #[tokio::test]
    async fn test_search_page_total_ignores_position_filter() {
        let store = store_with_people();
        let query = PageQuery {
            base: doc! { "deleted": { "$ne": true } },
            position: Some(doc! { "name": { "$gt": "Anderson" } }),
            stages: vec![doc! { "$sort": { "name": 1, "_id": 1 } }],
            limit: 10,
        };
        let page = store.search_page("people", query).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.documents[0].get_str("name").unwrap(), "Brown");
    }

    #[tokio::test]
    async fn test_search_page_applies_limit() {
        let store = store_with_people();
        let query = PageQuery {
            base: doc! {},
            position: None,
            stages: vec![doc! { "$sort": { "name": 1, "_id": 1 } }],
            limit: 1,
        };
        let page = store.search_page("people", query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_find_one_returns_first_match() {
        let store = store_with_people();
        let found = store
            .find_one("people", doc! { "_id": { "$eq": "b" } })
            .await
            .unwrap();
        assert_eq!(found.unwrap().get_str("name").unwrap(), "Brown");

        let missing = store
            .find_one("people", doc! { "_id": { "$eq": "nope" } })
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_fetch_with_sort_stage() {
        let store = store_with_people();
        let rows = store
            .fetch(
                "people",
                doc! { "_id": { "$in": ["z", "a"] } },
                &[doc! { "$sort": { "name": 1, "_id": 1 } }],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_str("name").unwrap(), "Anderson");
    }

    #[test]
    fn test_clones_share_collections() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.insert("things", doc! { "_id": "1" });
        assert_eq!(store.collection_len("things"), 1);
        store.clear();
        assert_eq!(clone.collection_len("things"), 0);
    }
}
