//! The document-store interface the engine executes against.
//!
//! The engine is read-only and issues at most one store call per
//! request. Connection lifecycle, pooling, retry, and timeouts are the
//! backend's (or its driver's) concern; cancellation reaches the
//! backend through ordinary future cancellation, so a caller deadline
//! bounds the single awaited call.

use async_trait::async_trait;
use bson::Document;

use crate::error::StoreError;

/// A windowed, sorted page query executed as one atomic pass.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Predicate applied to both the count and the data branch.
    pub base: Document,
    /// Keyset position predicate, data branch only.
    pub position: Option<Document>,
    /// Sort stages applied to the data branch, in pipeline order.
    pub stages: Vec<Document>,
    /// Maximum documents returned by the data branch. Includes the
    /// engine's over-fetch record.
    pub limit: i64,
}

/// The result of a [`PageQuery`]: total count and page documents
/// derived from the same read pass, so they cannot disagree within a
/// request.
#[derive(Debug, Clone)]
pub struct FacetPage {
    /// Count of documents matching the base predicate, ignoring the
    /// position predicate and the limit.
    pub total: u64,
    /// The windowed documents in stage order.
    pub documents: Vec<Document>,
}

/// Read-only access to collections of BSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// A human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Executes the atomic count+data operation.
    ///
    /// Both branches must be derived from one underlying read pass
    /// (for MongoDB-compatible stores, a `$facet` aggregation).
    async fn search_page(&self, collection: &str, query: PageQuery)
    -> Result<FacetPage, StoreError>;

    /// Fetches every document matching `filter`, ordered by `stages`,
    /// without pagination.
    async fn fetch(
        &self,
        collection: &str,
        filter: Document,
        stages: &[Document],
    ) -> Result<Vec<Document>, StoreError>;

    /// Fetches at most one document matching `filter`.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;
}
