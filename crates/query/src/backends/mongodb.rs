//! MongoDB document store.
//!
//! Runs page searches as a single `$facet` aggregation so the total
//! count and the page rows come from one consistent read of the
//! collection.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::Database;

use crate::error::StoreError;
use crate::store::{DocumentStore, FacetPage, PageQuery};

/// Document store backed by a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Wraps an existing database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    async fn run_pipeline(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .database
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn search_page(
        &self,
        collection: &str,
        query: PageQuery,
    ) -> Result<FacetPage, StoreError> {
        let mut page_stages = Vec::with_capacity(query.stages.len() + 2);
        if let Some(position) = query.position {
            page_stages.push(doc! { "$match": position });
        }
        page_stages.extend(query.stages);
        page_stages.push(doc! { "$limit": query.limit });

        let pipeline = vec![
            doc! { "$match": query.base },
            doc! {
                "$facet": {
                    "total": [ { "$count": "count" } ],
                    "page": page_stages,
                }
            },
        ];

        let mut results = self.run_pipeline(collection, pipeline).await?;
        let facet = results.pop().ok_or_else(|| StoreError::Decode {
            message: "facet aggregation returned no document".to_string(),
        })?;

        let total = match facet.get_array("total") {
            Ok(counts) => match counts.first() {
                Some(Bson::Document(count)) => count
                    .get_i32("count")
                    .map(|n| n as u64)
                    .or_else(|_| count.get_i64("count").map(|n| n as u64))
                    .map_err(|_| StoreError::Decode {
                        message: "facet count has unexpected shape".to_string(),
                    })?,
                // An empty count facet means nothing matched the scope.
                _ => 0,
            },
            Err(_) => {
                return Err(StoreError::Decode {
                    message: "facet aggregation is missing the total branch".to_string(),
                })
            }
        };

        let documents = facet
            .get_array("page")
            .map_err(|_| StoreError::Decode {
                message: "facet aggregation is missing the page branch".to_string(),
            })?
            .iter()
            .map(|item| match item {
                Bson::Document(d) => Ok(d.clone()),
                other => Err(StoreError::Decode {
                    message: format!("facet page row is not a document: {}", other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FacetPage { total, documents })
    }

    async fn fetch(
        &self,
        collection: &str,
        filter: Document,
        stages: &[Document],
    ) -> Result<Vec<Document>, StoreError> {
        let mut pipeline = Vec::with_capacity(stages.len() + 1);
        pipeline.push(doc! { "$match": filter });
        pipeline.extend_from_slice(stages);
        self.run_pipeline(collection, pipeline).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .database
            .collection::<Document>(collection)
            .find_one(filter)
            .await?)
    }
}
