//! Cursor-paginated search.
//!
//! One atomic count+data pass per request: the store computes the
//! total matching count (filter only) and fetches `limit + 1` sorted,
//! position-filtered documents in the same operation, so the two
//! cannot disagree within a request. The extra record is the
//! over-fetch that detects whether another page exists without a
//! second query; it is trimmed before the page is returned.

use super::{QueryService, position};
use crate::error::{QueryError, QueryResult, StoreError};
use crate::registry::{Entity, FilterConvert, ID_FIELD, SortConvert};
use crate::store::{DocumentStore, PageQuery};
use crate::types::{PageCursor, PageRequest, PageResult};
use crate::{plan, translate, validate};

impl<S: DocumentStore> QueryService<S> {
    /// Searches `E` with an optional filter and sorter over the given
    /// page window.
    ///
    /// `total_count` always reflects the full filtered population,
    /// independent of the window. Count and page come from one store
    /// pass, so they agree within a request; across requests under
    /// concurrent writes, pages may overlap or miss records and totals
    /// may drift — the store offers no snapshot spanning requests.
    pub async fn search<E: Entity>(
        &self,
        filter: Option<&E::Filter>,
        sort: Option<&E::Sort>,
        page: &PageRequest,
    ) -> QueryResult<PageResult<E>> {
        let config = self.config_for(E::NAME)?;
        let window = validate::validate_window(page)?;
        let backward = window.is_backward();
        let limit = window.limit() as usize;

        // Decode before touching the store; a bad cursor never
        // executes a query.
        let cursor = window.cursor().map(PageCursor::decode).transpose()?;

        let node = filter.and_then(|f| f.to_node());
        let base = translate::base_predicate(&config.soft_delete, node.as_ref());
        let sort_spec = sort.map(|s| s.to_spec()).unwrap_or_default();
        let sort_plan = plan::plan(&sort_spec, ID_FIELD, backward);

        let position = cursor
            .as_ref()
            .map(|c| position::build(c, &sort_plan.fields, ID_FIELD, backward))
            .transpose()?;

        tracing::debug!(
            entity = E::NAME,
            collection = config.collection,
            limit,
            backward,
            positioned = cursor.is_some(),
            "executing paginated search"
        );

        let facet = self
            .store()
            .search_page(
                config.collection,
                PageQuery {
                    base,
                    position,
                    stages: sort_plan.stages.clone(),
                    limit: limit as i64 + 1,
                },
            )
            .await
            .map_err(QueryError::from)?;

        let mut documents = facet.documents;
        let over_fetched = documents.len() > limit;
        if over_fetched {
            documents.truncate(limit);
        }
        // Backward windows executed under the reversed sort; restore
        // the caller-facing order.
        if backward {
            documents.reverse();
        }

        let positioned = cursor.is_some();
        let (has_next_page, has_previous_page) = if backward {
            (positioned, over_fetched)
        } else {
            (over_fetched, positioned)
        };

        let start_cursor = boundary_cursor(documents.first(), &sort_plan.fields)?;
        let end_cursor = boundary_cursor(documents.last(), &sort_plan.fields)?;

        let items = documents
            .into_iter()
            .map(|d| bson::from_document::<E>(d).map_err(StoreError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResult {
            items,
            total_count: facet.total,
            has_next_page,
            has_previous_page,
            start_cursor,
            end_cursor,
        })
    }
}

fn boundary_cursor(
    doc: Option<&bson::Document>,
    fields: &[crate::types::SortField],
) -> QueryResult<Option<String>> {
    match doc {
        Some(doc) => {
            let cursor = PageCursor::from_document(doc, fields, ID_FIELD)
                .map_err(|_| QueryError::internal("page record is missing its identifier"))?;
            Ok(Some(cursor.encode()))
        }
        None => Ok(None),
    }
}
