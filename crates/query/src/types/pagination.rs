//! Pagination types: the page window, the opaque cursor, and the
//! assembled page result.
//!
//! Cursors are keyset cursors: they bind the sort-field values and the
//! identifier of one boundary record, so a search can resume strictly
//! after (or before) that record without re-scanning from the start.
//! They are stateless and have no expiry.
//!
//! # Cursor encoding
//!
//! A cursor is a BSON document `{v, s, id}` — format version, sort-key
//! values, boundary identifier — serialized to bytes and base64url
//! encoded without padding. BSON rather than JSON keeps the scalar
//! types of the sort values intact, which matters because decoded
//! values flow straight back into store comparisons. Clients must
//! treat the string as opaque: encoding is permissive, decoding fails
//! closed on anything malformed.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::types::sort::SortField;
use crate::util::lookup;

/// The raw, not-yet-validated page window of a search request.
///
/// `first`/`after` select a forward window, `last`/`before` a backward
/// one; the two shapes are mutually exclusive. Validation happens in
/// [`crate::validate::validate_window`], before any store call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Number of records from the start of the (cursor-positioned) set.
    pub first: Option<i64>,
    /// Resume strictly after this cursor (forward pagination).
    pub after: Option<String>,
    /// Number of records from the end of the (cursor-positioned) set.
    pub last: Option<i64>,
    /// Resume strictly before this cursor (backward pagination).
    pub before: Option<String>,
}

impl PageRequest {
    /// A forward window of `first` records.
    pub fn first(count: i64) -> Self {
        Self {
            first: Some(count),
            ..Default::default()
        }
    }

    /// A forward window of `first` records after `cursor`.
    pub fn first_after(count: i64, cursor: impl Into<String>) -> Self {
        Self {
            first: Some(count),
            after: Some(cursor.into()),
            ..Default::default()
        }
    }

    /// A backward window of `last` records.
    pub fn last(count: i64) -> Self {
        Self {
            last: Some(count),
            ..Default::default()
        }
    }

    /// A backward window of `last` records before `cursor`.
    pub fn last_before(count: i64, cursor: impl Into<String>) -> Self {
        Self {
            last: Some(count),
            before: Some(cursor.into()),
            ..Default::default()
        }
    }
}

/// A validated page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageWindow {
    /// Paginate forward: `limit` records strictly after `after`.
    Forward {
        /// Effective page size.
        limit: u32,
        /// Encoded position cursor, when resuming.
        after: Option<String>,
    },
    /// Paginate backward: `limit` records strictly before `before`.
    Backward {
        /// Effective page size.
        limit: u32,
        /// Encoded position cursor, when resuming.
        before: Option<String>,
    },
}

impl PageWindow {
    /// The effective page size of the window.
    pub fn limit(&self) -> u32 {
        match self {
            PageWindow::Forward { limit, .. } | PageWindow::Backward { limit, .. } => *limit,
        }
    }

    /// The encoded position cursor, if one was supplied.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            PageWindow::Forward { after, .. } => after.as_deref(),
            PageWindow::Backward { before, .. } => before.as_deref(),
        }
    }

    /// Returns true for backward windows.
    pub fn is_backward(&self) -> bool {
        matches!(self, PageWindow::Backward { .. })
    }
}

/// A keyset cursor binding one boundary record's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Cursor format version.
    #[serde(rename = "v")]
    version: i32,

    /// The values of the active sort fields at the boundary record,
    /// in sort order, identifier excluded.
    #[serde(rename = "s")]
    sort_values: Vec<Bson>,

    /// The boundary record's identifier (mandatory tiebreaker).
    #[serde(rename = "id")]
    id: String,
}

const CURSOR_VERSION: i32 = 1;

impl PageCursor {
    /// Creates a cursor from explicit sort values and identifier.
    pub fn new(sort_values: Vec<Bson>, id: impl Into<String>) -> Self {
        Self {
            version: CURSOR_VERSION,
            sort_values,
            id: id.into(),
        }
    }

    /// Builds the cursor for a boundary record.
    ///
    /// Extracts the record's value for every active sort field except
    /// the identifier field, which is carried separately. A missing
    /// field extracts as null, consistent with how it sorts.
    pub fn from_document(
        doc: &Document,
        sort_fields: &[SortField],
        id_field: &str,
    ) -> Result<Self, InputError> {
        let id = match lookup(doc, id_field) {
            Some(Bson::String(id)) if !id.is_empty() => id.clone(),
            _ => return Err(InputError::InvalidCursor),
        };
        let sort_values = sort_fields
            .iter()
            .filter(|f| f.field != id_field)
            .map(|f| lookup(doc, &f.field).cloned().unwrap_or(Bson::Null))
            .collect();
        Ok(Self::new(sort_values, id))
    }

    /// The bound sort-field values.
    pub fn sort_values(&self) -> &[Bson] {
        &self.sort_values
    }

    /// The bound identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Encodes the cursor to its opaque wire form.
    pub fn encode(&self) -> String {
        let bytes = bson::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(&bytes)
    }

    /// Decodes a cursor from its opaque wire form.
    ///
    /// Fails closed: invalid base64, a malformed payload, an
    /// unsupported version, and a missing or empty identifier are all
    /// rejected. This is the engine's only boundary with untrusted
    /// input.
    pub fn decode(s: &str) -> Result<Self, InputError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| InputError::InvalidCursor)?;
        let cursor: PageCursor =
            bson::from_slice(&bytes).map_err(|_| InputError::InvalidCursor)?;
        if cursor.version != CURSOR_VERSION || cursor.id.is_empty() {
            return Err(InputError::InvalidCursor);
        }
        Ok(cursor)
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    /// The records in this page, in sort order.
    pub items: Vec<T>,

    /// Total count of records matching the filter, independent of the
    /// requested window and position cursor.
    pub total_count: u64,

    /// Whether records exist strictly after this page in sort order.
    pub has_next_page: bool,

    /// Whether records exist strictly before this page in sort order.
    pub has_previous_page: bool,

    /// Cursor at the first returned record; `None` for an empty page.
    pub start_cursor: Option<String>,

    /// Cursor at the last returned record; `None` for an empty page.
    pub end_cursor: Option<String>,
}

impl<T> PageResult<T> {
    /// An empty page with the given total.
    pub fn empty(total_count: u64, has_previous_page: bool) -> Self {
        Self {
            items: Vec::new(),
            total_count,
            has_next_page: false,
            has_previous_page,
            start_cursor: None,
            end_cursor: None,
        }
    }

    /// Number of records in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
