//! Input guards shared by the search, batch, and single-key paths.
//!
//! All rules here fail fast, before any store call.

use uuid::Uuid;

use crate::error::InputError;
use crate::types::{PageRequest, PageWindow};

/// Page size used when a window carries no explicit size.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Ceiling for `first`/`last`.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Ceiling for the number of identifiers in a batch fetch.
pub const MAX_BATCH_KEYS: usize = 100;

/// Checks an identifier against the canonical identifier shape (UUID).
pub fn validate_identifier(value: &str) -> Result<(), InputError> {
    Uuid::parse_str(value).map_err(|_| InputError::InvalidIdentifier {
        value: value.to_string(),
    })?;
    Ok(())
}

/// Checks a batch identifier list: size ceiling first, then each
/// identifier's shape.
pub fn validate_batch(ids: &[String]) -> Result<(), InputError> {
    if ids.len() > MAX_BATCH_KEYS {
        return Err(InputError::BatchTooLarge {
            requested: ids.len(),
            max: MAX_BATCH_KEYS,
        });
    }
    for id in ids {
        validate_identifier(id)?;
    }
    Ok(())
}

/// Validates a raw page request into a [`PageWindow`].
///
/// Rules, in order:
/// - `first` and `last` must not both be set
/// - `after` only combines with forward requests, `before` only with
///   backward ones
/// - sizes must be non-negative and at most [`MAX_PAGE_SIZE`]
///
/// A request with neither size set is a forward window of
/// [`DEFAULT_PAGE_SIZE`].
pub fn validate_window(request: &PageRequest) -> Result<PageWindow, InputError> {
    if request.first.is_some() && request.last.is_some() {
        return Err(InputError::ConflictingWindow);
    }
    if request.last.is_some() && request.after.is_some() {
        return Err(InputError::MismatchedCursor {
            cursor_param: "after",
            size_param: "last",
        });
    }
    if request.first.is_some() && request.before.is_some() {
        return Err(InputError::MismatchedCursor {
            cursor_param: "before",
            size_param: "first",
        });
    }

    if let Some(last) = request.last {
        let limit = validate_size("last", last)?;
        return Ok(PageWindow::Backward {
            limit,
            before: request.before.clone(),
        });
    }

    // `before` without `last` is a backward window of default size.
    if let Some(before) = &request.before {
        return Ok(PageWindow::Backward {
            limit: DEFAULT_PAGE_SIZE,
            before: Some(before.clone()),
        });
    }

    let limit = match request.first {
        Some(first) => validate_size("first", first)?,
        None => DEFAULT_PAGE_SIZE,
    };
    Ok(PageWindow::Forward {
        limit,
        after: request.after.clone(),
    })
}

fn validate_size(param: &'static str, value: i64) -> Result<u32, InputError> {
    if value < 0 {
        return Err(InputError::NegativePageSize { param, value });
    }
    if value > i64::from(MAX_PAGE_SIZE) {
        return Err(InputError::PageTooLarge {
            param,
            requested: value,
            max: MAX_PAGE_SIZE,
        });
    }
    Ok(value as u32)
}
