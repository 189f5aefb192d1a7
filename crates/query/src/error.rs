//! Error types for the query engine.
//!
//! Errors are organized into categories that map one-to-one onto the
//! stable wire codes surfaced to callers: invalid input, not found,
//! database error, and internal error. Input errors are always raised
//! before any store call; store errors preserve their underlying cause
//! for diagnostics without exposing it verbatim.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// The primary error type for all query operations.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed caller input, detected before any store call.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The requested record does not exist (single-key lookup only).
    #[error("not found: {entity}/{id}")]
    NotFound { entity: String, id: String },

    /// Store execution or result-decoding failures.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unanticipated failures; treated as a bug signal.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl QueryError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::Input(_) => ErrorCode::InvalidInput,
            QueryError::NotFound { .. } => ErrorCode::NotFound,
            QueryError::Store(_) => ErrorCode::DatabaseError,
            QueryError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Shorthand for an internal error with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        QueryError::Internal {
            message: message.into(),
        }
    }
}

/// Stable error codes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::DatabaseError => write!(f, "DATABASE_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Errors caused by malformed caller input.
///
/// Every variant is fatal to the request and is never retried.
#[derive(Error, Debug)]
pub enum InputError {
    /// The identifier does not match the canonical identifier shape.
    #[error("invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    /// Too many identifiers in a batch request.
    #[error("batch size {requested} exceeds maximum {max}")]
    BatchTooLarge { requested: usize, max: usize },

    /// `first` and `last` cannot both be set on one request.
    #[error("'first' and 'last' are mutually exclusive")]
    ConflictingWindow,

    /// A position cursor combined with the opposite window direction.
    #[error("'{cursor_param}' cannot be combined with '{size_param}'")]
    MismatchedCursor {
        cursor_param: &'static str,
        size_param: &'static str,
    },

    /// A negative page size.
    #[error("'{param}' must be non-negative, got {value}")]
    NegativePageSize { param: &'static str, value: i64 },

    /// A page size above the ceiling.
    #[error("'{param}' is {requested}, which exceeds the maximum page size {max}")]
    PageTooLarge {
        param: &'static str,
        requested: i64,
        max: u32,
    },

    /// A pagination cursor that failed to decode.
    #[error("invalid pagination cursor")]
    InvalidCursor,
}

/// Errors originating from the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query execution failed.
    #[error("query execution failed: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A returned document could not be decoded into the record type.
    #[error("result decoding failed: {message}")]
    Decode { message: String },

    /// The caller's deadline elapsed before the store call completed.
    #[error("store deadline exceeded")]
    DeadlineExceeded,

    /// The store is unreachable or refused the connection.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Wraps an arbitrary execution failure, preserving its cause.
    pub fn query(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Query {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        StoreError::Decode {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;
        match *err.kind {
            ErrorKind::ServerSelection { ref message, .. } => StoreError::Unavailable {
                message: message.clone(),
            },
            _ => StoreError::query(err),
        }
    }
}

/// Result type alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
