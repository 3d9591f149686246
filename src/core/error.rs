//! Typed error handling
//!
//! Malformed filter input is not an error: it produces a
//! [`QueryOutcome::InvalidRange`](crate::core::outcome::QueryOutcome). The
//! types here cover infrastructure failures and startup problems only.
//!
//! # Error Categories
//!
//! - [`StorageError`]: the record store failed, was unreachable or timed out
//! - [`QueryError`]: what a query call surfaces to the boundary layer
//! - [`ConfigError`]: configuration could not be loaded or is inconsistent
//!
//! # Example
//!
//! ```rust,ignore
//! match service.query(&options).await {
//!     Ok(QueryOutcome::Page(page)) => { /* 200 */ }
//!     Ok(QueryOutcome::InvalidRange(invalid)) => { /* 400 */ }
//!     Err(QueryError::Storage(StorageError::Timeout { .. })) => { /* 503 */ }
//!     Err(e) => { /* 500 */ }
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Hint returned with store failures
pub const STORAGE_SUGGESTION: &str =
    "Try reducing the number of filters or selecting a smaller date range";

/// Hint returned with unexpected failures
pub const INTERNAL_SUGGESTION: &str =
    "Please try again or contact support if the issue persists";

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// What the client can do about it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Failures of the record store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store unreachable
    #[error("Failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// Store rejected or failed the operation
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// Operation exceeded its deadline
    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A stored document could not be turned into a record
    #[error("Failed to decode stored record: {message}")]
    Decode { message: String },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Connection { .. } => "STORAGE_UNAVAILABLE",
            StorageError::Query { .. } => "STORAGE_QUERY_FAILED",
            StorageError::Timeout { .. } => "STORAGE_TIMEOUT",
            StorageError::Decode { .. } => "STORAGE_DECODE_FAILED",
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StorageError::Decode { .. })
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors surfaced by a query call
#[derive(Debug, Error)]
pub enum QueryError {
    /// The store failed; maps to a service-unavailable response
    #[error("Database query failed. Please try again or simplify your filters.")]
    Storage(#[from] StorageError),

    /// Anything else (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::Storage(e) => e.status_code(),
            QueryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Storage(e) => e.error_code(),
            QueryError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Internal details stay in the logs; the body carries a generic message.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            QueryError::Storage(e) => ErrorResponse {
                code: self.error_code().to_string(),
                message: self.to_string(),
                suggestion: Some(STORAGE_SUGGESTION.to_string()),
                details: Some(serde_json::json!({
                    "cause": e.to_string(),
                    "retryable": e.is_retryable(),
                })),
            },
            QueryError::Internal(_) => ErrorResponse {
                code: self.error_code().to_string(),
                message: "Internal server error".to_string(),
                suggestion: Some(INTERNAL_SUGGESTION.to_string()),
                details: None,
            },
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config or seed file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a config or seed file
    #[error("Failed to parse '{path}': {message}")]
    Parse { path: String, message: String },

    /// A value is present but unusable
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A required value is missing
    #[error("Missing required config field: {field}")]
    MissingField { field: String },

    /// The configured backend was not compiled in
    #[error("Storage backend '{backend}' is not enabled in this build")]
    BackendUnavailable { backend: String },
}
