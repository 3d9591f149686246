//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Store failures map to 503 and internal failures to 500
//! - Error responses carry a code, a message and a suggestion
//! - Internal details never reach the response body

use axum::http::StatusCode;
use axum::response::IntoResponse;
use sales_explorer::core::error::{INTERNAL_SUGGESTION, STORAGE_SUGGESTION};
use sales_explorer::prelude::*;
use std::time::Duration;

fn timeout() -> StorageError {
    StorageError::Timeout {
        operation: "find",
        after: Duration::from_millis(5000),
    }
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_every_storage_failure_returns_503() {
        let errors = vec![
            StorageError::Connection {
                backend: "mongodb".to_string(),
                message: "refused".to_string(),
            },
            StorageError::Query {
                backend: "mongodb".to_string(),
                message: "bad operator".to_string(),
            },
            timeout(),
            StorageError::Decode {
                message: "age: invalid type".to_string(),
            },
        ];

        for err in errors {
            assert_eq!(
                QueryError::from(err).status_code(),
                StatusCode::SERVICE_UNAVAILABLE
            );
        }
    }

    #[test]
    fn test_internal_error_returns_500() {
        let err = QueryError::Internal("join failed".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_uses_status_code() {
        let response = QueryError::from(timeout()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = QueryError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_storage_error_codes() {
        assert_eq!(
            StorageError::Connection {
                backend: "mongodb".to_string(),
                message: "x".to_string()
            }
            .error_code(),
            "STORAGE_UNAVAILABLE"
        );
        assert_eq!(timeout().error_code(), "STORAGE_TIMEOUT");
        assert_eq!(
            StorageError::Decode {
                message: "x".to_string()
            }
            .error_code(),
            "STORAGE_DECODE_FAILED"
        );
    }

    #[test]
    fn test_query_error_forwards_storage_code() {
        assert_eq!(QueryError::from(timeout()).error_code(), "STORAGE_TIMEOUT");
        assert_eq!(
            QueryError::Internal("x".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_only_decode_failures_are_not_retryable() {
        assert!(timeout().is_retryable());
        assert!(
            !StorageError::Decode {
                message: "x".to_string()
            }
            .is_retryable()
        );
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_storage_response_has_suggestion_and_cause() {
        let response = QueryError::from(timeout()).to_response();

        assert_eq!(response.code, "STORAGE_TIMEOUT");
        assert_eq!(
            response.message,
            "Database query failed. Please try again or simplify your filters."
        );
        assert_eq!(response.suggestion.as_deref(), Some(STORAGE_SUGGESTION));

        let details = response.details.unwrap();
        assert_eq!(details["cause"], "find timed out after 5000ms");
        assert_eq!(details["retryable"], true);
    }

    #[test]
    fn test_internal_response_hides_details() {
        let response = QueryError::Internal("secret connection string".to_string()).to_response();

        assert_eq!(response.message, "Internal server error");
        assert_eq!(response.suggestion.as_deref(), Some(INTERNAL_SUGGESTION));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_response_serializes_without_empty_fields() {
        let response = QueryError::Internal("x".to_string()).to_response();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(json.get("details").is_none());
    }
}

// =============================================================================
// Config Error Tests
// =============================================================================

mod config_error_tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_yaml_file("/nonexistent/sales.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/sales.yaml"));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = AppConfig::from_yaml_str("server: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_seed_file_is_io_error() {
        let err = InMemorySalesStore::from_json_file("/nonexistent/sales.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
