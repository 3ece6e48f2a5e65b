//! Typed error handling for the code camp API
//!
//! Two layers of errors exist:
//!
//! - [`StorageError`]: raised by a [`PersistenceProvider`](crate::storage::PersistenceProvider)
//!   for any failure of the underlying store (connectivity, constraint
//!   violations, lost rows).
//! - [`ApiError`]: the closed set of outcomes a resource handler can answer
//!   with. Every storage failure collapses into [`ApiError::StoreUnavailable`],
//!   which is reported to clients as a generic `500 Database Failure`.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn get_camp(repo: &Repository, moniker: &str) -> ApiResult<Camp> {
//!     repo.get_camp(moniker)
//!         .await?
//!         .ok_or_else(|| ApiError::NotFound(format!("Couldn't find any camp with this moniker {moniker}")))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use validator::ValidationErrors;

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backend could not be reached or is in an unusable state
    #[error("storage backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },

    /// A unique index rejected the write
    #[error("unique constraint '{constraint}' violated by value '{value}'")]
    UniqueViolation { constraint: String, value: String },

    /// A row references a parent that does not exist (or is still referenced)
    #[error("{entity} {id} violates foreign key to {referenced} {referenced_id}")]
    ForeignKeyViolation {
        entity: String,
        id: i32,
        referenced: String,
        referenced_id: i32,
    },

    /// The row targeted by an update or delete no longer exists
    #[error("{entity} with id {id} was expected to exist but was not found")]
    Concurrency { entity: String, id: i32 },
}

impl StorageError {
    pub fn unavailable(backend: &str, message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// API Errors
// =============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Outcome of a failed resource operation
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Referenced entity is absent
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (moniker already in use)
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid reference, unusable address, or a commit that
    /// affected no rows
    #[error("{0}")]
    BadRequest(String),

    /// Request body failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Any persistence provider failure
    #[error("Database Failure")]
    StoreUnavailable(#[from] StorageError),

    /// Failure outside the data path (configuration reload, broken invariants)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    ///
    /// A moniker conflict is answered with `400`, which is the status the
    /// public contract has always used for "Moniker in use".
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Storage causes are never exposed to clients.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(errors) => {
                let fields: Vec<serde_json::Value> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, errs)| {
                        let messages: Vec<String> = errs
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        serde_json::json!({ "field": field, "messages": messages })
                    })
                    .collect();
                Some(serde_json::json!({ "fields": fields }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::StoreUnavailable(source) => {
                tracing::error!(error = %source, "persistence provider failure");
            }
            ApiError::Internal(message) => {
                tracing::error!(%message, "internal failure");
            }
            _ => {}
        }

        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// A specialized Result type for resource handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("Moniker in use".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_is_hidden_from_clients() {
        let err: ApiError = StorageError::unavailable("in-memory", "lock poisoned").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.to_response();
        assert_eq!(response.code, "STORE_UNAVAILABLE");
        assert_eq!(response.message, "Database Failure");
        assert!(!response.message.contains("lock poisoned"));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::UniqueViolation {
            constraint: "camps.moniker".to_string(),
            value: "ATL2024".to_string(),
        };
        assert!(err.to_string().contains("camps.moniker"));
        assert!(err.to_string().contains("ATL2024"));
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    #[test]
    fn test_validation_details_list_fields() {
        let errors = Probe {
            name: String::new(),
        }
        .validate()
        .unwrap_err();
        let response = ApiError::from(errors).to_response();

        assert_eq!(response.code, "VALIDATION_ERROR");
        let details = response.details.unwrap();
        assert_eq!(details["fields"][0]["field"], "name");
        assert_eq!(details["fields"][0]["messages"][0], "name is required");
    }
}
