//! # API Error Types
//!
//! Service-layer and HTTP-layer errors. Cache failures never show up here;
//! the cache layer swallows them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use catalog_cache::RepositoryError;
use catalog_domain::DomainError;

/// Errors returned by the entity services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    NotFound(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// HTTP-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown {resource}: '{name}'")]
    UnknownResource { resource: &'static str, name: String },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownResource { .. } | Self::Service(ServiceError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Service(ServiceError::Repository(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownResource { .. } | Self::Service(ServiceError::NotFound(_)) => "NOT_FOUND",
            Self::Service(ServiceError::Repository(_)) => "REPOSITORY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": self.error_code(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
