//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror. Every failure leaves the
//! service through the same `{ success, data, error }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::cache::CacheError;
use crate::images::ImageError;
use crate::models::ApiResponse;
use crate::store::StoreError;

// == App Error Enum ==
/// Unified error type for the catalog service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Point lookup of an id absent from the backing store
    #[error("{0}")]
    NotFound(String),

    /// Request payload failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cache client failure
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Image host failure
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl AppError {
    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::InvalidReference(_)) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Image(ImageError::InvalidDataUri(_)) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Unavailable(_))
            | AppError::Cache(_)
            | AppError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged once here and never leak detail
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, AppError>;
