//! Error types for the cache and content server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache core and the content server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A required argument was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Storage for an entry, buffer or index could not be reserved
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Filesystem failure while loading or saving content
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::collections::TryReserveError> for CacheError {
    fn from(err: std::collections::TryReserveError) -> Self {
        CacheError::Allocation(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::Allocation(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_reserve_error_maps_to_allocation() {
        let mut buf: Vec<u8> = Vec::new();
        let err = buf.try_reserve_exact(usize::MAX).unwrap_err();
        assert!(matches!(CacheError::from(err), CacheError::Allocation(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CacheError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::Allocation("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CacheError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
