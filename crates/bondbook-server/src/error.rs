//! API and startup error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use bondbook_core::FieldErrors;
use bondbook_engine::ServiceError;
use bondbook_traits::error::{ResolveError, TraitError};

use crate::config::ConfigError;

/// Message returned when no identity header is present.
pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field validation failed; rendered as a field-keyed map.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The request body could not be read.
    #[error("{0}")]
    BadRequest(String),

    /// No authenticated identity on the request.
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    /// The body is neither JSON nor a form.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// The legal-name lookup failed.
    #[error("{0}")]
    BadGateway(String),

    /// The legal-name lookup timed out.
    #[error("{0}")]
    GatewayTimeout(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

/// Error body for non-field errors.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Human-readable reason.
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorDetail {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ref e @ ServiceError::Resolver { .. } if e.is_timeout() => {
                ApiError::GatewayTimeout(e.to_string())
            }
            e @ ServiceError::Resolver { .. } => ApiError::BadGateway(e.to_string()),
            e @ (ServiceError::Storage(_) | ServiceError::Configuration(_)) => {
                error!(error = %e, "request failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error raised while assembling or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage or reference data could not be loaded
    #[error(transparent)]
    Storage(#[from] TraitError),

    /// Resolver could not be created
    #[error("resolver setup failed: {0}")]
    Resolver(#[from] ResolveError),

    /// Service wiring failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
