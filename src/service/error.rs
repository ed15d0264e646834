use crate::lookup::LookupError;
use crate::session::{EXPORT_FAILED_MESSAGE, LOOKUP_FAILED_MESSAGE, NOT_FOUND_MESSAGE};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use certforge_render_lopdf::ExportFailure;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Please enter a certificate ID")]
    EmptyIdentifier,

    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound(String),

    #[error("{}", LOOKUP_FAILED_MESSAGE)]
    LookupFailed(String),

    #[error("{}", EXPORT_FAILED_MESSAGE)]
    ExportFailed(#[from] ExportFailure),

    #[error("Service overloaded, please try again later")]
    Overloaded,

    #[error("Request timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LookupError> for ServiceError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::EmptyIdentifier => Self::EmptyIdentifier,
            LookupError::Failed(message) => Self::LookupFailed(message),
            LookupError::InvalidSeed(message) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::EmptyIdentifier => (StatusCode::BAD_REQUEST, "EmptyIdentifier", self.to_string()),
            Self::NotFound(ref id) => {
                log::debug!("No certificate {}", id);
                (StatusCode::NOT_FOUND, "NotFound", self.to_string())
            }
            Self::LookupFailed(ref detail) => {
                log::warn!("Lookup failed: {}", detail);
                (StatusCode::BAD_GATEWAY, "LookupFailed", self.to_string())
            }
            Self::ExportFailed(ref e) => {
                log::error!("Export failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ExportFailed",
                    self.to_string(),
                )
            }
            Self::Overloaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ServiceOverloaded",
                self.to_string(),
            ),
            Self::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Timeout", self.to_string()),
            Self::Internal(_) => {
                log::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
