//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use orbit_models::ModelError;
use orbit_store::StoreError;

use crate::config::is_production_environment;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every 401 response; the cause is never exposed.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized Access!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Unauthorized(reason) => {
                debug!("Rejected request: {}", reason);
                UNAUTHORIZED_MESSAGE.to_string()
            }
            ApiError::Internal(_) | ApiError::Store(_) => {
                error!("Request failed: {}", self);
                // Don't expose internal error details in production
                if std::env::var("ENVIRONMENT").is_ok_and(|v| is_production_environment(&v)) {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            ApiError::BadRequest(msg) => msg.clone(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
