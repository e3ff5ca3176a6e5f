use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;
use crate::rate_limit::RateLimitError;
use crate::response::{ApiResponse, timestamp};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(_) | ApiError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

// Body returned for rate limiter rejections
#[derive(Serialize, Debug)]
pub struct RateLimitBody {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let status = match self {
            RateLimitError::Banned { .. } | RateLimitError::Exceeded { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            }
            RateLimitError::Internal(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let error = match self {
            RateLimitError::Internal(_) => "Service Unavailable",
            _ => "Rate Limit Exceeded",
        };

        let body = RateLimitBody {
            error: error.to_string(),
            message: self.to_string(),
            timestamp: timestamp(),
        };

        (status, Json(body)).into_response()
    }
}
