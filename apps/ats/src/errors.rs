use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai_client::AiError;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Payment required. Please add credits.";
pub const MALFORMED_AI_RESPONSE_MESSAGE: &str = "Invalid AI response format";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("AI rate limit exceeded")]
    RateLimited,

    #[error("AI payment required")]
    PaymentRequired,

    #[error("AI error: {0}")]
    Ai(String),

    #[error("Malformed AI response: {0}")]
    MalformedAiResponse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps an upstream AI failure. Rate-limit and payment errors keep their own
    /// status codes; anything else becomes `failure`.
    pub fn from_ai(err: AiError, failure: &str) -> Self {
        match err {
            AiError::RateLimited => AppError::RateLimited,
            AiError::PaymentRequired => AppError::PaymentRequired,
            AiError::MissingToolCall => {
                AppError::MalformedAiResponse("response carried no tool call".to_string())
            }
            AiError::Parse(e) => AppError::MalformedAiResponse(e.to_string()),
            other => {
                tracing::error!(error = %other, "AI request failed");
                AppError::Ai(failure.to_string())
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            AppError::Ai(_)
            | AppError::MalformedAiResponse(_)
            | AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Ai(msg) => msg.clone(),
            AppError::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            AppError::PaymentRequired => PAYMENT_REQUIRED_MESSAGE.to_string(),
            AppError::MalformedAiResponse(detail) => {
                tracing::error!("Malformed AI response: {detail}");
                MALFORMED_AI_RESPONSE_MESSAGE.to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "Failed to upload file".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}
