use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::agent_client::AgentError;
use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Messages are returned to the caller verbatim, agent failures included. This is an
/// internal tool; do not expose it publicly without masking `Agent` and `Internal`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Only PDF files are supported")]
    InvalidFileType,

    #[error("Failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("Could not extract text from PDF. The file might be empty or corrupted.")]
    EmptyContent,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Agent(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Parse(msg) => AppError::Extraction(msg),
            ExtractionError::EmptyContent => AppError::EmptyContent,
        }
    }
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        AppError::Agent(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
        } else {
            AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidFileType
            | AppError::Extraction(_)
            | AppError::EmptyContent
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Agent(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidFileType => "INVALID_FILE_TYPE",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::EmptyContent => "EMPTY_CONTENT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Agent(_) => "AGENT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            AppError::Agent(msg) => tracing::error!("Agent error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => tracing::warn!("Rejected request: {message}"),
        }

        // `detail` is what existing clients read; `error` is the structured envelope.
        let body = Json(json!({
            "detail": message,
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
