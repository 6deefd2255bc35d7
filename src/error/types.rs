use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    InvalidFile { message: String },

    #[error("No file was uploaded")]
    MissingFile,

    #[error("File too large: limit is {limit}MB")]
    FileTooLarge { limit: usize },

    #[error("Error extracting text from PDF: {message}")]
    ExtractionError { message: String },

    #[error("An error occurred: {message}")]
    UpstreamError { message: String },

    #[error("An error occurred: completion service request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("Error creating PDF: {message}")]
    GenerationError { message: String },

    #[error("Error creating PDF: {message}")]
    FilesystemError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Stable identifier used in server-side logs only.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::InvalidFile { .. } => "INVALID_FILE",
            AppError::MissingFile => "MISSING_FILE",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::ExtractionError { .. } => "EXTRACTION_ERROR",
            AppError::UpstreamError { .. } => "UPSTREAM_ERROR",
            AppError::UpstreamTransport(_) => "UPSTREAM_TRANSPORT",
            AppError::GenerationError { .. } => "GENERATION_ERROR",
            AppError::FilesystemError { .. } => "FILESYSTEM_ERROR",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidFile { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ExtractionError { .. } => StatusCode::BAD_REQUEST,
            AppError::UpstreamError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamTransport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GenerationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::FilesystemError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        // Logged inside the request span, which carries the request id. Full
        // detail stays server-side; the client only sees the message.
        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                timestamp = %timestamp,
                error = ?self,
                "Request failed"
            );
        } else {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                timestamp = %timestamp,
                error_message = %message,
                "Request rejected"
            );
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FilesystemError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError {
            message: format!("JSON parsing error: {}", err),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Background task failed: {}", err),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }

    pub fn invalid_file(message: impl Into<String>) -> Self {
        AppError::InvalidFile {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        AppError::ExtractionError {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::UpstreamError {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        AppError::GenerationError {
            message: message.into(),
        }
    }

    pub fn filesystem(message: impl Into<String>) -> Self {
        AppError::FilesystemError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
