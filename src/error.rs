//! Error types for the docquery service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors produced by the service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error (bad address, missing API key, unreadable file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file could not be parsed
    #[error("Failed to parse '{filename}': {reason}")]
    FileParse { filename: String, reason: String },

    /// A file parsed but yielded no extractable text
    #[error("No text content could be extracted from '{0}'")]
    EmptyDocument(String),

    /// Embedding API failure
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// LLM API failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Ask was called before any successful upload in this session
    #[error("No documents have been processed. Please upload one or more PDFs first.")]
    NoDocumentsIndexed,

    /// Malformed client request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoDocumentsIndexed | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::FileParse { .. } | Self::EmptyDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Embedding(_) | Self::Llm(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::NoDocumentsIndexed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Embedding("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Internal("oops".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_no_documents_message() {
        let msg = Error::NoDocumentsIndexed.to_string();
        assert!(msg.contains("No documents have been processed"));
    }
}
