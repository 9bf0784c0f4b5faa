//! Request and response types for the HTTP API

use serde::{Deserialize, Serialize};

use super::chat::ChatMessage;

/// Request body for POST /rag-bot/ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,

    /// Client-echoed history, accepted for wire compatibility with older
    /// clients. The server-held session history is authoritative and this
    /// field is ignored.
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

/// Response body for POST /rag-bot/ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer text
    pub answer: String,
}

/// A per-file error from an upload batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadError {
    /// Filename as uploaded
    pub filename: String,
    /// What went wrong with this file
    pub error: String,
}

/// Response body for POST /rag-bot/process-pdf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Human-readable outcome summary
    pub message: String,
    /// Filenames that were successfully indexed
    pub filenames: Vec<String>,
    /// Total chunks indexed across all files
    pub chunks_indexed: usize,
    /// Per-file errors; files listed here were skipped, the rest proceeded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<UploadError>,
}
