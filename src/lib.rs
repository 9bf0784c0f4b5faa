//! docquery: conversational document Q&A over uploaded PDFs
//!
//! This crate provides an HTTP service that ingests PDF documents, builds a
//! session-scoped vector index using the Gemini embedding API, and answers
//! follow-up questions with a history-aware retrieval-augmented-generation
//! flow against the Gemini chat API.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    chat::{ChatMessage, ChatRole, ChatTurn},
    document::{Chunk, ChunkSource, Document},
};
