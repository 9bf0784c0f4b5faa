//! Core types for documents, chat history, and the API surface

pub mod api;
pub mod chat;
pub mod document;

pub use api::{AskRequest, AskResponse, ProcessResponse, UploadError};
pub use chat::{ChatMessage, ChatRole, ChatTurn};
pub use document::{Chunk, ChunkSource, Document};
