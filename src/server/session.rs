//! Session state: the index and chat history owned by one client session
//!
//! Sessions are in-memory only. Nothing here survives a restart, and no
//! session can observe another's index or history.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::retrieval::SessionIndex;
use crate::types::{ChatTurn, Document};

/// Session used when a client does not identify itself
pub const DEFAULT_SESSION: &str = "default";

/// Mutable state of one session
#[derive(Default)]
pub struct SessionState {
    /// Vector index over the session's current upload batch
    index: Option<SessionIndex>,
    /// Documents in the current batch
    documents: Vec<Document>,
    /// Completed question/answer turns since the last upload
    history: Vec<ChatTurn>,
}

impl SessionState {
    /// The session's index, if an upload batch has been processed
    pub fn index(&self) -> Option<&SessionIndex> {
        self.index.as_ref()
    }

    /// Documents in the current batch
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Chat history since the last upload
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Replace the session's index with a freshly built one
    ///
    /// The previous index and the chat history are discarded together: a
    /// new upload batch starts a new conversation.
    pub fn install_index(&mut self, index: SessionIndex, documents: Vec<Document>) {
        self.index = Some(index);
        self.documents = documents;
        self.history.clear();
    }

    /// Append a completed turn
    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.history.push(turn);
    }
}

/// Concurrency-safe map from session ID to session state
///
/// Each session is guarded by an async mutex held for the duration of an
/// operation, serializing requests within a session while letting distinct
/// sessions proceed in parallel.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the session for an ID
    pub fn session(&self, id: &str) -> Arc<Mutex<SessionState>> {
        self.sessions
            .entry(id.to_string())
            .or_default()
            .clone()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any session exists
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
