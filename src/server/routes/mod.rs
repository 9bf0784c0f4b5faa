//! API routes

pub mod ask;
pub mod process;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderMap,
    routing::post,
    Router,
};

use crate::server::session::DEFAULT_SESSION;
use crate::server::state::AppState;

/// Build the RAG bot routes
pub fn rag_bot_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/process-pdf",
            post(process::process_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ask", post(ask::ask_question))
}

/// Resolve the session ID for a request
///
/// Clients may scope their state with an `x-session-id` header; everything
/// else shares the default session.
pub fn session_id(headers: &HeaderMap) -> String {
    headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}
