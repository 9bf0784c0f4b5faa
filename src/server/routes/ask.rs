//! Question answering endpoint

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::api::{AskRequest, AskResponse};
use crate::types::ChatTurn;

/// POST /rag-bot/ask - Answer a question against the session's documents
///
/// The session lock is held for the whole operation, so requests within one
/// session are answered strictly in order. A failed ask leaves the history
/// unchanged.
pub async fn ask_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    let session_id = super::session_id(&headers);

    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(Error::InvalidRequest("Question must not be empty.".to_string()));
    }

    tracing::info!("Session '{}': question \"{}\"", session_id, question);

    let session = state.sessions().session(&session_id);
    let mut session_state = session.lock().await;

    let index = session_state.index().ok_or(Error::NoDocumentsIndexed)?;

    let chain = state.chain();
    let answer = chain.ask(index, session_state.history(), &question).await?;

    session_state.push_turn(ChatTurn::new(question, answer.clone()));

    tracing::info!(
        "Session '{}': answered in {}ms ({} turns in history)",
        session_id,
        start.elapsed().as_millis(),
        session_state.history().len()
    );

    Ok(Json(AskResponse { answer }))
}
