//! Document processing endpoint

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::IngestPipeline;
use crate::retrieval::SessionIndex;
use crate::server::state::AppState;
use crate::types::api::{ProcessResponse, UploadError};

/// POST /rag-bot/process-pdf - Upload PDFs and rebuild the session index
///
/// Bad files are reported per-file and the batch continues; an embedding
/// failure is fatal for the whole request and leaves the session untouched.
pub async fn process_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let start = Instant::now();
    let session_id = super::session_id(&headers);

    // Drain the multipart stream into (filename, bytes) pairs
    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();
    let mut errors: Vec<UploadError> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            // Non-file form fields are ignored
            continue;
        };

        match field.bytes().await {
            Ok(data) => uploads.push((filename, data.to_vec())),
            Err(e) => {
                errors.push(UploadError {
                    filename,
                    error: format!("Failed to read file: {}", e),
                });
            }
        }
    }

    if uploads.is_empty() && errors.is_empty() {
        return Err(Error::InvalidRequest("No PDF files were provided.".to_string()));
    }

    // Parse and chunk; per-file failures accumulate, survivors proceed
    let pipeline = IngestPipeline::new(&state.config().chunking);
    let outcome = pipeline.ingest_batch(&uploads);
    let (documents, mut chunks, parse_errors) = outcome.into_parts();
    errors.extend(parse_errors);

    // A parsed file whose text was too short to chunk is reported, not fatal
    let mut filenames = Vec::new();
    let mut indexed_documents = Vec::new();
    for doc in documents {
        if doc.total_chunks == 0 {
            errors.push(UploadError {
                filename: doc.filename.clone(),
                error: "File produced no chunks; not enough extractable text.".to_string(),
            });
        } else {
            filenames.push(doc.filename.clone());
            indexed_documents.push(doc);
        }
    }

    if chunks.is_empty() {
        let summary = errors
            .iter()
            .map(|e| format!("{}: {}", e.filename, e.error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Internal(format!(
            "Failed to process PDFs: no documents could be loaded ({})",
            summary
        )));
    }

    // Embed the whole batch; any API failure aborts before the session sees
    // a partial index
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = state.embedding_provider().embed_batch(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(Error::Embedding(format!(
            "Embedding count mismatch: {} chunks, {} vectors",
            chunks.len(),
            embeddings.len()
        )));
    }

    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }

    let chunks_indexed = chunks.len();
    let index = SessionIndex::build(chunks)?;

    // Swap in the new index; the previous index and chat history go with it
    let session = state.sessions().session(&session_id);
    let mut session_state = session.lock().await;
    session_state.install_index(index, indexed_documents);
    drop(session_state);

    tracing::info!(
        "Session '{}': indexed {} chunks from {} file(s) in {:.1}s ({} file error(s))",
        session_id,
        chunks_indexed,
        filenames.len(),
        start.elapsed().as_secs_f64(),
        errors.len()
    );

    Ok(Json(ProcessResponse {
        message: "PDFs processed successfully.".to_string(),
        filenames,
        chunks_indexed,
        errors,
    }))
}
