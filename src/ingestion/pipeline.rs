//! Ingestion pipeline: parse uploaded files and chunk the survivors

use super::chunker::TextChunker;
use super::parser::PdfParser;
use crate::config::ChunkingConfig;
use crate::types::api::UploadError;
use crate::types::{Chunk, Document};

/// One successfully ingested file
#[derive(Debug)]
pub struct IngestedFile {
    /// Document record for the file
    pub document: Document,
    /// Chunks produced from its text, without embeddings yet
    pub chunks: Vec<Chunk>,
}

/// Result of running a batch of uploads through the pipeline
#[derive(Debug, Default)]
pub struct IngestOutcome {
    /// Files that parsed and chunked
    pub files: Vec<IngestedFile>,
    /// Per-file failures; the batch continues past them
    pub errors: Vec<UploadError>,
}

impl IngestOutcome {
    /// Total chunks across all ingested files
    pub fn total_chunks(&self) -> usize {
        self.files.iter().map(|f| f.chunks.len()).sum()
    }

    /// All chunks, in file order
    pub fn into_parts(self) -> (Vec<Document>, Vec<Chunk>, Vec<UploadError>) {
        let mut documents = Vec::with_capacity(self.files.len());
        let mut chunks = Vec::new();
        for file in self.files {
            documents.push(file.document);
            chunks.extend(file.chunks);
        }
        (documents, chunks, self.errors)
    }
}

/// Pipeline from raw upload bytes to chunks
pub struct IngestPipeline {
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a pipeline with the given chunking configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunker: TextChunker::from_config(config),
        }
    }

    /// Process an upload batch
    ///
    /// Bad files (non-PDF, unreadable, no extractable text) are reported in
    /// the outcome's error list; remaining files are still processed. A file
    /// with no extractable text contributes zero chunks and does not fail
    /// the batch.
    pub fn ingest_batch(&self, uploads: &[(String, Vec<u8>)]) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        for (filename, data) in uploads {
            match self.ingest_file(filename, data) {
                Ok(file) => {
                    tracing::info!(
                        "Parsed '{}': {} pages, {} chunks",
                        filename,
                        file.document.total_pages,
                        file.chunks.len()
                    );
                    outcome.files.push(file);
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", filename, e);
                    outcome.errors.push(UploadError {
                        filename: filename.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome
    }

    /// Parse and chunk a single file
    fn ingest_file(&self, filename: &str, data: &[u8]) -> crate::error::Result<IngestedFile> {
        let parsed = PdfParser::parse(filename, data)?;

        let mut document = Document::new(
            filename.to_string(),
            parsed.content_hash.clone(),
            data.len() as u64,
        );
        document.total_pages = parsed.total_pages;

        let chunks = self.chunker.chunk_document(&document, &parsed);
        document.total_chunks = chunks.len() as u32;

        Ok(IngestedFile { document, chunks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_files_reported_batch_continues() {
        let pipeline = IngestPipeline::new(&ChunkingConfig::default());
        let uploads = vec![
            ("notes.txt".to_string(), b"not a pdf".to_vec()),
            ("broken.pdf".to_string(), b"%PDF-garbage".to_vec()),
        ];

        let outcome = pipeline.ingest_batch(&uploads);
        assert!(outcome.files.is_empty());
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].filename, "notes.txt");
        assert_eq!(outcome.errors[1].filename, "broken.pdf");
    }
}
