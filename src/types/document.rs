//! Document and chunk types with source tracking

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A PDF document that has been ingested into the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Content hash of the extracted text
    pub content_hash: String,
    /// Total number of pages
    pub total_pages: u32,
    /// Total number of chunks created
    pub total_chunks: u32,
    /// File size in bytes
    pub file_size: u64,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(filename: String, content_hash: String, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            content_hash,
            total_pages: 0,
            total_chunks: 0,
            file_size,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// Source attribution for a chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Original filename as uploaded
    pub filename: String,
    /// Page number (1-indexed), when the page is known
    pub page_number: Option<u32>,
    /// Total pages in the source document
    pub page_count: Option<u32>,
}

impl ChunkSource {
    /// Source info for a chunk taken from a specific page
    pub fn page(filename: String, page: u32, total_pages: u32) -> Self {
        Self {
            filename,
            page_number: Some(page),
            page_count: Some(total_pages),
        }
    }

    /// Source info for a chunk without page attribution
    pub fn whole_file(filename: String) -> Self {
        Self {
            filename,
            page_number: None,
            page_count: None,
        }
    }

    /// Format the source for inclusion in prompt context
    pub fn format_ref(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.filename, page),
            None => self.filename.clone(),
        }
    }
}

/// A chunk of text from a document, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector; empty until the index builder fills it
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source attribution
    pub source: ChunkSource,
    /// Character position in the source text
    pub char_start: usize,
    pub char_end: usize,
    /// Chunk index within the document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk without an embedding
    pub fn new(
        document_id: Uuid,
        content: String,
        source: ChunkSource,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            embedding: Vec::new(),
            source,
            char_start,
            char_end,
            chunk_index,
        }
    }
}

/// SHA-256 hash of text content, hex encoded
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_content_stable() {
        let a = hash_content("the same text");
        let b = hash_content("the same text");
        let c = hash_content("different text");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_source_format_ref() {
        let with_page = ChunkSource::page("report.pdf".into(), 3, 10);
        assert_eq!(with_page.format_ref(), "report.pdf, Page 3");

        let whole = ChunkSource::whole_file("notes.pdf".into());
        assert_eq!(whole.format_ref(), "notes.pdf");
    }
}
