//! Text chunking with overlap and source attribution

use unicode_segmentation::UnicodeSegmentation;

use super::parser::ParsedDocument;
use crate::config::ChunkingConfig;
use crate::types::{Chunk, ChunkSource, Document};

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            min_size: 50,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
            min_size: config.min_chunk_size,
        }
    }

    /// Chunk a parsed document, preserving source attribution
    pub fn chunk_document(&self, doc: &Document, parsed: &ParsedDocument) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        if parsed.pages.len() > 1 {
            for page in &parsed.pages {
                let source = ChunkSource::page(
                    parsed.filename.clone(),
                    page.page_number,
                    parsed.total_pages,
                );
                let page_chunks = self.chunk_text(
                    &page.content,
                    doc,
                    source,
                    page.char_offset,
                    chunks.len() as u32,
                );
                chunks.extend(page_chunks);
            }
        } else {
            // Single recovered span; page attribution only holds for
            // one-page documents
            let source = if parsed.total_pages == 1 {
                ChunkSource::page(parsed.filename.clone(), 1, 1)
            } else {
                ChunkSource::whole_file(parsed.filename.clone())
            };
            chunks = self.chunk_text(&parsed.content, doc, source, 0, 0);
        }

        chunks
    }

    /// Chunk a text span into overlapping, sentence-aligned chunks
    fn chunk_text(
        &self,
        text: &str,
        doc: &Document,
        source: ChunkSource,
        base_offset: usize,
        start_index: u32,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = start_index;

        let mut current_chunk = String::new();
        let mut current_start = 0usize;
        let mut char_pos = 0usize;

        for sentence in text.split_sentence_bounds() {
            let sentence_len = sentence.len();

            // If adding this sentence exceeds chunk size, save current chunk
            if !current_chunk.is_empty() && current_chunk.len() + sentence_len > self.chunk_size {
                if current_chunk.trim().len() >= self.min_size {
                    chunks.push(Chunk::new(
                        doc.id,
                        current_chunk.trim().to_string(),
                        source.clone(),
                        base_offset + current_start,
                        base_offset + char_pos,
                        chunk_index,
                    ));
                    chunk_index += 1;
                }

                // Start the next chunk with overlap from the previous one
                let overlap_text = self.overlap_text(&current_chunk);
                current_start = char_pos.saturating_sub(overlap_text.len());
                current_chunk = overlap_text;
            }

            current_chunk.push_str(sentence);
            char_pos += sentence_len;
        }

        // Save final chunk
        if current_chunk.trim().len() >= self.min_size {
            chunks.push(Chunk::new(
                doc.id,
                current_chunk.trim().to_string(),
                source,
                base_offset + current_start,
                base_offset + char_pos,
                chunk_index,
            ));
        }

        chunks
    }

    /// Tail of a chunk reused as the start of the next one, re-anchored at
    /// a sentence or word boundary
    fn overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len() - self.overlap;
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }
        let tail = &text[start..];

        if let Some(pos) = tail.find(". ") {
            return tail[pos + 2..].to_string();
        }
        if let Some(pos) = tail.find(' ') {
            return tail[pos + 1..].to_string();
        }

        tail.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::PageContent;

    fn parsed(filename: &str, content: &str) -> ParsedDocument {
        ParsedDocument {
            filename: filename.to_string(),
            content: content.to_string(),
            content_hash: crate::types::document::hash_content(content),
            total_pages: 1,
            pages: vec![PageContent {
                page_number: 1,
                content: content.to_string(),
                char_offset: 0,
            }],
        }
    }

    fn doc(filename: &str) -> Document {
        Document::new(filename.to_string(), "hash".into(), 0)
    }

    fn sample_text(sentences: usize) -> String {
        (0..sentences)
            .map(|i| format!("Sentence number {} talks about a distinct topic entirely. ", i))
            .collect()
    }

    #[test]
    fn test_empty_text_yields_zero_chunks() {
        let chunker = TextChunker::new(1500, 150);
        let d = doc("empty.pdf");
        let chunks = chunker.chunk_document(&d, &parsed("empty.pdf", ""));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_tiny_text_below_min_is_skipped() {
        let chunker = TextChunker::new(1500, 150);
        let d = doc("tiny.pdf");
        let chunks = chunker.chunk_document(&d, &parsed("tiny.pdf", "Too short."));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunks_are_bounded_and_ordered() {
        let chunker = TextChunker::new(200, 40);
        let text = sample_text(30);
        let d = doc("big.pdf");
        let chunks = chunker.chunk_document(&d, &parsed("big.pdf", &text));

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert_eq!(chunk.document_id, d.id);
            // One oversized sentence may push a chunk past the target, but
            // never past target + one sentence
            assert!(chunk.content.len() <= 200 + 60);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        // Overlap spans multiple sentence boundaries so the re-anchored
        // tail carries at least one full sentence into the next chunk
        let chunker = TextChunker::new(300, 150);
        let text = sample_text(30);
        let d = doc("overlap.pdf");
        let chunks = chunker.chunk_document(&d, &parsed("overlap.pdf", &text));

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            // The second chunk starts with text that also ends the first
            let head: String = pair[1].content.chars().take(20).collect();
            assert!(
                pair[0].content.contains(head.trim()),
                "chunk {} does not share its head with chunk {}",
                pair[1].chunk_index,
                pair[0].chunk_index
            );
        }
    }

    #[test]
    fn test_all_sentences_covered() {
        let chunker = TextChunker::new(250, 50);
        let text = sample_text(20);
        let d = doc("cover.pdf");
        let chunks = chunker.chunk_document(&d, &parsed("cover.pdf", &text));

        let merged: String = chunks.iter().map(|c| c.content.as_str()).collect();
        for i in 0..20 {
            let marker = format!("Sentence number {} ", i);
            assert!(merged.contains(&marker), "missing sentence {}", i);
        }
    }

    #[test]
    fn test_source_attribution_single_page() {
        let chunker = TextChunker::new(200, 40);
        let d = doc("attr.pdf");
        let chunks = chunker.chunk_document(&d, &parsed("attr.pdf", &sample_text(10)));

        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert_eq!(chunk.source.filename, "attr.pdf");
            assert_eq!(chunk.source.page_number, Some(1));
        }
    }

    #[test]
    fn test_multi_page_attribution() {
        let chunker = TextChunker::new(200, 40);
        let page_one = sample_text(5);
        let page_two = sample_text(5);
        let content = format!("{}{}", page_one, page_two);
        let p = ParsedDocument {
            filename: "two.pdf".into(),
            content_hash: crate::types::document::hash_content(&content),
            content,
            total_pages: 2,
            pages: vec![
                PageContent {
                    page_number: 1,
                    content: page_one.clone(),
                    char_offset: 0,
                },
                PageContent {
                    page_number: 2,
                    content: page_two.clone(),
                    char_offset: page_one.len(),
                },
            ],
        };
        let d = doc("two.pdf");
        let chunks = chunker.chunk_document(&d, &p);

        assert!(chunks.iter().any(|c| c.source.page_number == Some(1)));
        assert!(chunks.iter().any(|c| c.source.page_number == Some(2)));
        // Indices stay globally sequential across pages
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
        }
    }
}
