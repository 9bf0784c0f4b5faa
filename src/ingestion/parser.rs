//! PDF text extraction

use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::document::hash_content;

/// How long a single extraction attempt may run before the fallback is used.
/// pdf-extract can hang on PDFs with pathological font tables.
const EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Parsed document with extracted text and page metadata
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Source filename
    pub filename: String,
    /// Extracted text content, cleaned
    pub content: String,
    /// Content hash of the extracted text
    pub content_hash: String,
    /// Total pages
    pub total_pages: u32,
    /// Page-level content where recoverable
    pub pages: Vec<PageContent>,
}

/// Content from a single page
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Text content of the page
    pub content: String,
    /// Character offset in the full document text
    pub char_offset: usize,
}

/// PDF file parser
pub struct PdfParser;

impl PdfParser {
    /// Check whether a filename looks like a PDF upload
    pub fn is_pdf(filename: &str) -> bool {
        filename
            .rsplit('.')
            .next()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }

    /// Parse a PDF byte stream into text with page metadata
    ///
    /// A file that parses but contains no extractable text yields
    /// `Error::EmptyDocument`, which callers treat as a per-file signal
    /// rather than a batch failure.
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        if !Self::is_pdf(filename) {
            return Err(Error::file_parse(
                filename,
                "Invalid file type. Please upload only PDF files.",
            ));
        }

        let raw = Self::extract_with_timeout(filename, data)?;
        let content = cleanup_pdf_text(&raw);

        if content.trim().is_empty() {
            return Err(Error::EmptyDocument(filename.to_string()));
        }

        let total_pages = Self::count_pages(data);

        // Page-by-page recovery is best effort; when per-page text cannot be
        // split out, the whole document counts as a single span.
        let pages = vec![PageContent {
            page_number: 1,
            content: content.clone(),
            char_offset: 0,
        }];

        Ok(ParsedDocument {
            filename: filename.to_string(),
            content_hash: hash_content(&content),
            content,
            total_pages,
            pages,
        })
    }

    /// Run pdf-extract in a watchdog thread so a hung extraction cannot
    /// stall the request forever
    fn extract_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
        use std::sync::mpsc;
        use std::thread;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                Ok(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed for '{}': {}, trying fallback", filename, e);
                Self::extract_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    "PDF extraction timeout after {}s for '{}'",
                    EXTRACT_TIMEOUT.as_secs(),
                    filename
                );
                Self::extract_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed for '{}'", filename);
                Self::extract_fallback(filename, data)
            }
        }
    }

    /// Fallback extraction using lopdf directly
    fn extract_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Unreadable PDF: {}", e)))?;

        let mut text = String::new();
        let pages = doc.get_pages();
        for page_number in pages.keys() {
            if let Ok(page_text) = doc.extract_text(&[*page_number]) {
                text.push_str(&page_text);
                text.push('\n');
            }
        }

        Ok(text)
    }

    /// Count pages via lopdf; a document that fails to load still counts as
    /// one page for attribution purposes
    fn count_pages(data: &[u8]) -> u32 {
        match lopdf::Document::load_mem(data) {
            Ok(doc) => doc.get_pages().len().max(1) as u32,
            Err(_) => 1,
        }
    }
}

/// Clean up extracted PDF text: normalize typographic characters that
/// extraction produces from font glyphs, strip nulls, collapse blank lines
fn cleanup_pdf_text(text: &str) -> String {
    let normalized = text
        .replace('\0', "")
        .replace('\u{2010}', "-")
        .replace('\u{2011}', "-")
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "--")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl");

    normalized
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(PdfParser::is_pdf("report.pdf"));
        assert!(PdfParser::is_pdf("REPORT.PDF"));
        assert!(!PdfParser::is_pdf("report.docx"));
        assert!(!PdfParser::is_pdf("report"));
    }

    #[test]
    fn test_non_pdf_rejected() {
        let err = PdfParser::parse("notes.txt", b"plain text").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_cleanup_typographic_chars() {
        let cleaned = cleanup_pdf_text("It\u{2019}s an \u{201C}of\u{FB01}cial\u{201D} report \u{2013} really\u{2026}");
        assert_eq!(cleaned, "It's an \"official\" report - really...");
    }

    #[test]
    fn test_cleanup_strips_blank_lines_and_nulls() {
        let cleaned = cleanup_pdf_text("line one\0\n\n   \n  line two  \n");
        assert_eq!(cleaned, "line one\nline two");
    }
}
