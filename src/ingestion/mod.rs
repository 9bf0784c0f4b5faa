//! PDF ingestion pipeline: parsing and chunking

mod chunker;
mod parser;
mod pipeline;

pub use chunker::TextChunker;
pub use parser::{PageContent, ParsedDocument, PdfParser};
pub use pipeline::{IngestOutcome, IngestPipeline, IngestedFile};
