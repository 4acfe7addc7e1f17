use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text items of one PDF page, in reading order.
pub type PageItems = Vec<String>;

/// Trait for PDF text extraction backends.
///
/// Implementors only split the document into pages and text items; joining
/// them into a single string is done by the extractor in `digest-ingest` so
/// every backend produces the same layout.
pub trait PdfBackend: Send + Sync {
    /// Extract the text items of every page, first page first.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageItems>, BackendError>;
}

/// Trait for Word document (`.docx`, best-effort `.doc`) text extraction.
pub trait DocxBackend: Send + Sync {
    /// Extract the raw text content of the document.
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<String, BackendError>;
}
