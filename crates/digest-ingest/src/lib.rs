use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use digest_core::backend::PageItems;
use digest_core::{DigestError, DocxBackend, ErrorKind, PdfBackend};

#[cfg(feature = "docx")]
pub mod docx;

// Re-export domain types for convenience
pub use digest_core::{BackendError, ExtractedDocument};

/// A file-like handle: a name plus access to its bytes.
pub trait SourceFile {
    /// The declared file name; only its extension is used for dispatch.
    fn name(&self) -> &str;

    fn read_bytes(&self) -> std::io::Result<Vec<u8>>;
}

/// A file on disk. The name is the final path component.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceFile for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// An in-memory upload.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl SourceFile for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Which parsing path a file name routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
    /// Legacy binary Word document; handed to the Word backend on a
    /// best-effort basis.
    Doc,
}

impl DocumentKind {
    /// Classify by extension, case-insensitively. `None` means unsupported.
    pub fn from_file_name(name: &str) -> Option<DocumentKind> {
        let lower = name.to_lowercase();
        if lower.ends_with(".txt") {
            Some(DocumentKind::Text)
        } else if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else if lower.ends_with(".doc") {
            Some(DocumentKind::Doc)
        } else {
            None
        }
    }
}

/// Join PDF pages: items within a page by one space, each page followed by
/// a newline.
pub fn join_pages(pages: &[PageItems]) -> String {
    let mut text = String::new();
    for items in pages {
        text.push_str(&items.join(" "));
        text.push('\n');
    }
    text
}

#[cfg(feature = "pdf")]
static DEFAULT_PDF_BACKEND: once_cell::sync::Lazy<Arc<dyn PdfBackend>> =
    once_cell::sync::Lazy::new(|| {
        tracing::debug!("initialising MuPDF backend");
        Arc::new(digest_pdf_mupdf::MupdfBackend::new())
    });

/// The PDF capability compiled into this build, created at most once per
/// process.
pub fn default_pdf_backend() -> Option<Arc<dyn PdfBackend>> {
    #[cfg(feature = "pdf")]
    {
        Some(Arc::clone(&DEFAULT_PDF_BACKEND))
    }
    #[cfg(not(feature = "pdf"))]
    {
        None
    }
}

/// The Word capability compiled into this build.
pub fn default_docx_backend() -> Option<Arc<dyn DocxBackend>> {
    #[cfg(feature = "docx")]
    {
        Some(Arc::new(docx::ZipDocxBackend::new()))
    }
    #[cfg(not(feature = "docx"))]
    {
        None
    }
}

/// Turns an uploaded file into plain text.
///
/// Dispatches on the file name's extension:
/// - `.txt` → decoded directly as UTF-8 (invalid sequences replaced)
/// - `.pdf` → PDF backend
/// - `.docx` / `.doc` → Word backend
/// - anything else → [`ErrorKind::UnsupportedType`], without reading the file
///
/// A missing backend is reported as [`ErrorKind::PdfLibMissing`] or
/// [`ErrorKind::DocxLibMissing`].
#[derive(Clone)]
pub struct Extractor {
    pdf: Option<Arc<dyn PdfBackend>>,
    docx: Option<Arc<dyn DocxBackend>>,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("pdf", &self.pdf.as_ref().map(|_| "<available>"))
            .field("docx", &self.docx.as_ref().map(|_| "<available>"))
            .finish()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            pdf: default_pdf_backend(),
            docx: default_docx_backend(),
        }
    }
}

impl Extractor {
    /// Extractor with every capability this build provides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with no PDF or Word capability; only `.txt` works.
    pub fn empty() -> Self {
        Self {
            pdf: None,
            docx: None,
        }
    }

    pub fn with_pdf(mut self, backend: Arc<dyn PdfBackend>) -> Self {
        self.pdf = Some(backend);
        self
    }

    pub fn with_docx(mut self, backend: Arc<dyn DocxBackend>) -> Self {
        self.docx = Some(backend);
        self
    }

    pub fn supports_pdf(&self) -> bool {
        self.pdf.is_some()
    }

    pub fn supports_docx(&self) -> bool {
        self.docx.is_some()
    }

    pub fn extract(&self, file: &dyn SourceFile) -> Result<ExtractedDocument, DigestError> {
        let name = file.name();
        let kind = DocumentKind::from_file_name(name).ok_or_else(|| {
            tracing::debug!(file = name, "rejecting unsupported file type");
            DigestError::new(ErrorKind::UnsupportedType)
        })?;
        tracing::debug!(file = name, ?kind, "extracting text");

        let text = match kind {
            DocumentKind::Text => read_text(file)?,
            DocumentKind::Pdf => self.read_pdf(file)?,
            DocumentKind::Docx | DocumentKind::Doc => {
                if kind == DocumentKind::Doc {
                    tracing::warn!(
                        file = name,
                        "legacy .doc files have limited support; use .docx for better results"
                    );
                }
                self.read_docx(file)?
            }
        };

        Ok(ExtractedDocument {
            file_name: name.to_string(),
            text,
        })
    }

    fn read_pdf(&self, file: &dyn SourceFile) -> Result<String, DigestError> {
        let backend = self
            .pdf
            .as_ref()
            .ok_or_else(|| DigestError::new(ErrorKind::PdfLibMissing))?;

        let pages = file
            .read_bytes()
            .map_err(BackendError::from)
            .and_then(|bytes| backend.extract_pages(&bytes))
            .map_err(|e| {
                tracing::warn!(file = file.name(), error = %e, "PDF parsing failed");
                DigestError::with_cause(ErrorKind::PdfParseFailed, e)
            })?;

        Ok(join_pages(&pages))
    }

    fn read_docx(&self, file: &dyn SourceFile) -> Result<String, DigestError> {
        let backend = self
            .docx
            .as_ref()
            .ok_or_else(|| DigestError::new(ErrorKind::DocxLibMissing))?;

        file.read_bytes()
            .map_err(BackendError::from)
            .and_then(|bytes| backend.extract_raw_text(&bytes))
            .map_err(|e| {
                tracing::warn!(file = file.name(), error = %e, "Word document parsing failed");
                DigestError::with_cause(ErrorKind::DocxParseFailed, e)
            })
    }
}

fn read_text(file: &dyn SourceFile) -> Result<String, DigestError> {
    let bytes = file.read_bytes().map_err(|e| {
        tracing::warn!(file = file.name(), error = %e, "text file read failed");
        DigestError::with_cause(ErrorKind::TextReadFailed, e)
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_prefix('\u{FEFF}').unwrap_or(&text).to_string())
}
