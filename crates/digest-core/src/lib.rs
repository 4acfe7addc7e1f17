use std::fmt;

use thiserror::Error;

pub mod backend;
pub mod client;
pub mod config_file;
pub mod locale;
pub mod markup;
pub mod options;
pub mod prompt;

// Re-export for convenience
pub use backend::{BackendError, DocxBackend, PdfBackend};
pub use client::{GenerationBackend, SummaryClient};
pub use locale::Locale;
pub use options::{Audience, OutputFormat, SummaryOptions, WordCount};
pub use prompt::{Prompt, build_prompt};

/// The closed set of failures surfaced to the user.
///
/// Every kind maps to one localized message (see [`locale::error_message`]);
/// none of them is retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// File extension is not one of `.txt`, `.pdf`, `.doc`, `.docx`.
    UnsupportedType,
    /// The PDF capability is not available in this build.
    PdfLibMissing,
    /// The Word-document capability is not available in this build.
    DocxLibMissing,
    /// The PDF could not be opened or decoded (corrupt or protected).
    PdfParseFailed,
    /// The Word document could not be decoded.
    DocxParseFailed,
    /// Reading a plain-text file failed.
    TextReadFailed,
    /// No access credential for the generation service is configured.
    MissingCredential,
    /// The remote generation call failed for any reason.
    GenerationFailed,
    /// Submit was attempted with empty paper text.
    MissingInput,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::UnsupportedType,
        ErrorKind::PdfLibMissing,
        ErrorKind::DocxLibMissing,
        ErrorKind::PdfParseFailed,
        ErrorKind::DocxParseFailed,
        ErrorKind::TextReadFailed,
        ErrorKind::MissingCredential,
        ErrorKind::GenerationFailed,
        ErrorKind::MissingInput,
    ];

    /// Stable message key, independent of locale.
    pub fn key(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedType => "fileParser.unsupportedType",
            ErrorKind::PdfLibMissing => "fileParser.pdfLibMissing",
            ErrorKind::DocxLibMissing => "fileParser.docxLibMissing",
            ErrorKind::PdfParseFailed => "fileParser.pdfParseFailed",
            ErrorKind::DocxParseFailed => "fileParser.docxParseFailed",
            ErrorKind::TextReadFailed => "fileParser.textReadFailed",
            ErrorKind::MissingCredential => "error.missingCredential",
            ErrorKind::GenerationFailed => "error.generic",
            ErrorKind::MissingInput => "error.missingText",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ErrorKind::UnsupportedType => "unsupported file type",
            ErrorKind::PdfLibMissing => "PDF support is not available",
            ErrorKind::DocxLibMissing => "Word document support is not available",
            ErrorKind::PdfParseFailed => "failed to parse PDF",
            ErrorKind::DocxParseFailed => "failed to parse Word document",
            ErrorKind::TextReadFailed => "failed to read text file",
            ErrorKind::MissingCredential => "no API key configured",
            ErrorKind::GenerationFailed => "summary generation failed",
            ErrorKind::MissingInput => "no paper text supplied",
        };
        f.write_str(msg)
    }
}

/// Error returned by every user-facing operation.
///
/// Carries only its [`ErrorKind`]; the underlying cause, if any, is kept for
/// logging and is reachable through [`std::error::Error::source`].
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct DigestError {
    kind: ErrorKind,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DigestError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, cause: None }
    }

    pub fn with_cause(
        kind: ErrorKind,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            cause: Some(cause.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// User-facing message for this error in `locale`.
    pub fn localized(&self, locale: Locale) -> &'static str {
        locale::error_message(self.kind, locale)
    }
}

impl From<ErrorKind> for DigestError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Text pulled out of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub text: String,
}

/// Text returned by the generation service.
///
/// May contain `**bold**` markers; see [`markup`] for rendering helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: String,
}

impl SummaryResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Bold markers rewritten as `<strong>` tags.
    pub fn to_html(&self) -> String {
        markup::bold_to_html(&self.text)
    }

    /// The "copy" form: markup converted and then stripped.
    pub fn to_plain_text(&self) -> String {
        markup::to_plain_text(&self.text)
    }
}

/// Reject paper text that is empty or whitespace-only.
pub fn require_paper_text(text: &str) -> Result<&str, DigestError> {
    if text.trim().is_empty() {
        return Err(DigestError::new(ErrorKind::MissingInput));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::error::Error;

    #[test]
    fn error_keys_are_unique() {
        let keys: HashSet<_> = ErrorKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(keys.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let io = std::io::Error::other("disk on fire");
        let err = DigestError::with_cause(ErrorKind::TextReadFailed, io);
        assert_eq!(err.kind(), ErrorKind::TextReadFailed);
        assert_eq!(err.to_string(), "failed to read text file");
        assert!(err.source().unwrap().to_string().contains("disk on fire"));
    }

    #[test]
    fn bare_error_has_no_source() {
        let err: DigestError = ErrorKind::UnsupportedType.into();
        assert!(err.source().is_none());
    }

    #[test]
    fn blank_paper_text_is_missing_input() {
        for text in ["", "   ", "\n\t\n"] {
            let err = require_paper_text(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingInput);
        }
        assert_eq!(require_paper_text(" abstract ").unwrap(), " abstract ");
    }

    #[test]
    fn summary_result_renders_both_forms() {
        let result = SummaryResult::new("**Result:** good");
        assert_eq!(result.to_html(), "<strong>Result:</strong> good");
        assert_eq!(result.to_plain_text(), "Result: good");
    }
}
