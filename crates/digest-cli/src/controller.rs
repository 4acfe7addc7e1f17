use std::io::Read;
use std::path::PathBuf;

use digest_core::{
    DigestError, ErrorKind, ExtractedDocument, Locale, SummaryClient, SummaryOptions,
    SummaryResult, require_paper_text,
};
use digest_ingest::{Extractor, MemorySource, PathSource};

/// Where the paper text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperInput {
    File(PathBuf),
    Stdin,
    Text(String),
}

impl PaperInput {
    /// `--text` wins over a file argument; a file argument of `-` is stdin.
    pub fn from_args(file: Option<PathBuf>, text: Option<String>) -> Option<PaperInput> {
        match (text, file) {
            (Some(text), _) => Some(PaperInput::Text(text)),
            (None, Some(path)) if path.as_os_str() == "-" => Some(PaperInput::Stdin),
            (None, Some(path)) => Some(PaperInput::File(path)),
            (None, None) => None,
        }
    }
}

/// Extract a file on disk into a named document.
pub fn extract_file(
    extractor: &Extractor,
    path: PathBuf,
) -> Result<ExtractedDocument, DigestError> {
    extractor.extract(&PathSource::new(path))
}

/// Read piped text and decode it like an uploaded `.txt` file.
pub fn read_paper<R: Read>(
    mut reader: R,
    extractor: &Extractor,
) -> Result<ExtractedDocument, DigestError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DigestError::with_cause(ErrorKind::TextReadFailed, e))?;
    let document = extractor.extract(&MemorySource::new("stdin.txt", bytes))?;
    Ok(ExtractedDocument {
        file_name: "<stdin>".to_string(),
        ..document
    })
}

/// Resolve `input` to a document. A missing input is an empty document, so
/// the blank-text check reports it.
pub fn load_paper(
    input: Option<PaperInput>,
    extractor: &Extractor,
) -> Result<ExtractedDocument, DigestError> {
    match input {
        None => Ok(ExtractedDocument {
            file_name: String::new(),
            text: String::new(),
        }),
        Some(PaperInput::Text(text)) => Ok(ExtractedDocument {
            file_name: "--text".to_string(),
            text,
        }),
        Some(PaperInput::Stdin) => read_paper(std::io::stdin().lock(), extractor),
        Some(PaperInput::File(path)) => extract_file(extractor, path),
    }
}

/// Check for usable text, then make exactly one generation request.
pub async fn summarize(
    client: &SummaryClient,
    paper_text: &str,
    options: &SummaryOptions,
    locale: Locale,
) -> Result<SummaryResult, DigestError> {
    let text = require_paper_text(paper_text)?;
    client.generate(text, options, locale).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::client::mock::{MockBackend, MockResponse};
    use std::sync::Arc;

    fn client(backend: &Arc<MockBackend>, key: Option<&str>) -> SummaryClient {
        SummaryClient::new(backend.clone(), key.map(str::to_string))
    }

    #[test]
    fn text_flag_wins_and_dash_means_stdin() {
        assert_eq!(
            PaperInput::from_args(Some("a.pdf".into()), Some("abc".into())),
            Some(PaperInput::Text("abc".into()))
        );
        assert_eq!(
            PaperInput::from_args(Some("-".into()), None),
            Some(PaperInput::Stdin)
        );
        assert_eq!(
            PaperInput::from_args(Some("a.pdf".into()), None),
            Some(PaperInput::File("a.pdf".into()))
        );
        assert_eq!(PaperInput::from_args(None, None), None);
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn piped_text_decodes_like_a_text_file() {
        let document = read_paper(&b"\xEF\xBB\xBFok \xFF"[..], &Extractor::empty()).unwrap();
        assert_eq!(document.file_name, "<stdin>");
        assert_eq!(document.text, "ok \u{FFFD}");
    }

    #[test]
    fn failed_pipe_read_is_text_read_failure() {
        let err = read_paper(BrokenPipe, &Extractor::empty()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TextReadFailed);
    }

    #[tokio::test]
    async fn blank_text_is_missing_input_without_a_request() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("unused".into())));
        let err = summarize(
            &client(&backend, Some("key")),
            " \n\t ",
            &SummaryOptions::default(),
            Locale::En,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_input_reported_before_missing_credential() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("unused".into())));
        let document = load_paper(None, &Extractor::empty()).unwrap();
        let err = summarize(
            &client(&backend, None),
            &document.text,
            &SummaryOptions::default(),
            Locale::ZhTw,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn file_on_disk_is_summarized_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.txt");
        std::fs::write(&path, "We propose a method.").unwrap();

        let document = load_paper(Some(PaperInput::File(path)), &Extractor::empty()).unwrap();
        assert_eq!(document.file_name, "paper.txt");

        let backend = Arc::new(MockBackend::new(MockResponse::Text(
            "**Summary:** a method".into(),
        )));
        let result = summarize(
            &client(&backend, Some("key")),
            &document.text,
            &SummaryOptions::default(),
            Locale::En,
        )
        .await
        .unwrap();

        assert_eq!(result.to_plain_text(), "Summary: a method");
        assert_eq!(backend.call_count(), 1);
        let sent = backend.last_request().unwrap();
        assert!(sent.user_prompt.contains("We propose a method."));
    }

    #[test]
    fn unsupported_file_is_rejected() {
        let err = load_paper(
            Some(PaperInput::File("slides.pptx".into())),
            &Extractor::empty(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }
}
