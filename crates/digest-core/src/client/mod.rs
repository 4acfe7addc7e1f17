//! Summary client and the generation backends it talks to.

pub mod gemini;
pub mod mock;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::locale::Locale;
use crate::options::SummaryOptions;
use crate::prompt::build_prompt;
use crate::{DigestError, ErrorKind, SummaryResult};

pub use gemini::GeminiBackend;

/// A remote text generation service.
///
/// One call carries the system instruction, the user prompt and the access
/// credential, and resolves to the generated text.
pub trait GenerationBackend: Send + Sync {
    /// Human-readable name used in logs (e.g. "Gemini").
    fn name(&self) -> &str;

    fn send<'a>(
        &'a self,
        system_instruction: &'a str,
        user_prompt: &'a str,
        credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;
}

/// Turns paper text and options into a summary with a single backend call.
///
/// No retries and no caching: every call to [`generate`](Self::generate)
/// reaches the backend exactly once, unless the credential is missing.
#[derive(Clone)]
pub struct SummaryClient {
    backend: Arc<dyn GenerationBackend>,
    credential: Option<String>,
}

impl std::fmt::Debug for SummaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryClient")
            .field("backend", &self.backend.name())
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .finish()
    }
}

impl SummaryClient {
    pub fn new(backend: Arc<dyn GenerationBackend>, credential: Option<String>) -> Self {
        Self {
            backend,
            credential,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    pub async fn generate(
        &self,
        paper_text: &str,
        options: &SummaryOptions,
        locale: Locale,
    ) -> Result<SummaryResult, DigestError> {
        let credential = match self.credential.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return Err(DigestError::new(ErrorKind::MissingCredential)),
        };

        let prompt = build_prompt(paper_text, options, locale);
        tracing::debug!(
            backend = self.backend.name(),
            locale = %locale,
            prompt_chars = prompt.user_prompt.chars().count(),
            "requesting summary"
        );

        match self
            .backend
            .send(&prompt.system_instruction, &prompt.user_prompt, credential)
            .await
        {
            Ok(text) => Ok(SummaryResult::new(text)),
            Err(e) => {
                tracing::error!(backend = self.backend.name(), error = %e, "generation failed");
                Err(DigestError::with_cause(ErrorKind::GenerationFailed, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockBackend, MockResponse};
    use super::*;

    fn client(backend: &Arc<MockBackend>, credential: Option<&str>) -> SummaryClient {
        SummaryClient::new(backend.clone(), credential.map(str::to_string))
    }

    #[tokio::test]
    async fn missing_credential_never_reaches_backend() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("unused".into())));
        for credential in [None, Some(""), Some("   ")] {
            let err = client(&backend, credential)
                .generate("paper", &SummaryOptions::default(), Locale::En)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingCredential);
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn success_returns_backend_text() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("**Done**".into())));
        let result = client(&backend, Some("key"))
            .generate("paper", &SummaryOptions::default(), Locale::En)
            .await
            .unwrap();
        assert_eq!(result.text, "**Done**");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn backend_error_becomes_generation_failed() {
        let backend = Arc::new(MockBackend::new(MockResponse::Error("HTTP 503".into())));
        let err = client(&backend, Some("key"))
            .generate("paper", &SummaryOptions::default(), Locale::En)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenerationFailed);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn identical_requests_are_not_cached() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("ok".into())));
        let client = client(&backend, Some("key"));
        for _ in 0..3 {
            client
                .generate("paper", &SummaryOptions::default(), Locale::En)
                .await
                .unwrap();
        }
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn backend_receives_built_prompt_and_trimmed_credential() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("ok".into())));
        let options = SummaryOptions::default().with_critical_analysis(true);
        client(&backend, Some(" key "))
            .generate("the paper", &options, Locale::ZhTw)
            .await
            .unwrap();

        let sent = backend.last_request().unwrap();
        let expected = build_prompt("the paper", &options, Locale::ZhTw);
        assert_eq!(sent.system_instruction, expected.system_instruction);
        assert_eq!(sent.user_prompt, expected.user_prompt);
        assert_eq!(sent.credential, "key");
    }

    #[test]
    fn debug_output_redacts_credential() {
        let backend = Arc::new(MockBackend::new(MockResponse::Text("ok".into())));
        let rendered = format!("{:?}", client(&backend, Some("secret-key")));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("***"));
    }
}
