use std::future::Future;
use std::pin::Pin;

use serde_json::{Value, json};

use super::GenerationBackend;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GeminiBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL (proxies, tests). Trailing slashes are ignored.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

fn request_body(system_instruction: &str, user_prompt: &str) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": system_instruction }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": user_prompt }]
        }]
    })
}

/// Concatenate the text parts of the first candidate.
fn response_text(data: &Value) -> Option<String> {
    let parts = data["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .and_then(|c| c["content"]["parts"].as_array())?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() { None } else { Some(text) }
}

impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn send<'a>(
        &'a self,
        system_instruction: &'a str,
        user_prompt: &'a str,
        credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .client
                .post(self.request_url())
                .header("x-goog-api-key", credential)
                .json(&request_body(system_instruction, user_prompt))
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                    .unwrap_or(body);
                return Err(format!("HTTP {}: {}", status, detail));
            }

            let data: Value = resp.json().await.map_err(|e| e.to_string())?;
            response_text(&data).ok_or_else(|| {
                let reason = data["promptFeedback"]["blockReason"]
                    .as_str()
                    .or_else(|| data["candidates"][0]["finishReason"].as_str())
                    .unwrap_or("no text in response");
                format!("empty response ({})", reason)
            })
        })
    }
}
