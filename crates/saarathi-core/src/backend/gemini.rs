//! Gemini `generateContent` adapter.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{BackendError, BackendRequest, BackendResponse, GenerationBackend};

/// Longest error body kept in [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 2048;

/// Client for the Gemini REST API.
///
/// No timeout is set on the HTTP client; a call runs until the API answers
/// or the connection fails.
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    fn url_for(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(
        &self,
        request: &BackendRequest,
    ) -> Result<BackendResponse, BackendError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": request.settings,
        });

        let url = self.url_for(&request.model);
        tracing::debug!(url = %url, model = %request.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidEnvelope(e.to_string()))?;

        Ok(BackendResponse {
            text: envelope.first_text(),
        })
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with its text parts concatenated.
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let texts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_owned();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
