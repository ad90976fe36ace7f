//! Adapter interface for the generative backend.
//!
//! The [`GenerationBackend`] trait is the seam between the generation client
//! and the hosted model. [`GeminiBackend`] talks to the Gemini REST API;
//! tests substitute a scripted fake.

pub mod gemini;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub use gemini::GeminiBackend;

/// MIME type requesting structured JSON output.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Output constraints sent alongside the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f32,
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub model: String,
    pub prompt: String,
    pub settings: GenerationSettings,
}

/// What came back. `text` is `None` when the backend produced no text part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendResponse {
    pub text: Option<String>,
}

/// Failures below the plan level: network, HTTP status, response envelope.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to generation backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation backend returned an unreadable envelope: {0}")]
    InvalidEnvelope(String),
}

/// A hosted model that turns a prompt plus output constraints into text.
///
/// Object safe, so it can be held as `Arc<dyn GenerationBackend>`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Issue one request and return the raw text payload.
    async fn generate_content(
        &self,
        request: &BackendRequest,
    ) -> Result<BackendResponse, BackendError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn GenerationBackend) {}
};
