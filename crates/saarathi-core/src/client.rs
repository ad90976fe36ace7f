//! Generation client: one prompt in, one validated lesson plan out.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::backend::{
    BackendError, BackendRequest, GenerationBackend, GenerationSettings, JSON_MIME_TYPE,
};
use crate::config::GenerationConfig;
use crate::prompt::build_prompt;
use crate::request::GenerationRequest;
use crate::schema::{
    LessonPlan, PlanDecodeError, decode_lesson_plan, lesson_plan_response_schema,
};

/// Why a generation attempt produced no plan.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("empty response from generation backend")]
    EmptyResponse,

    #[error("malformed lesson plan in backend response: {0}")]
    MalformedResponse(#[from] PlanDecodeError),

    #[error(transparent)]
    Transport(#[from] BackendError),
}

/// Builds requests for the backend and decodes its answers.
///
/// Each call to [`GenerationClient::generate`] makes exactly one backend
/// request. There is no retry and no repair of malformed output.
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    model: String,
    temperature: f32,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: &GenerationConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// The backend request that [`GenerationClient::generate`] would send.
    pub fn backend_request(&self, request: &GenerationRequest) -> BackendRequest {
        BackendRequest {
            model: self.model.clone(),
            prompt: build_prompt(request),
            settings: GenerationSettings {
                response_mime_type: JSON_MIME_TYPE.to_owned(),
                response_schema: lesson_plan_response_schema(),
                temperature: self.temperature,
            },
        }
    }

    /// Generate a lesson plan for a validated request.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<LessonPlan, GenerationError> {
        let call = self.backend_request(request);

        tracing::info!(
            backend = self.backend.name(),
            model = %self.model,
            class = %request.class(),
            subject = request.subject(),
            topic = request.topic(),
            difficulty = %request.difficulty(),
            "generating lesson plan"
        );

        let started = Instant::now();
        let response = self.backend.generate_content(&call).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let text = match response.text {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                tracing::warn!(elapsed_ms, "generation backend returned no text");
                return Err(GenerationError::EmptyResponse);
            }
        };

        let plan = decode_lesson_plan(&text)?;
        tracing::info!(
            elapsed_ms,
            periods = plan.periods.len(),
            outcomes = plan.learning_outcomes.len(),
            "lesson plan generated"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::backend::BackendResponse;
    use crate::schema::{ClassLevel, Difficulty};

    struct SilentBackend;

    #[async_trait]
    impl GenerationBackend for SilentBackend {
        fn name(&self) -> &str {
            "silent"
        }

        async fn generate_content(
            &self,
            _request: &BackendRequest,
        ) -> Result<BackendResponse, BackendError> {
            Ok(BackendResponse { text: None })
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(ClassLevel::Eight, "Maths", "Fractions", Difficulty::Advanced)
            .unwrap()
    }

    fn client() -> GenerationClient {
        let config = GenerationConfig::new("test-key")
            .with_model("test-model")
            .with_temperature(0.4);
        GenerationClient::new(Arc::new(SilentBackend), &config)
    }

    #[test]
    fn backend_request_carries_schema_and_settings() {
        let call = client().backend_request(&request());
        assert_eq!(call.model, "test-model");
        assert_eq!(call.settings.response_mime_type, "application/json");
        assert_eq!(call.settings.temperature, 0.4);
        assert_eq!(call.settings.response_schema, lesson_plan_response_schema());
        assert!(call.prompt.contains("Topic: Fractions"));
    }

    #[test]
    fn settings_serialize_in_camel_case() {
        let v = serde_json::to_value(&client().backend_request(&request()).settings).unwrap();
        assert_eq!(v["responseMimeType"], "application/json");
        assert!(v.get("responseSchema").is_some());
        assert!(v.get("temperature").is_some());
    }

    #[tokio::test]
    async fn missing_text_is_empty_response() {
        let err = client().generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }
}
