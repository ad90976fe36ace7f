use std::fmt;

/// Errors found while validating a [`GenerationConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Gemini API key is missing; set SAARATHI_API_KEY or run `saarathi init`")]
    MissingApiKey,

    #[error("model name must not be empty")]
    EmptyModel,

    #[error("temperature must be within [0, 1], got {0}")]
    TemperatureOutOfRange(f32),

    #[error("endpoint must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),
}

/// Settings for talking to the generation backend.
///
/// Build with [`GenerationConfig::new`] and call [`GenerationConfig::validate`]
/// once at startup; the rest of the crate assumes a validated config.
#[derive(Clone, PartialEq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Base URL of the Gemini API.
    pub endpoint: String,
}

impl GenerationConfig {
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview";
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

    /// Config with the given key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_owned(),
            temperature: Self::DEFAULT_TEMPERATURE,
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Check every option, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
