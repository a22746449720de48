//! Enhancement Dispatcher — the single point of entry for all text-generation
//! calls in Refit.
//!
//! ARCHITECTURAL RULE: no other module may call a generation backend directly.
//! Every backend implements the one-method `BackendAdapter` trait; the
//! dispatcher selects exactly one adapter per request from the closed
//! `Backend` enum. Exactly one attempt per call, no retries: failures are
//! reported to the caller, which turns them into a user-facing message.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

mod gemini;
mod ollama;
mod openai;

use crate::config::Config;
use gemini::GeminiAdapter;
use ollama::OllamaAdapter;
use openai::OpenAiAdapter;

const HTTP_TIMEOUT_SECS: u64 = 120;

/// The closed set of text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Ollama,
    Gemini,
    OpenAi,
}

impl Backend {
    /// Parses the `ai_service` request field. Unknown values fail here,
    /// before any adapter is touched or any network call attempted.
    pub fn parse(value: &str) -> Result<Self, EnhanceError> {
        match value.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            _ => Err(EnhanceError::UnsupportedBackend(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Ollama => "Ollama",
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Errors from the enhancement stage. Never fatal to the process: the web
/// layer converts them into a message for the user via [`user_message`].
///
/// [`user_message`]: EnhanceError::user_message
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("Unsupported AI service: {0}")]
    UnsupportedBackend(String),

    #[error("{0} API key is not configured")]
    MissingCredential(Backend),

    #[error("{backend} network error: {message}")]
    Network { backend: Backend, message: String },

    #[error("{backend} returned an unparseable response: {message}")]
    Parse { backend: Backend, message: String },

    #[error("{0} returned no enhanced content")]
    Empty(Backend),
}

impl EnhanceError {
    /// The message shown to the user when enhancement fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedBackend(_) => "Error: Unsupported AI service selected.".to_string(),
            Self::MissingCredential(b) => format!("Error: {b} API key is missing."),
            Self::Network { backend, .. } => {
                format!("Error: Failed to enhance resume using {backend}.")
            }
            Self::Parse { backend, .. } => format!("Error: Invalid response from {backend}."),
            Self::Empty(b) => format!("Error: No enhanced content received from {b}."),
        }
    }
}

/// One backend, one capability.
///
/// `original` is the pre-enhancement input; the local backend's documented
/// fallback returns it unchanged when the response carries no text field.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    async fn enhance(&self, prompt: &str, original: &str) -> Result<String, EnhanceError>;
}

/// The dispatcher. Owns one HTTP client and one adapter per backend,
/// all configured at construction — no ambient lookups inside adapters.
#[derive(Clone)]
pub struct Enhancer {
    ollama: OllamaAdapter,
    gemini: GeminiAdapter,
    openai: OpenAiAdapter,
}

impl Enhancer {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            ollama: OllamaAdapter::new(
                client.clone(),
                config.ollama_endpoint.clone(),
                config.ollama_model.clone(),
            ),
            gemini: GeminiAdapter::new(client.clone(), config.gemini_api_key.clone()),
            openai: OpenAiAdapter::new(client, config.openai_api_key.clone()),
        }
    }

    /// Builds the shared prompt and routes the request to one adapter.
    pub async fn enhance(
        &self,
        content: &str,
        objective: Option<&str>,
        backend: Backend,
    ) -> Result<String, EnhanceError> {
        let prompt = prompts::build_enhance_prompt(content, objective);

        let adapter: &dyn BackendAdapter = match backend {
            Backend::Ollama => &self.ollama,
            Backend::Gemini => &self.gemini,
            Backend::OpenAi => &self.openai,
        };

        let enhanced = adapter.enhance(&prompt, content).await?;
        debug!(backend = backend.as_str(), chars = enhanced.len(), "enhancement succeeded");
        Ok(enhanced)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse_known_values() {
        assert_eq!(Backend::parse("ollama").unwrap(), Backend::Ollama);
        assert_eq!(Backend::parse("Gemini").unwrap(), Backend::Gemini);
        assert_eq!(Backend::parse("OPENAI").unwrap(), Backend::OpenAi);
    }

    #[test]
    fn test_backend_parse_unknown_value() {
        let err = Backend::parse("copilot").unwrap_err();
        assert!(matches!(err, EnhanceError::UnsupportedBackend(_)));
        assert_eq!(err.user_message(), "Error: Unsupported AI service selected.");
    }

    #[test]
    fn test_user_messages_name_the_backend() {
        assert_eq!(
            EnhanceError::MissingCredential(Backend::Gemini).user_message(),
            "Error: Gemini API key is missing."
        );
        assert_eq!(
            EnhanceError::Empty(Backend::OpenAi).user_message(),
            "Error: No enhanced content received from OpenAI."
        );
        assert_eq!(
            EnhanceError::Network {
                backend: Backend::Ollama,
                message: "connection refused".to_string()
            }
            .user_message(),
            "Error: Failed to enhance resume using Ollama."
        );
    }
}
