//! Local backend adapter: an Ollama-compatible `/api/generate` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Backend, BackendAdapter, EnhanceError};

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    // The field may be absent when the model produced nothing; that case
    // falls back to the original content rather than erroring.
    response: Option<String>,
}

#[derive(Clone)]
pub struct OllamaAdapter {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaAdapter {
    pub fn new(client: Client, endpoint: String, model: String) -> Self {
        Self {
            client,
            endpoint,
            model,
        }
    }
}

#[async_trait]
impl BackendAdapter for OllamaAdapter {
    async fn enhance(&self, prompt: &str, original: &str) -> Result<String, EnhanceError> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| EnhanceError::Network {
                backend: Backend::Ollama,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Ollama returned {status}: {body}");
            return Err(EnhanceError::Network {
                backend: Backend::Ollama,
                message: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| EnhanceError::Network {
            backend: Backend::Ollama,
            message: e.to_string(),
        })?;
        let parsed: OllamaResponse =
            serde_json::from_str(&body).map_err(|e| EnhanceError::Parse {
                backend: Backend::Ollama,
                message: e.to_string(),
            })?;

        // Documented no-effect fallback: a 2xx JSON body without the text
        // field means "enhancement had no effect", not an error.
        Ok(parsed.response.unwrap_or_else(|| original.to_string()))
    }
}
