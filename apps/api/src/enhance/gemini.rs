//! Cloud backend adapter: the Gemini generateContent API.
//!
//! The API key travels as the `key` query parameter. A missing key fails the
//! call before any network activity.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Backend, BackendAdapter, EnhanceError};

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenates the text fragments of the first candidate's parts.
    fn text(&self) -> String {
        let Some(content) = self.candidates.first().and_then(|c| c.content.as_ref()) else {
            return String::new();
        };
        content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiAdapter {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl BackendAdapter for GeminiAdapter {
    async fn enhance(&self, prompt: &str, _original: &str) -> Result<String, EnhanceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EnhanceError::MissingCredential(Backend::Gemini))?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| EnhanceError::Network {
                backend: Backend::Gemini,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini returned {status}: {body}");
            return Err(EnhanceError::Network {
                backend: Backend::Gemini,
                message: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| EnhanceError::Network {
            backend: Backend::Gemini,
            message: e.to_string(),
        })?;
        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| EnhanceError::Parse {
                backend: Backend::Gemini,
                message: e.to_string(),
            })?;

        let enhanced = parsed.text();
        if enhanced.is_empty() {
            return Err(EnhanceError::Empty(Backend::Gemini));
        }
        Ok(enhanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::test_support::spawn_json_endpoint;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_key_fails_before_any_network_call() {
        // Unroutable endpoint: a network attempt would surface as Network,
        // not MissingCredential.
        let adapter = GeminiAdapter::new(Client::new(), None)
            .with_endpoint("http://127.0.0.1:1/generate".to_string());
        let err = adapter.enhance("X", "X").await.unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::MissingCredential(Backend::Gemini)
        ));
    }

    #[tokio::test]
    async fn test_parts_are_concatenated() {
        let endpoint = spawn_json_endpoint(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}
            ]
        }))
        .await;
        let adapter =
            GeminiAdapter::new(Client::new(), Some("k".to_string())).with_endpoint(endpoint);
        let result = adapter.enhance("X", "X").await.unwrap();
        assert_eq!(result, "Hello world");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_empty_result_error() {
        let endpoint = spawn_json_endpoint(json!({"candidates": []})).await;
        let adapter =
            GeminiAdapter::new(Client::new(), Some("k".to_string())).with_endpoint(endpoint);
        let err = adapter.enhance("X", "X").await.unwrap_err();
        assert!(matches!(err, EnhanceError::Empty(Backend::Gemini)));
    }
}
