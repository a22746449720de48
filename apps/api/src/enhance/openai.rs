//! Cloud backend adapter: the OpenAI chat-completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Backend, BackendAdapter, EnhanceError};

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o";

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiAdapter {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl OpenAiAdapter {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: OPENAI_ENDPOINT.to_string(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl BackendAdapter for OpenAiAdapter {
    async fn enhance(&self, prompt: &str, _original: &str) -> Result<String, EnhanceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EnhanceError::MissingCredential(Backend::OpenAi))?;

        let request = OpenAiRequest {
            model: MODEL,
            messages: vec![OpenAiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EnhanceError::Network {
                backend: Backend::OpenAi,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI returned {status}: {body}");
            return Err(EnhanceError::Network {
                backend: Backend::OpenAi,
                message: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| EnhanceError::Network {
            backend: Backend::OpenAi,
            message: e.to_string(),
        })?;
        let parsed: OpenAiResponse =
            serde_json::from_str(&body).map_err(|e| EnhanceError::Parse {
                backend: Backend::OpenAi,
                message: e.to_string(),
            })?;

        let enhanced = parsed
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();
        if enhanced.is_empty() {
            return Err(EnhanceError::Empty(Backend::OpenAi));
        }
        Ok(enhanced.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::test_support::spawn_json_endpoint;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_key_fails_before_any_network_call() {
        let adapter = OpenAiAdapter::new(Client::new(), None)
            .with_endpoint("http://127.0.0.1:1/v1/chat/completions".to_string());
        let err = adapter.enhance("X", "X").await.unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::MissingCredential(Backend::OpenAi)
        ));
    }

    #[tokio::test]
    async fn test_first_choice_text_is_returned_trimmed() {
        let endpoint = spawn_json_endpoint(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Enhanced resume.  "}}]
        }))
        .await;
        let adapter =
            OpenAiAdapter::new(Client::new(), Some("k".to_string())).with_endpoint(endpoint);
        let result = adapter.enhance("X", "X").await.unwrap();
        assert_eq!(result, "Enhanced resume.");
    }

    #[tokio::test]
    async fn test_empty_content_is_an_empty_result_error() {
        let endpoint = spawn_json_endpoint(json!({"choices": []})).await;
        let adapter =
            OpenAiAdapter::new(Client::new(), Some("k".to_string())).with_endpoint(endpoint);
        let err = adapter.enhance("X", "X").await.unwrap_err();
        assert!(matches!(err, EnhanceError::Empty(Backend::OpenAi)));
    }
}
