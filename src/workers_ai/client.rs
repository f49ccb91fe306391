//! HTTP client for the hosted Workers AI inference API

use crate::chat::{ChatMessage, ChatModel};
use crate::config::WorkersAiConfig;
use crate::embedding::EmbeddingProvider;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Inference API error types
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Envelope wrapping every `/ai/run` response
#[derive(Debug, Deserialize)]
struct RunEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// Output of a text-embedding model
#[derive(Debug, Deserialize)]
struct EmbeddingOutput {
    #[serde(default)]
    data: Vec<Vec<f32>>,
}

/// Workers AI client
///
/// One client is shared by all requests; it holds no per-request state.
pub struct WorkersAiClient {
    http: Client,
    base_url: String,
    account_id: String,
    api_token: Option<SecretString>,
    embedding_model: String,
    chat_model: String,
}

impl WorkersAiClient {
    /// Create a new client from configuration
    pub fn new(config: WorkersAiConfig) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id,
            api_token: config.api_token,
            embedding_model: config.embedding_model,
            chat_model: config.chat_model,
        })
    }

    fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, model
        )
    }

    /// Run a model and return the `result` member of the response
    pub async fn run(&self, model: &str, input: &Value) -> Result<Value, InferenceError> {
        let url = self.run_url(model);
        debug!("Calling Workers AI model: {}", model);

        let mut req = self.http.post(&url).json(input);

        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(e.to_string())
            } else {
                InferenceError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Workers AI returned {} for {}", status, model);
            return Err(InferenceError::Upstream(format!(
                "Status {}: {}",
                status, error_text
            )));
        }

        let envelope: RunEnvelope = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            let messages: Vec<String> = envelope
                .errors
                .iter()
                .map(|m| match m.code {
                    Some(code) => format!("{} ({})", m.message, code),
                    None => m.message.clone(),
                })
                .collect();
            return Err(InferenceError::Upstream(messages.join("; ")));
        }

        envelope
            .result
            .ok_or_else(|| InferenceError::InvalidResponse("missing result".to_string()))
    }

    /// Embed a batch of texts, one vector per input in input order
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        let result = self
            .run(&self.embedding_model, &json!({ "text": texts }))
            .await?;

        let output: EmbeddingOutput = serde_json::from_value(result)
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(output.data)
    }

    /// Send a conversation to the chat model, returning its raw output
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<Value, InferenceError> {
        self.run(&self.chat_model, &json!({ "messages": messages }))
            .await
    }
}

#[async_trait]
impl EmbeddingProvider for WorkersAiClient {
    async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
        Ok(self.embed(texts).await?)
    }
}

#[async_trait]
impl ChatModel for WorkersAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> crate::error::Result<Value> {
        Ok(self.chat(messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::build_conversation;

    fn test_config(base_url: String) -> WorkersAiConfig {
        WorkersAiConfig {
            base_url,
            account_id: "acct".to_string(),
            api_token: Some(SecretString::new("token-123".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_url() {
        let client = WorkersAiClient::new(test_config(
            "https://api.example.com/client/v4/".to_string(),
        ))
        .unwrap();

        assert_eq!(
            client.run_url("@cf/baai/bge-base-en-v1.5"),
            "https://api.example.com/client/v4/accounts/acct/ai/run/@cf/baai/bge-base-en-v1.5"
        );
    }

    #[tokio::test]
    async fn test_embed_returns_vectors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/accounts/acct/ai/run/@cf/baai/bge-base-en-v1.5")
            .match_header("authorization", "Bearer token-123")
            .match_body(mockito::Matcher::Json(json!({ "text": ["the sky is blue"] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "result": { "shape": [1, 3], "data": [[0.1, 0.2, 0.3]] },
                    "success": true,
                    "errors": [],
                    "messages": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = WorkersAiClient::new(test_config(server.url())).unwrap();
        let vectors = client
            .embed(&["the sky is blue".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(vectors, vec![vec![0.1, 0.2, 0.3]]);
    }

    #[tokio::test]
    async fn test_embed_missing_data_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!({ "result": { "shape": [0] }, "success": true }).to_string())
            .create_async()
            .await;

        let client = WorkersAiClient::new(test_config(server.url())).unwrap();
        let vectors = client.embed(&["text".to_string()]).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn test_chat_returns_result_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/accounts/acct/ai/run/@cf/meta/llama-2-7b-chat-int8")
            .match_body(mockito::Matcher::Json(json!({
                "messages": [
                    { "role": "system", "content": "You are a friendly assistant" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .with_status(200)
            .with_body(
                json!({ "result": { "response": "Hi there!" }, "success": true }).to_string(),
            )
            .create_async()
            .await;

        let client = WorkersAiClient::new(test_config(server.url())).unwrap();
        let response = client
            .chat(&build_conversation(Some("hello".to_string())))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response, json!({ "response": "Hi there!" }));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = WorkersAiClient::new(test_config(server.url())).unwrap();
        let result = client.chat(&build_conversation(None)).await;

        match result {
            Err(InferenceError::Upstream(msg)) => assert!(msg.contains("boom")),
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "result": null,
                    "success": false,
                    "errors": [{ "code": 5007, "message": "No such model" }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = WorkersAiClient::new(test_config(server.url())).unwrap();
        let result = client.embed(&["text".to_string()]).await;

        match result {
            Err(InferenceError::Upstream(msg)) => assert_eq!(msg, "No such model (5007)"),
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = WorkersAiClient::new(test_config(server.url())).unwrap();
        let result = client.chat(&build_conversation(None)).await;
        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }
}
