use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::{GenerationRequest, SummaryProvider};

const BASE_URL: &str = "https://api.anthropic.com";
const PROVIDER: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider for the market summary.
///
/// - **Requires**: API key, sent in the `x-api-key` header.
/// - **Endpoint**: `POST /v1/messages` with a single user message.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(60));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// JSON body for a Messages API call.
    pub fn request_body(request: &GenerationRequest) -> serde_json::Value {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };
        // Serializing plain strings and integers cannot fail.
        serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
    }

    /// Extract the first content segment's text. Blank text is an error.
    pub fn parse_message(body: &str) -> Result<String, CoreError> {
        let resp: MessagesResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse message response: {e}"),
        })?;

        match resp.content.into_iter().next().and_then(|block| block.text) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CoreError::EmptyResponse {
                provider: PROVIDER.into(),
            }),
        }
    }

    /// Turn an error body into a message, if it has the documented shape.
    pub fn parse_error(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .map(|e| format!("{}: {}", e.error.kind, e.error.message))
    }
}

// ── Anthropic API request/response types ────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SummaryProvider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, CoreError> {
        let url = format!("{}/v1/messages", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(match Self::parse_error(&body) {
                Some(message) => CoreError::Api {
                    provider: PROVIDER.into(),
                    message: format!("status {}: {message}", status.as_u16()),
                },
                None => CoreError::Http {
                    provider: PROVIDER.into(),
                    status: status.as_u16(),
                },
            });
        }

        Self::parse_message(&body)
    }
}
