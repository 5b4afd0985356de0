//! Azure OpenAI chat-completions backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatBackend, UpstreamError};
use crate::config::Config;

const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if the model produced any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct AzureError {
    error: AzureErrorBody,
}

#[derive(Debug, Deserialize)]
struct AzureErrorBody {
    message: String,
}

/// Talks to one Azure OpenAI deployment.
pub struct AzureOpenAiClient {
    client: Client,
    url: String,
    api_key: String,
}

impl AzureOpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: completions_url(
                &config.azure_openai_endpoint,
                &config.azure_openai_deployment_name,
                &config.azure_openai_api_version,
            ),
            api_key: config.azure_openai_api_key.clone(),
        })
    }
}

fn completions_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

/// Maps a non-success HTTP status to its retry classification.
fn classify_status(status: StatusCode, body: &str) -> UpstreamError {
    let message = serde_json::from_str::<AzureError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        UpstreamError::RateLimited(message)
    } else if status.is_server_error() {
        UpstreamError::ServerError {
            status: status.as_u16(),
            message,
        }
    } else {
        UpstreamError::Other(format!("status {}: {message}", status.as_u16()))
    }
}

fn classify_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(CONNECT_TIMEOUT)
    } else {
        UpstreamError::Other(err.to_string())
    }
}

#[async_trait]
impl ChatBackend for AzureOpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Other(format!("malformed completion body: {e}")))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Azure OpenAI call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .text()
            .map(String::from)
            .ok_or_else(|| UpstreamError::Other("model returned empty content".to_string()))
    }
}
