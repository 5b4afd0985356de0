/// LLM Client: the single gateway for all upstream model calls.
///
/// ARCHITECTURAL RULE: No other module may call the model backend directly.
/// Every call goes through `ModelGateway`, which owns the process-wide
/// concurrency limiter, the per-call timeout and the retry/backoff policy.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::AiSettings;

pub mod azure;
pub mod parser;
pub mod prompts;

use parser::ParseError;

/// Upper bound (exclusive) of the random jitter added to each backoff delay.
const MAX_JITTER: Duration = Duration::from_millis(500);

/// Failure of a single upstream call, classified where it happened.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("rate limited by upstream (429): {0}")]
    RateLimited(String),

    #[error("upstream server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream request failed: {0}")]
    Other(String),
}

impl UpstreamError {
    /// Only 429 and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::RateLimited(_) | UpstreamError::ServerError { .. }
        )
    }
}

/// Classification carried to the HTTP layer so it can pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    ServerError,
    Timeout,
    Other,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl LlmError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LlmError::Upstream(UpstreamError::RateLimited(_)) => FailureKind::RateLimited,
            LlmError::Upstream(UpstreamError::ServerError { .. }) => FailureKind::ServerError,
            LlmError::Upstream(UpstreamError::Timeout(_)) => FailureKind::Timeout,
            LlmError::Upstream(UpstreamError::Other(_)) | LlmError::Parse(_) => FailureKind::Other,
        }
    }
}

/// A chat-style completion backend: one system message, one user message, one text reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    /// `base * 2^attempt + jitter`, attempt counted from 0.
    pub fn backoff_delay(&self, attempt: u32, jitter: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor) + jitter
    }
}

impl From<&AiSettings> for RetryPolicy {
    fn from(settings: &AiSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: settings.retry_base,
            timeout: settings.request_timeout,
        }
    }
}

/// Result of the health probe against the upstream model.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The single model gateway shared by every request.
/// Cloning is cheap; clones share the backend and the limiter.
#[derive(Clone)]
pub struct ModelGateway {
    backend: Arc<dyn ChatBackend>,
    limiter: Arc<Semaphore>,
    policy: RetryPolicy,
}

impl ModelGateway {
    pub fn new(backend: Arc<dyn ChatBackend>, limiter: Arc<Semaphore>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            limiter,
            policy,
        }
    }

    /// Issues one completion under the concurrency limit.
    ///
    /// Retries 429 and 5xx with jittered exponential backoff. A timeout fails
    /// immediately, whatever the remaining retry budget. The limiter slot is
    /// held for the whole retry loop and released on every exit path.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, UpstreamError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| UpstreamError::Other("concurrency limiter closed".to_string()))?;

        let mut attempt = 0;
        loop {
            let outcome =
                tokio::time::timeout(self.policy.timeout, self.backend.complete(system, prompt))
                    .await;

            let err = match outcome {
                Ok(Ok(text)) => {
                    debug!("Upstream call succeeded on attempt {}", attempt + 1);
                    return Ok(text);
                }
                Ok(Err(UpstreamError::Timeout(after))) => {
                    warn!("Upstream call timed out after {after:?}; not retrying");
                    return Err(UpstreamError::Timeout(after));
                }
                Err(_) => {
                    warn!(
                        "Upstream call exceeded {:?} deadline; not retrying",
                        self.policy.timeout
                    );
                    return Err(UpstreamError::Timeout(self.policy.timeout));
                }
                Ok(Err(e)) => e,
            };

            if !err.is_retryable() || attempt >= self.policy.max_retries {
                return Err(err);
            }

            let jitter = rand::thread_rng().gen_range(Duration::ZERO..MAX_JITTER);
            let delay = self.policy.backoff_delay(attempt, jitter);
            warn!(
                "Upstream call attempt {} failed ({err}), retrying after {}ms...",
                attempt + 1,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Calls the model and decodes the JSON object embedded in its reply.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, LlmError> {
        let text = self.complete(system, prompt).await?;
        parser::extract_json(&text).map_err(|err| {
            let raw: String = err.raw().chars().take(200).collect();
            warn!("Model reply could not be decoded ({err}): {raw}");
            LlmError::from(err)
        })
    }

    /// Lightweight probe for `/health`. Single attempt, bounded by the call timeout,
    /// does not take a limiter slot.
    pub async fn connectivity_check(&self) -> ConnectivityReport {
        let call = self
            .backend
            .complete(prompts::HEALTH_CHECK_SYSTEM, prompts::HEALTH_CHECK_PROMPT);
        let result = match tokio::time::timeout(self.policy.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(self.policy.timeout)),
        };

        match result {
            Ok(reply) => ConnectivityReport {
                ok: true,
                reply: Some(reply.trim().to_string()),
                error: None,
            },
            Err(e) => ConnectivityReport {
                ok: false,
                reply: None,
                error: Some(e.to_string()),
            },
        }
    }
}
