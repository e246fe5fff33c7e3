use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::errors::LlmApiError;
use super::rate_limiter::RateLimiter;
use super::retry::RetryPolicy;
use super::types::{CompletionRequest, CompletionResponse};
use crate::domain::models::Config;
use crate::domain::ports::{ChatCompletion, ChatRequest, ChatResponse};

/// Configuration for the chat-completion HTTP client
#[derive(Clone)]
pub struct ChatClientConfig {
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
    pub burst_size: u32,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl fmt::Debug for ChatClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_second", &self.requests_per_second)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl From<&Config> for ChatClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.llm.base_url.clone(),
            api_key: config.llm.api_key.clone(),
            timeout_secs: config.llm.timeout_secs,
            requests_per_second: config.rate_limit.requests_per_second,
            burst_size: config.rate_limit.burst_size,
            max_retries: config.retry.max_retries,
            initial_backoff_ms: config.retry.initial_backoff_ms,
            max_backoff_ms: config.retry.max_backoff_ms,
        }
    }
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// HTTP client for OpenAI-compatible chat-completion servers
///
/// Features:
/// - Connection pooling and reuse (via reqwest::Client)
/// - Token bucket rate limiting
/// - Exponential backoff retry of transient errors
/// - Error classification (transient vs permanent)
pub struct ChatCompletionClient {
    http_client: ReqwestClient,
    endpoint: String,
    api_key: Option<String>,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
}

impl ChatCompletionClient {
    /// Create a client with custom configuration
    ///
    /// # Errors
    /// Fails when the underlying HTTP client cannot be built
    pub fn new(config: ChatClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
            rate_limiter: RateLimiter::new(config.requests_per_second, config.burst_size),
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one completion request, rate limited and retried
    #[instrument(skip(self, request), fields(model = %request.model, max_tokens = request.max_tokens))]
    pub async fn send(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmApiError> {
        self.rate_limiter.acquire().await;

        let result = self
            .retry_policy
            .execute(|| self.execute_request(&request))
            .await;

        match &result {
            Ok(response) => {
                if let Some(usage) = response.usage {
                    info!(
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "completion succeeded"
                    );
                } else {
                    info!("completion succeeded");
                }
            }
            Err(err) => error!(error = %err, "completion failed"),
        }

        result
    }

    /// Execute a single request (called by retry logic)
    async fn execute_request(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmApiError> {
        debug!(url = %self.endpoint, "POST");

        let mut builder = self
            .http_client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> Result<CompletionResponse, LlmApiError> {
        let status = response.status();
        debug!(%status, "response status");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            warn!(%status, body = %body, "API error");
            return Err(LlmApiError::from_status(status, body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ChatCompletion for ChatCompletionClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let response = self.send(CompletionRequest::from(request)).await?;
        let content = response
            .first_content()
            .ok_or(LlmApiError::EmptyReply)?
            .to_string();

        Ok(ChatResponse {
            content,
            model: response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ChatCompletionClient::new(ChatClientConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8000/v1/chat/completions");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ChatClientConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            ..ChatClientConfig::default()
        };
        let client = ChatCompletionClient::new(config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ChatClientConfig {
            api_key: Some("sk-secret-value".to_string()),
            ..ChatClientConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
