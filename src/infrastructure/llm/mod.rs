//! Chat-completion backend for the LLM agent
//!
//! OpenAI-compatible HTTP client with token-bucket rate limiting and
//! exponential-backoff retries of transient errors.

pub mod client;
pub mod errors;
pub mod rate_limiter;
pub mod retry;
pub mod types;

pub use client::{ChatClientConfig, ChatCompletionClient};
pub use errors::LlmApiError;
pub use rate_limiter::RateLimiter;
pub use retry::RetryPolicy;
pub use types::{CompletionRequest, CompletionResponse};
