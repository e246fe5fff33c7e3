use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::ChatMessage;

/// Request to a chat-completion backend.
///
/// # Example
/// ```
/// use tsc_agent::domain::models::ChatMessage;
/// use tsc_agent::domain::ports::ChatRequest;
///
/// let request = ChatRequest {
///     model: "gpt-4".to_string(),
///     messages: vec![
///         ChatMessage::system("You control a traffic light."),
///         ChatMessage::user("Which phase?"),
///     ],
///     max_tokens: 3072,
///     temperature: Some(0.7),
/// };
/// assert_eq!(request.messages.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,

    /// Ordered role/content pairs
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate in the reply
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Free-text reply of the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text of the first choice
    pub content: String,

    /// Model that produced the reply, as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Port for chat-completion backends.
///
/// Implementations own transport concerns (rate limiting, transient-error
/// retries). Callers see one request, one reply or one error.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the conversation and return the reply text.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}
