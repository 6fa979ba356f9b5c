use super::UpstreamError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Single-turn completion request sent to the language model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Model that actually served the request, as reported by the provider
    pub model: String,
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub object: String,
}

/// Repository for the remote language model (Mistral).
/// Conversations are stateless: every call carries the whole prompt.
#[async_trait]
pub trait LanguageModelRepository: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, UpstreamError>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>, UpstreamError>;
}
