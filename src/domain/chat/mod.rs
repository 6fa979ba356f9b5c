pub mod error;
pub mod service;

pub use error::ChatServiceError;
pub use service::{ChatReply, ChatService, ChatServiceApi};

use serde::{Deserialize, Serialize};

use crate::domain::tts::dto::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::infrastructure::repositories::{ModelInfo, TokenUsage};

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Request for POST /api/v1/chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Response for POST /api/v1/chat
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub model: String,
    pub message: String,
    pub response: String,
    pub usage: TokenUsage,
}

/// Response for GET /api/v1/models
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub success: bool,
    pub count: usize,
    pub models: Vec<ModelInfo>,
}

impl From<Vec<ModelInfo>> for ModelsResponse {
    fn from(models: Vec<ModelInfo>) -> Self {
        Self {
            success: true,
            count: models.len(),
            models,
        }
    }
}
