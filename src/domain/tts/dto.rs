use serde::{Deserialize, Serialize};

use crate::infrastructure::repositories::TokenUsage;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_LANGUAGE: &str = "en";

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_lang() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_true() -> bool {
    true
}

/// Request for POST /api/v1/tts, /api/v1/tts/audio and /api/v1/tts/mistral
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    /// Language model to use; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_true")]
    pub use_mistral: bool,
    #[serde(default)]
    pub return_audio: bool,
    #[serde(default = "default_true")]
    pub optimize_pitch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_factor: Option<f64>,
}

impl TtsRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            lang: default_lang(),
            use_mistral: true,
            return_audio: false,
            optimize_pitch: true,
            pitch_factor: None,
        }
    }
}

/// Response for POST /api/v1/tts
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsResponse {
    pub success: bool,
    pub text: String,
    pub processed_text: String,
    pub lang: String,
    pub pitch_factor: f64,
    pub audio_file: Option<String>,
    pub audio_url: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Response for POST /api/v1/tts/mistral
#[derive(Debug, Serialize, Deserialize)]
pub struct MistralTextResponse {
    pub success: bool,
    pub model: String,
    pub original_text: String,
    pub processed_text: String,
    pub lang: String,
    pub usage: TokenUsage,
}
