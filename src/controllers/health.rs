use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::Config;
use crate::infrastructure::http::API_PREFIX;

/// GET / - Service information
pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "name": "Mistral TTS API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "tts": format!("{}/tts", API_PREFIX),
            "tts_audio": format!("{}/tts/audio", API_PREFIX),
            "tts_mistral": format!("{}/tts/mistral", API_PREFIX),
            "chat": format!("{}/chat", API_PREFIX),
            "models": format!("{}/models", API_PREFIX),
            "languages": format!("{}/languages", API_PREFIX),
            "audio": format!("{}/audio/{{filename}}", API_PREFIX),
        }
    }))
}

/// GET /health - Unhealthy while the language model cannot be called
pub async fn health(State(config): State<Arc<Config>>) -> impl IntoResponse {
    if config.has_mistral_api_key() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "api_key_configured": true
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "api_key_configured": false,
                "message": "MISTRAL_API_KEY is not configured"
            })),
        )
    }
}
