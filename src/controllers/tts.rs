use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::tts::{
        supported_languages, AudioMode, LanguageInfo, MistralTextResponse, TtsRequest,
        TtsResponse, TtsService, TtsServiceApi,
    },
    error::{AppError, AppResult},
    infrastructure::http::audio_url,
};

/// Response for GET /api/v1/languages
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub success: bool,
    pub count: usize,
    pub languages: Vec<LanguageInfo>,
}

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/v1/tts - Process text and optionally generate an audio file
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<Json<TtsResponse>> {
        let result = controller
            .tts_service
            .synthesize(request, AudioMode::AsRequested)
            .await?;

        let audio_file = result.audio.map(|audio| audio.filename);
        let audio_url = audio_file.as_deref().map(audio_url);

        Ok(Json(TtsResponse {
            success: true,
            text: result.original_text,
            processed_text: result.processed_text,
            lang: result.language.to_string(),
            pitch_factor: result.pitch_factor,
            audio_file,
            audio_url,
            usage: result.usage,
        }))
    }

    /// POST /api/v1/tts/audio - Same pipeline, responds with the audio itself
    pub async fn synthesize_audio(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let result = controller
            .tts_service
            .synthesize(request, AudioMode::Always)
            .await?;

        let audio = result
            .audio
            .ok_or_else(|| AppError::Internal("audio was not generated".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(audio.content_type),
        );
        headers.insert(
            header::CONTENT_DISPOSITION,
            header_value(&format!("inline; filename=\"{}\"", audio.filename))?,
        );
        headers.insert("X-Audio-File", header_value(&audio.filename)?);
        headers.insert("X-Pitch-Factor", header_value(&result.pitch_factor.to_string())?);
        headers.insert("X-Language", header_value(result.language.as_str())?);
        // Header values must be visible ASCII
        headers.insert(
            "X-Processed-Text",
            header_value(&urlencoding::encode(&result.processed_text))?,
        );

        Ok((StatusCode::OK, headers, Body::from(audio.data)))
    }

    /// POST /api/v1/tts/mistral - Language-model processing only
    pub async fn process_text(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<Json<MistralTextResponse>> {
        let result = controller.tts_service.process_text(request).await?;

        Ok(Json(MistralTextResponse {
            success: true,
            model: result.model,
            original_text: result.original_text,
            processed_text: result.processed_text,
            lang: result.language.to_string(),
            usage: result.usage,
        }))
    }

    /// GET /api/v1/languages - Supported languages
    pub async fn list_languages() -> Json<LanguagesResponse> {
        let languages = supported_languages();
        Json(LanguagesResponse {
            success: true,
            count: languages.len(),
            languages,
        })
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("invalid header value: {}", e)))
}
