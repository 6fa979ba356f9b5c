use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    infrastructure::repositories::AudioFileRepository,
};

pub struct AudioController {
    audio_repo: Arc<AudioFileRepository>,
}

impl AudioController {
    pub fn new(audio_repo: Arc<AudioFileRepository>) -> Self {
        Self { audio_repo }
    }

    /// GET /api/v1/audio/{filename} - Serve a generated audio file
    pub async fn get_audio(
        State(controller): State<Arc<AudioController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let data = controller
            .audio_repo
            .read(&filename)
            .await
            .map_err(|e| AppError::Internal(format!("failed to read audio file: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Audio file '{}' does not exist", filename)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(&filename)),
        );

        Ok((StatusCode::OK, headers, Body::from(data)))
    }
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "mp3" => "audio/mpeg",
        Some(ext) if ext == "ogg" || ext == "opus" => "audio/ogg",
        Some(ext) if ext == "flac" => "audio/flac",
        _ => "audio/wav",
    }
}
