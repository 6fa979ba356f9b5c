use super::dto::TtsRequest;
use super::error::TtsServiceError;
use super::language::{build_detector, detect_language, LanguageCode, AUTO_DETECT};
use super::pitch::{
    is_valid_pitch_factor, parse_pitch_classification, select_pitch, MAX_PITCH_FACTOR,
    MIN_PITCH_FACTOR, NEUTRAL_PITCH_FACTOR, PITCH_CLASSIFICATION_PROMPT,
};
use crate::domain::shared::{resolve_model, validate_generation_params};
use crate::infrastructure::repositories::{
    AudioFileRepository, CompletionRequest, LanguageModelRepository, TokenUsage, TtsRepository,
};
use async_trait::async_trait;
use html2text::from_read;
use lingua::LanguageDetector;
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Longest text accepted on the TTS endpoints, in characters
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Whether the pipeline produces audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    /// Follow the request's `return_audio` flag
    AsRequested,
    /// Always synthesize (the raw audio endpoint)
    Always,
}

#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct TtsSynthesisResult {
    pub original_text: String,
    pub processed_text: String,
    pub language: LanguageCode,
    pub pitch_factor: f64,
    pub usage: Option<TokenUsage>,
    pub audio: Option<SynthesizedAudio>,
}

#[derive(Debug, Clone)]
pub struct TextProcessingResult {
    pub model: String,
    pub original_text: String,
    pub processed_text: String,
    pub language: LanguageCode,
    pub usage: TokenUsage,
}

pub struct TtsService {
    llm_repo: Arc<dyn LanguageModelRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    audio_repo: Arc<AudioFileRepository>,
    default_model: String,
    language_detector: LanguageDetector,
}

impl TtsService {
    pub fn new(
        llm_repo: Arc<dyn LanguageModelRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        audio_repo: Arc<AudioFileRepository>,
        default_model: String,
    ) -> Self {
        Self {
            llm_repo,
            tts_repo,
            audio_repo,
            default_model,
            language_detector: build_detector(),
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Run the speech pipeline
    ///
    /// This operation:
    /// - Validates the request
    /// - Optionally rewrites the text with the language model
    /// - Chooses the pitch factor
    /// - Synthesizes and stores audio when requested
    async fn synthesize(
        &self,
        request: TtsRequest,
        mode: AudioMode,
    ) -> Result<TtsSynthesisResult, TtsServiceError>;

    /// Rewrite text with the language model only, no audio
    async fn process_text(
        &self,
        request: TtsRequest,
    ) -> Result<TextProcessingResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: TtsRequest,
        mode: AudioMode,
    ) -> Result<TtsSynthesisResult, TtsServiceError> {
        let (language, model) = self.validate(&request)?;
        let want_audio = mode == AudioMode::Always || request.return_audio;

        tracing::info!(
            text_length = request.text.len(),
            language = %language,
            use_mistral = request.use_mistral,
            optimize_pitch = request.optimize_pitch,
            want_audio = want_audio,
            "TTS request"
        );

        // 1. Text rewrite and pitch choice are independent upstream calls
        let (processed, pitch_factor) = tokio::join!(
            self.rewrite_if_requested(&request, &model),
            self.choose_pitch(&request, &model)
        );
        let (processed_text, usage) = processed?;

        if !want_audio {
            return Ok(TtsSynthesisResult {
                original_text: request.text,
                processed_text,
                language,
                pitch_factor,
                usage,
                audio: None,
            });
        }

        // 2. Normalize what the speech engine will read
        let speech_text = clean_text(&processed_text);
        if speech_text.is_empty() {
            return Err(TtsServiceError::Invalid(
                "Text contains nothing to synthesize".to_string(),
            ));
        }

        // 3. Synthesize and persist
        let data = self
            .tts_repo
            .synthesize(&speech_text, language, pitch_factor)
            .await?;
        let stored = self
            .audio_repo
            .save(&data, self.tts_repo.file_extension())
            .await?;

        tracing::info!(
            filename = %stored.filename,
            audio_size_bytes = stored.size_bytes,
            pitch_factor = pitch_factor,
            "Audio generated"
        );

        Ok(TtsSynthesisResult {
            original_text: request.text,
            processed_text,
            language,
            pitch_factor,
            usage,
            audio: Some(SynthesizedAudio {
                filename: stored.filename,
                content_type: self.tts_repo.content_type(),
                data,
            }),
        })
    }

    async fn process_text(
        &self,
        request: TtsRequest,
    ) -> Result<TextProcessingResult, TtsServiceError> {
        let (language, model) = self.validate(&request)?;

        let completion = self
            .llm_repo
            .complete(CompletionRequest {
                model,
                system_prompt: None,
                prompt: request.text.clone(),
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            })
            .await?;

        Ok(TextProcessingResult {
            model: completion.model,
            original_text: request.text,
            processed_text: completion.content,
            language,
            usage: completion.usage,
        })
    }
}

impl TtsService {
    /// Check the request and resolve its language and model
    fn validate(&self, request: &TtsRequest) -> Result<(LanguageCode, String), TtsServiceError> {
        if request.text.trim().is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }

        let char_count = request.text.chars().count();
        if char_count > MAX_TEXT_LENGTH {
            return Err(TtsServiceError::TooLarge(format!(
                "Text must be {} characters or less, got {}",
                MAX_TEXT_LENGTH, char_count
            )));
        }

        if let Some(factor) = request.pitch_factor {
            if !is_valid_pitch_factor(factor) {
                return Err(TtsServiceError::Invalid(format!(
                    "pitch_factor must be between {} and {}, got {}",
                    MIN_PITCH_FACTOR, MAX_PITCH_FACTOR, factor
                )));
            }
        }

        validate_generation_params(request.temperature, request.max_tokens)
            .map_err(TtsServiceError::Invalid)?;
        let model = resolve_model(request.model.as_deref(), &self.default_model)
            .map_err(TtsServiceError::Invalid)?;

        let language = self.resolve_language(&request.lang, &request.text)?;

        Ok((language, model))
    }

    fn resolve_language(&self, lang: &str, text: &str) -> Result<LanguageCode, TtsServiceError> {
        if lang.trim().eq_ignore_ascii_case(AUTO_DETECT) {
            let detected = detect_language(&self.language_detector, text);
            tracing::info!(language_detected = %detected, "Language detected for TTS synthesis");
            return Ok(detected);
        }

        LanguageCode::from_code(lang).ok_or_else(|| {
            let supported: Vec<&str> = LanguageCode::ALL.iter().map(|l| l.as_str()).collect();
            TtsServiceError::Invalid(format!(
                "Unsupported language '{}'. Supported: {}, or '{}'",
                lang,
                supported.join(", "),
                AUTO_DETECT
            ))
        })
    }

    async fn rewrite_if_requested(
        &self,
        request: &TtsRequest,
        model: &str,
    ) -> Result<(String, Option<TokenUsage>), TtsServiceError> {
        if !request.use_mistral {
            return Ok((request.text.clone(), None));
        }

        let completion = self
            .llm_repo
            .complete(CompletionRequest {
                model: model.to_string(),
                system_prompt: None,
                prompt: request.text.clone(),
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            })
            .await?;

        Ok((completion.content, Some(completion.usage)))
    }

    /// Explicit factor first; otherwise the language model (when enabled) or
    /// the punctuation heuristic decides. Never fails.
    async fn choose_pitch(&self, request: &TtsRequest, model: &str) -> f64 {
        match (request.pitch_factor, request.optimize_pitch) {
            (Some(_), _) => select_pitch(&request.text, request.pitch_factor),
            (None, false) => NEUTRAL_PITCH_FACTOR,
            (None, true) if request.use_mistral => {
                match self.classify_pitch(&request.text, model).await {
                    Some(factor) => factor,
                    None => select_pitch(&request.text, None),
                }
            }
            (None, true) => select_pitch(&request.text, None),
        }
    }

    async fn classify_pitch(&self, text: &str, model: &str) -> Option<f64> {
        let result = self
            .llm_repo
            .complete(CompletionRequest {
                model: model.to_string(),
                system_prompt: Some(PITCH_CLASSIFICATION_PROMPT.to_string()),
                prompt: text.to_string(),
                temperature: 0.0,
                max_tokens: 10,
            })
            .await;

        match result {
            Ok(completion) => {
                let factor = parse_pitch_classification(&completion.content);
                if factor.is_none() {
                    tracing::warn!(
                        reply = %completion.content,
                        "Pitch classification reply had no number, using heuristic"
                    );
                }
                factor
            }
            Err(e) => {
                tracing::warn!(error = %e, "Pitch classification failed, using heuristic");
                None
            }
        }
    }
}

/// Clean text by removing HTML tags and URLs and normalizing whitespace
pub fn clean_text(text: &str) -> String {
    static URL_PATTERN: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE_PATTERN: OnceLock<Regex> = OnceLock::new();

    let plain_text = if text.contains('<') {
        from_read(text.as_bytes(), usize::MAX)
    } else {
        text.to_string()
    };

    let url_pattern =
        URL_PATTERN.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is valid"));
    let without_urls = url_pattern.replace_all(&plain_text, "");

    let whitespace_pattern =
        WHITESPACE_PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
    let normalized = whitespace_pattern.replace_all(&without_urls, " ");

    normalized.trim().to_string()
}
