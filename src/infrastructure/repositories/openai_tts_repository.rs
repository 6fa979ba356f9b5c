use super::tts_repository::TtsRepository;
use super::UpstreamError;
use crate::domain::tts::{get_voice_for_language, LanguageCode};
use crate::infrastructure::audio;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

const PROVIDER: &str = "tts";

/// OpenAI has a limit of 4096 characters per request
const MAX_INPUT_LENGTH: usize = 4096;

/// Speech synthesis through any OpenAI-compatible `/audio/speech` endpoint
/// (OpenAI itself, Kokoro-FastAPI, ...). Audio is requested as raw PCM so the
/// pitch factor can be applied before the WAV container is written.
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    default_voice: String,
    sample_rate: u32,
    timeout: Duration,
}

impl OpenAiTtsRepository {
    pub fn new(
        client: Arc<Client<OpenAIConfig>>,
        model: String,
        default_voice: String,
        sample_rate: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            model,
            default_voice,
            sample_rate,
            timeout,
        }
    }

    /// Build the SDK client for a custom API base
    pub fn client_for(api_base: &str, api_key: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_base(api_base.trim_end_matches('/'))
            .with_api_key(api_key);
        Client::with_config(config)
    }

    fn voice_for(&self, language: LanguageCode) -> String {
        if self.default_voice.is_empty() {
            get_voice_for_language(language).to_string()
        } else {
            self.default_voice.clone()
        }
    }

    /// Call the speech API for raw 16-bit PCM
    async fn call_speech_api(&self, text: &str, voice: &str) -> Result<Vec<u8>, UpstreamError> {
        tracing::info!(
            model = %self.model,
            voice = voice,
            text_length = text.len(),
            "Calling speech API"
        );

        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let voice_enum = match voice.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => Voice::Alloy,
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice: voice_enum,
            response_format: Some(SpeechResponseFormat::Pcm),
            speed: None,
        };

        let response = tokio::time::timeout(self.timeout, self.client.audio().speech(request))
            .await
            .map_err(|_| UpstreamError::Timeout {
                provider: PROVIDER,
                after: self.timeout,
            })?
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %self.model,
                    voice = voice,
                    text_length = text.len(),
                    "Speech API call failed"
                );
                map_openai_error(e)
            })?;

        Ok(response.bytes.to_vec())
    }
}

fn map_openai_error(error: OpenAIError) -> UpstreamError {
    match error {
        OpenAIError::Reqwest(e) => UpstreamError::Unavailable {
            provider: PROVIDER,
            message: e.to_string(),
        },
        OpenAIError::ApiError(api) => {
            // The SDK drops the HTTP status; recover the common classes from the error type
            let status = match api.r#type.as_deref() {
                Some("invalid_request_error") => 400,
                Some("insufficient_quota") | Some("rate_limit_exceeded") => 429,
                Some("authentication_error") => 401,
                _ => 502,
            };
            UpstreamError::Rejected {
                provider: PROVIDER,
                status,
                message: api.message,
            }
        }
        OpenAIError::JSONDeserialize(e) => UpstreamError::InvalidResponse {
            provider: PROVIDER,
            message: e.to_string(),
        },
        OpenAIError::InvalidArgument(message) => UpstreamError::Rejected {
            provider: PROVIDER,
            status: 400,
            message,
        },
        other => UpstreamError::Unavailable {
            provider: PROVIDER,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
        pitch_factor: f64,
    ) -> Result<Vec<u8>, UpstreamError> {
        let start_time = std::time::Instant::now();

        if text.chars().count() > MAX_INPUT_LENGTH {
            return Err(UpstreamError::Rejected {
                provider: PROVIDER,
                status: 413,
                message: format!(
                    "speech input is limited to {} characters",
                    MAX_INPUT_LENGTH
                ),
            });
        }

        let voice = self.voice_for(language);

        tracing::info!(
            language = %language,
            voice = %voice,
            model = %self.model,
            pitch_factor = pitch_factor,
            text_length = text.len(),
            "Starting speech synthesis"
        );

        let pcm = self.call_speech_api(text, &voice).await?;
        let samples = audio::pcm16le_to_samples(&pcm);
        if samples.is_empty() {
            return Err(UpstreamError::InvalidResponse {
                provider: PROVIDER,
                message: "speech API returned no audio".to_string(),
            });
        }

        let shifted = audio::shift_pitch(&samples, pitch_factor);
        let wav = audio::encode_wav(&shifted, self.sample_rate).map_err(|e| {
            UpstreamError::InvalidResponse {
                provider: PROVIDER,
                message: format!("could not encode WAV: {}", e),
            }
        })?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = %voice,
            latency_ms = duration.as_millis(),
            characters_count = text.len(),
            pitch_factor = pitch_factor,
            audio_size_bytes = wav.len(),
            "TTS synthesis completed"
        );

        Ok(wav)
    }
}
