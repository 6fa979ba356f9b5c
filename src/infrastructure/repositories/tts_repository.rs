use super::UpstreamError;
use crate::domain::tts::LanguageCode;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying speech engine (OpenAI, Kokoro-FastAPI, etc.)
///
/// Implementations are responsible for:
/// - Provider-specific voice selection
/// - Applying the pitch factor to the synthesized waveform
/// - Returning a self-contained audio file (WAV)
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech for a given language and pitch factor
    ///
    /// # Arguments
    /// * `text` - The normalized text to synthesize (no HTML, collapsed whitespace)
    /// * `language` - The target language for synthesis
    /// * `pitch_factor` - Multiplier for the fundamental frequency, 1.0 = unmodified
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
        pitch_factor: f64,
    ) -> Result<Vec<u8>, UpstreamError>;

    /// MIME type of the bytes returned by `synthesize`
    fn content_type(&self) -> &'static str {
        "audio/wav"
    }

    /// File extension used when persisting synthesized audio
    fn file_extension(&self) -> &'static str {
        "wav"
    }
}
