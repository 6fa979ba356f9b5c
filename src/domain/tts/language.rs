use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// Value of `lang` that asks for detection instead of a fixed language
pub const AUTO_DETECT: &str = "auto";

/// ISO 639-1 language codes supported by the TTS system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

/// Entry of GET /api/v1/languages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub voice: String,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::English,
        LanguageCode::Spanish,
        LanguageCode::French,
        LanguageCode::German,
        LanguageCode::Italian,
        LanguageCode::Portuguese,
    ];

    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::French => "French",
            LanguageCode::German => "German",
            LanguageCode::Italian => "Italian",
            LanguageCode::Portuguese => "Portuguese",
        }
    }

    /// Parse an ISO 639-1 code, case-insensitive. Region suffixes ("en-US") are ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        LanguageCode::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(primary))
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Self {
        match language {
            Language::English => LanguageCode::English,
            Language::Spanish => LanguageCode::Spanish,
            Language::French => LanguageCode::French,
            Language::German => LanguageCode::German,
            Language::Italian => LanguageCode::Italian,
            Language::Portuguese => LanguageCode::Portuguese,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Select the OpenAI-compatible voice for a language
/// Based on voice characteristics that suit each language
pub fn get_voice_for_language(language: LanguageCode) -> &'static str {
    match language {
        LanguageCode::English => "alloy",   // Neutral American accent
        LanguageCode::Spanish => "echo",    // Warm, clear for Spanish
        LanguageCode::French => "nova",     // Soft, suitable for French
        LanguageCode::German => "onyx",     // Clear, authoritative
        LanguageCode::Italian => "fable",   // Expressive for Italian
        LanguageCode::Portuguese => "shimmer", // Clear articulation
    }
}

/// Fixed catalogue served by GET /api/v1/languages
pub fn supported_languages() -> Vec<LanguageInfo> {
    LanguageCode::ALL
        .into_iter()
        .map(|language| LanguageInfo {
            code: language.as_str().to_string(),
            name: language.name().to_string(),
            voice: get_voice_for_language(language).to_string(),
        })
        .collect()
}

/// Build a detector restricted to the supported languages
pub fn build_detector() -> LanguageDetector {
    let languages: Vec<Language> = vec![
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
    ];
    LanguageDetectorBuilder::from_languages(&languages).build()
}

/// Detect the language of the given text
/// Falls back to English when detection is inconclusive
pub fn detect_language(detector: &LanguageDetector, text: &str) -> LanguageCode {
    match detector.detect_language_of(text) {
        Some(language) => LanguageCode::from_lingua(language),
        None => {
            tracing::warn!("Could not detect language, falling back to English");
            LanguageCode::English
        }
    }
}
