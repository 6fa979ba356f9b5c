use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Mistral
    pub mistral_api_key: String,
    pub mistral_api_base: String,
    pub default_model: String,
    // Speech engine (OpenAI-compatible)
    pub tts_api_base: String,
    pub tts_api_key: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub tts_sample_rate: u32,
    // Generated audio
    pub audio_dir: PathBuf,
    pub audio_retention_secs: u64,
    pub audio_cleanup_interval_secs: u64,
    // Upstream calls
    pub upstream_timeout_secs: u64,
    pub models_cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            mistral_api_key: String::new(),
            mistral_api_base: "https://api.mistral.ai".to_string(),
            default_model: "mistral-small-latest".to_string(),
            tts_api_base: "https://api.openai.com/v1".to_string(),
            tts_api_key: String::new(),
            tts_model: "tts-1".to_string(),
            tts_voice: String::new(),
            tts_sample_rate: 24_000,
            audio_dir: PathBuf::from("audio_files"),
            audio_retention_secs: 24 * 60 * 60,
            audio_cleanup_interval_secs: 10 * 60,
            upstream_timeout_secs: 60,
            models_cache_ttl_secs: 5 * 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            mistral_api_key: env::var("MISTRAL_API_KEY").unwrap_or_default(),
            mistral_api_base: env::var("MISTRAL_API_BASE").unwrap_or(defaults.mistral_api_base),
            default_model: env::var("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            tts_api_base: env::var("TTS_API_BASE").unwrap_or(defaults.tts_api_base),
            tts_api_key: env::var("TTS_API_KEY").unwrap_or_default(),
            tts_model: env::var("TTS_MODEL").unwrap_or(defaults.tts_model),
            tts_voice: env::var("TTS_VOICE").unwrap_or_default(),
            tts_sample_rate: parse_var("TTS_SAMPLE_RATE", defaults.tts_sample_rate)?,
            audio_dir: env::var("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_dir),
            audio_retention_secs: parse_var("AUDIO_RETENTION_SECS", defaults.audio_retention_secs)?,
            audio_cleanup_interval_secs: parse_var(
                "AUDIO_CLEANUP_INTERVAL_SECS",
                defaults.audio_cleanup_interval_secs,
            )?,
            upstream_timeout_secs: parse_var(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            models_cache_ttl_secs: parse_var(
                "MODELS_CACHE_TTL_SECS",
                defaults.models_cache_ttl_secs,
            )?,
        };

        if config.tts_sample_rate == 0 {
            return Err("TTS_SAMPLE_RATE must be greater than zero".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn has_mistral_api_key(&self) -> bool {
        !self.mistral_api_key.trim().is_empty()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn audio_retention(&self) -> Duration {
        Duration::from_secs(self.audio_retention_secs)
    }

    pub fn audio_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.audio_cleanup_interval_secs)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{} has an invalid value '{}': {}", name, raw, e).into()),
        Err(_) => Ok(default),
    }
}
