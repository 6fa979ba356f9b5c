pub mod dto;
pub mod error;
pub mod language;
pub mod pitch;
pub mod service;

pub use dto::{MistralTextResponse, TtsRequest, TtsResponse};
pub use error::TtsServiceError;
pub use language::{get_voice_for_language, supported_languages, LanguageCode, LanguageInfo};
pub use pitch::select_pitch;
pub use service::{AudioMode, TtsService, TtsServiceApi, TtsSynthesisResult};
