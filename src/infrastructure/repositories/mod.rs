pub mod audio_file_repository;
pub mod llm_repository;
pub mod mistral_repository;
pub mod openai_tts_repository;
pub mod tts_repository;
pub mod upstream_error;

pub use audio_file_repository::{spawn_retention_task, AudioFileRepository, StoredAudio};
pub use llm_repository::{
    Completion, CompletionRequest, LanguageModelRepository, ModelInfo, TokenUsage,
};
pub use mistral_repository::MistralRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use tts_repository::TtsRepository;
pub use upstream_error::UpstreamError;
