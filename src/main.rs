use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use mistral_tts_api::controllers::{audio::AudioController, chat::ChatController, tts::TtsController};
use mistral_tts_api::domain::{chat::ChatService, tts::TtsService};
use mistral_tts_api::infrastructure::config::{Config, LogFormat};
use mistral_tts_api::infrastructure::http::{create_router, start_http_server};
use mistral_tts_api::infrastructure::repositories::{
    spawn_retention_task, AudioFileRepository, LanguageModelRepository, MistralRepository,
    OpenAiTtsRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Mistral TTS API v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.port
    );

    if !config.has_mistral_api_key() {
        tracing::warn!("MISTRAL_API_KEY is not set; language-model endpoints will answer 503");
    }

    tracing::info!(
        tts_api_base = %config.tts_api_base,
        tts_model = %config.tts_model,
        mistral_api_base = %config.mistral_api_base,
        audio_dir = %config.audio_dir.display(),
        upstream_timeout_secs = config.upstream_timeout_secs,
        "Collaborator configuration"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let llm_repo: Arc<dyn LanguageModelRepository> = Arc::new(MistralRepository::new(
        config.mistral_api_key.clone(),
        config.mistral_api_base.clone(),
        config.upstream_timeout(),
    )?);

    let speech_client = OpenAiTtsRepository::client_for(&config.tts_api_base, &config.tts_api_key);
    let tts_repo: Arc<dyn TtsRepository> = Arc::new(OpenAiTtsRepository::new(
        Arc::new(speech_client),
        config.tts_model.clone(),
        config.tts_voice.clone(),
        config.tts_sample_rate,
        config.upstream_timeout(),
    ));

    let audio_repo = Arc::new(AudioFileRepository::new(config.audio_dir.clone()));
    audio_repo.init().await?;

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(
        llm_repo.clone(),
        tts_repo,
        audio_repo.clone(),
        config.default_model.clone(),
    ));
    let chat_service = Arc::new(ChatService::new(
        llm_repo,
        config.default_model.clone(),
        std::time::Duration::from_secs(config.models_cache_ttl_secs),
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let chat_controller = Arc::new(ChatController::new(chat_service));
    let audio_controller = Arc::new(AudioController::new(audio_repo.clone()));

    // 4. Background eviction of generated audio
    let retention_task = spawn_retention_task(
        audio_repo,
        config.audio_retention(),
        config.audio_cleanup_interval(),
    );

    // Start HTTP server with all routes
    let app = create_router(config.clone(), tts_controller, chat_controller, audio_controller);
    let result = start_http_server(config, app).await;

    retention_task.abort();
    result
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "mistral_tts_api=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "mistral_tts_api=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
