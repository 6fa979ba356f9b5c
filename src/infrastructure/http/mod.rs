pub mod request_id;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{audio::AudioController, chat::ChatController, health, tts::TtsController};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Prefix of every versioned API route
pub const API_PREFIX: &str = "/api/v1";

/// Public URL of a generated audio file
pub fn audio_url(filename: &str) -> String {
    format!("{}/audio/{}", API_PREFIX, filename)
}

/// Build the application router with all routes configured
pub fn create_router(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    chat_controller: Arc<ChatController>,
    audio_controller: Arc<AudioController>,
) -> Router {
    let tts_routes = Router::new()
        .route("/tts", post(TtsController::synthesize))
        .route("/tts/audio", post(TtsController::synthesize_audio))
        .route("/tts/mistral", post(TtsController::process_text))
        .route("/languages", get(TtsController::list_languages))
        .with_state(tts_controller);

    let chat_routes = Router::new()
        .route("/chat", post(ChatController::chat))
        .route("/models", get(ChatController::list_models))
        .with_state(chat_controller);

    let audio_routes = Router::new()
        .route("/audio/:filename", get(AudioController::get_audio))
        .with_state(audio_controller);

    let api_routes = Router::new()
        .merge(tts_routes)
        .merge(chat_routes)
        .merge(audio_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health))
        .with_state(config)
        .nest(API_PREFIX, api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(cors),
        )
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
