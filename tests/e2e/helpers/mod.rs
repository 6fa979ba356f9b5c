use axum::Router;
use mistral_tts_api::controllers::{audio::AudioController, chat::ChatController, tts::TtsController};
use mistral_tts_api::domain::{chat::ChatService, tts::TtsService};
use mistral_tts_api::infrastructure::config::Config;
use mistral_tts_api::infrastructure::http::create_router;
use mistral_tts_api::infrastructure::repositories::AudioFileRepository;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;


use api_client::TestClient;
use fakes::{FakeLanguageModel, FakeSynthesizer};

/// Collaborators and settings a test server is built with
pub struct TestSetup {
    pub llm: Arc<FakeLanguageModel>,
    pub tts: Arc<FakeSynthesizer>,
    pub mistral_api_key: String,
    pub models_cache_ttl: Duration,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            llm: Arc::new(FakeLanguageModel::default()),
            tts: Arc::new(FakeSynthesizer::default()),
            mistral_api_key: "test-key".to_string(),
            models_cache_ttl: Duration::from_secs(300),
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    pub llm: Arc<FakeLanguageModel>,
    pub tts: Arc<FakeSynthesizer>,
    pub audio_dir: PathBuf,
    server: JoinHandle<()>,
}

impl TestContext {
    pub async fn start(setup: TestSetup) -> Self {
        let audio_dir = std::env::temp_dir().join(format!("mistral-tts-e2e-{}", Uuid::new_v4()));

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            mistral_api_key: setup.mistral_api_key,
            audio_dir: audio_dir.clone(),
            models_cache_ttl_secs: setup.models_cache_ttl.as_secs(),
            ..Config::default()
        };

        let app = create_app_with_fakes(config, setup.llm.clone(), setup.tts.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: TestClient::new(&base_url),
            llm: setup.llm,
            tts: setup.tts,
            audio_dir,
            server,
        }
    }

    /// Generated file names currently on disk
    #[allow(dead_code)]
    pub fn stored_files(&self) -> Vec<String> {
        match std::fs::read_dir(&self.audio_dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
        let _ = std::fs::remove_dir_all(&self.audio_dir);
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        TestContext::start(TestSetup::default())
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Server and audio directory are released via Drop
        }
    }
}

fn create_app_with_fakes(
    config: Config,
    llm: Arc<FakeLanguageModel>,
    tts: Arc<FakeSynthesizer>,
) -> Router {
    let config = Arc::new(config);
    let audio_repo = Arc::new(AudioFileRepository::new(config.audio_dir.clone()));

    let tts_service = Arc::new(TtsService::new(
        llm.clone(),
        tts,
        audio_repo.clone(),
        config.default_model.clone(),
    ));
    let chat_service = Arc::new(ChatService::new(
        llm,
        config.default_model.clone(),
        Duration::from_secs(config.models_cache_ttl_secs),
    ));

    let tts_controller = Arc::new(TtsController::new(tts_service));
    let chat_controller = Arc::new(ChatController::new(chat_service));
    let audio_controller = Arc::new(AudioController::new(audio_repo));

    create_router(config, tts_controller, chat_controller, audio_controller)
}
