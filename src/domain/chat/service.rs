use super::error::ChatServiceError;
use super::ChatRequest;
use crate::domain::shared::{resolve_model, validate_generation_params};
use crate::infrastructure::repositories::{
    CompletionRequest, LanguageModelRepository, ModelInfo, TokenUsage,
};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const MODELS_CACHE_KEY: &str = "models";

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub model: String,
    pub message: String,
    pub response: String,
    pub usage: TokenUsage,
}

pub struct ChatService {
    llm_repo: Arc<dyn LanguageModelRepository>,
    default_model: String,
    models_cache: Option<Cache<&'static str, Vec<ModelInfo>>>,
}

impl ChatService {
    /// `models_cache_ttl` of zero disables caching of the model list
    pub fn new(
        llm_repo: Arc<dyn LanguageModelRepository>,
        default_model: String,
        models_cache_ttl: Duration,
    ) -> Self {
        let models_cache = if models_cache_ttl.is_zero() {
            None
        } else {
            Some(
                Cache::builder()
                    .max_capacity(1)
                    .time_to_live(models_cache_ttl)
                    .build(),
            )
        };

        Self {
            llm_repo,
            default_model,
            models_cache,
        }
    }
}

#[async_trait]
pub trait ChatServiceApi: Send + Sync {
    /// Single-turn chat; nothing is remembered between calls
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ChatServiceError>;

    /// Models offered by the language-model provider
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatServiceError>;
}

#[async_trait]
impl ChatServiceApi for ChatService {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ChatServiceError> {
        if request.message.trim().is_empty() {
            return Err(ChatServiceError::Invalid(
                "Message cannot be empty".to_string(),
            ));
        }
        validate_generation_params(request.temperature, request.max_tokens)
            .map_err(ChatServiceError::Invalid)?;
        let model = resolve_model(request.model.as_deref(), &self.default_model)
            .map_err(ChatServiceError::Invalid)?;

        tracing::info!(
            model = %model,
            message_length = request.message.len(),
            "Chat request"
        );

        let completion = self
            .llm_repo
            .complete(CompletionRequest {
                model,
                system_prompt: None,
                prompt: request.message.clone(),
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            })
            .await?;

        Ok(ChatReply {
            model: completion.model,
            message: request.message,
            response: completion.content,
            usage: completion.usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatServiceError> {
        if let Some(cache) = &self.models_cache {
            if let Some(models) = cache.get(&MODELS_CACHE_KEY).await {
                tracing::debug!(model_count = models.len(), "Model list cache hit");
                return Ok(models);
            }
        }

        let models = self.llm_repo.list_models().await?;

        if let Some(cache) = &self.models_cache {
            cache.insert(MODELS_CACHE_KEY, models.clone()).await;
            tracing::debug!(model_count = models.len(), "Model list cached");
        }

        Ok(models)
    }
}
