use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::chat::{ChatRequest, ChatResponse, ChatService, ChatServiceApi, ModelsResponse},
    error::AppResult,
};

pub struct ChatController {
    chat_service: Arc<ChatService>,
}

impl ChatController {
    pub fn new(chat_service: Arc<ChatService>) -> Self {
        Self { chat_service }
    }

    /// POST /api/v1/chat - Single-turn chat with the language model
    pub async fn chat(
        State(controller): State<Arc<ChatController>>,
        Json(request): Json<ChatRequest>,
    ) -> AppResult<Json<ChatResponse>> {
        let reply = controller.chat_service.chat(request).await?;

        Ok(Json(ChatResponse {
            success: true,
            model: reply.model,
            message: reply.message,
            response: reply.response,
            usage: reply.usage,
        }))
    }

    /// GET /api/v1/models - Models offered by the provider
    pub async fn list_models(
        State(controller): State<Arc<ChatController>>,
    ) -> AppResult<Json<ModelsResponse>> {
        let models = controller.chat_service.list_models().await?;
        Ok(Json(ModelsResponse::from(models)))
    }
}
