use super::llm_repository::{
    Completion, CompletionRequest, LanguageModelRepository, ModelInfo, TokenUsage,
};
use super::UpstreamError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "mistral";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MODELS_PATH: &str = "/v1/models";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<ModelInfo>,
}

/// Mistral chat-completions implementation of the language model repository
pub struct MistralRepository {
    api_key: String,
    api_base: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl MistralRepository {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mistral-tts-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn ensure_configured(&self) -> Result<(), UpstreamError> {
        if self.api_key.trim().is_empty() {
            return Err(UpstreamError::NotConfigured("MISTRAL_API_KEY is not set"));
        }
        Ok(())
    }

    fn transport_error(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout {
                provider: PROVIDER,
                after: self.timeout,
            }
        } else if error.is_decode() {
            UpstreamError::InvalidResponse {
                provider: PROVIDER,
                message: error.to_string(),
            }
        } else {
            UpstreamError::Unavailable {
                provider: PROVIDER,
                message: error.to_string(),
            }
        }
    }

    /// Turn a non-success response into `Rejected`, keeping the provider's message
    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!(
            status = status.as_u16(),
            body = %body,
            "Mistral API returned an error"
        );

        Err(UpstreamError::Rejected {
            provider: PROVIDER,
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }
}

/// Mistral errors come as `{"message": ...}` or `{"detail": ...}`; fall back to the raw body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "detail", "error"].iter().find_map(|key| {
                value.get(*key).map(|field| match field.as_str() {
                    Some(text) => text.to_string(),
                    None => field.to_string(),
                })
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl LanguageModelRepository for MistralRepository {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, UpstreamError> {
        self.ensure_configured()?;
        let start_time = std::time::Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatCompletionBody {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::info!(
            model = %request.model,
            prompt_length = request.prompt.len(),
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "Calling Mistral chat completion"
        );

        let response = self
            .http_client
            .post(self.url(CHAT_COMPLETIONS_PATH))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let completion: ChatCompletionResponse = self
            .check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::InvalidResponse {
                provider: PROVIDER,
                message: "completion contained no choices".to_string(),
            })?;

        tracing::info!(
            provider = PROVIDER,
            model = %completion.model,
            latency_ms = start_time.elapsed().as_millis(),
            completion_length = content.len(),
            total_tokens = completion.usage.total_tokens,
            "Mistral chat completion finished"
        );

        Ok(Completion {
            model: completion.model,
            content,
            usage: completion.usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, UpstreamError> {
        self.ensure_configured()?;

        let response = self
            .http_client
            .get(self.url(MODELS_PATH))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let models: ModelListResponse = self
            .check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(model_count = models.data.len(), "Mistral models listed");

        Ok(models.data)
    }
}
