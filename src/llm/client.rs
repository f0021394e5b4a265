//! Raw HTTP client for the OpenRouter Chat Completions API.
//!
//! No pipeline awareness — just makes API calls via reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use super::CompletionBackend;
use crate::config::ProviderConfig;

/// Errors from LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("response contained no choices")]
    EmptyChoices,

    #[error("missing API key: {0}")]
    MissingApiKey(String),
}

/// Raw HTTP client for the OpenRouter Chat Completions API.
#[derive(Debug)]
pub struct OpenRouterClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Create a client from provider settings. The timeout bounds every call.
    pub fn new(config: &ProviderConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        // Checked per call so a missing key never blocks startup.
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::MissingApiKey("OPENROUTER_API_KEY environment variable not set".into())
        })?;

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        Ok(resp)
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request =
            ChatCompletionRequest::single_turn(model, prompt, self.temperature, self.max_tokens);
        let response = self.chat(&request).await?;
        if response.choices.is_empty() {
            return Err(LlmError::EmptyChoices);
        }
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| LlmError::InvalidResponse("first choice had no content".into()))
    }
}
