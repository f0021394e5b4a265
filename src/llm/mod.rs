//! LLM Pool — shared completion handle used by every pipeline step.
//!
//! `CompletionBackend` is the typed seam: one prompt in, one text or
//! `LlmError` out. `LlmPool::generate` is the single place where a failure
//! is turned into inline text, so the pipeline always receives a string.

pub mod client;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use client::{LlmError, OpenRouterClient};

/// Longest slice of a model response written to the debug log.
const LOG_PREVIEW_CHARS: usize = 500;

/// Something that can turn a prompt into a completion for a named model.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Inline text substituted for a failed completion.
pub fn failure_text(model: &str, error: &LlmError) -> String {
    format!("Failed to generate with {model}. Error: {error}")
}

/// Shared handle to a completion backend. Cheap to clone.
#[derive(Clone)]
pub struct LlmPool {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmPool {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Create a pool backed by the OpenRouter HTTP client.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LlmError> {
        Ok(Self::new(Arc::new(OpenRouterClient::new(config)?)))
    }

    /// Send one prompt and keep the failure typed.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        debug!(model, "calling completion backend");
        let text = self.backend.complete(model, prompt).await?;
        debug!(model, response = %preview(&text), "model responded");
        Ok(text)
    }

    /// Send one prompt. Failures degrade to `failure_text` instead of erroring.
    pub async fn generate(&self, model: &str, prompt: &str) -> String {
        match self.complete(model, prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model, error = %e, "completion failed, continuing with inline error text");
                failure_text(model, &e)
            }
        }
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend for unit tests.

    use std::sync::Mutex;

    use super::*;

    type Responder = dyn Fn(&str, &str) -> Result<String, LlmError> + Send + Sync;

    /// Answers prompts through a closure and records every call.
    pub struct ScriptedBackend {
        responder: Box<Responder>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedBackend {
        pub fn new(
            responder: impl Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            })
        }

        /// `(model, prompt)` pairs in call order.
        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            (self.responder)(model, prompt)
        }
    }
}
