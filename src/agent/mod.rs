//! Code generation agent — classifies a request and runs one of three handlers.
//!
//! ## Architecture
//!
//! - `prompts`: prompt templates for every step
//! - `classify`: classifier call + label normalization
//! - `pipeline`: the complex path (interpret, two concurrent branches, select, review)
//! - `response`: payload shapes returned to the HTTP layer
//!
//! Remote failures never surface here as errors: `LlmPool::generate`
//! turns them into inline text and the pipeline carries on with it.

pub mod classify;
pub mod pipeline;
pub mod prompts;
pub mod response;

use std::sync::Arc;

use tracing::info;

use crate::config::{AgentConfig, ModelRole, ModelTable};
use crate::llm::client::LlmError;
use crate::llm::LlmPool;
use classify::QueryKind;
use response::{AmbiguousResponse, GenerateResponse, SimpleResponse, SimpleSteps};

/// Errors the agent reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Query is required")]
    EmptyQuery,
}

/// The code generation agent. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct CodeAgent {
    pool: LlmPool,
    models: Arc<ModelTable>,
}

impl CodeAgent {
    pub fn new(pool: LlmPool, models: ModelTable) -> Self {
        Self {
            pool,
            models: Arc::new(models),
        }
    }

    /// Build an agent talking to the configured provider.
    pub fn from_config(config: &AgentConfig) -> Result<Self, LlmError> {
        Ok(Self::new(
            LlmPool::from_config(&config.provider)?,
            config.models.clone(),
        ))
    }

    pub fn models(&self) -> &ModelTable {
        &self.models
    }

    /// Classify `query` and dispatch it to the matching handler.
    pub async fn generate(&self, query: &str) -> Result<GenerateResponse, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        info!(query, "processing query");
        let kind = classify::classify(&self.pool, &self.models, query).await;

        let response = match kind {
            QueryKind::Ambiguous => self.handle_ambiguous(query).await.into(),
            QueryKind::Simple => self.handle_simple(query).await.into(),
            QueryKind::Complex => self.handle_complex(query).await,
        };
        Ok(response)
    }

    /// Ask the interpreter what the user left out.
    pub async fn handle_ambiguous(&self, query: &str) -> AmbiguousResponse {
        info!("processing ambiguous query");
        let feedback = self
            .pool
            .generate(
                self.models.get(ModelRole::Interpreter),
                &prompts::ambiguous_feedback(query),
            )
            .await;

        AmbiguousResponse {
            code: format!("{feedback}{}", prompts::MORE_DETAIL_SUFFIX),
            feedback,
            ambiguous: true,
        }
    }

    /// One generation call, no enhancement or review.
    pub async fn handle_simple(&self, query: &str) -> SimpleResponse {
        info!("processing simple query with a single model");
        let code = self
            .pool
            .generate(
                self.models.get(ModelRole::InstructTuned),
                &prompts::generate_code(query),
            )
            .await;

        SimpleResponse {
            steps: SimpleSteps {
                direct_code: code.clone(),
            },
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedBackend;

    fn agent_with(
        responder: impl Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> (CodeAgent, Arc<ScriptedBackend>) {
        let backend = ScriptedBackend::new(responder);
        let agent = CodeAgent::new(LlmPool::new(backend.clone()), ModelTable::default());
        (agent, backend)
    }

    #[tokio::test]
    async fn empty_query_makes_no_calls() {
        let (agent, backend) = agent_with(|_, _| Ok("simple".into()));
        assert!(matches!(agent.generate("").await, Err(AgentError::EmptyQuery)));
        assert!(matches!(agent.generate("   \n").await, Err(AgentError::EmptyQuery)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn simple_query_makes_one_generation_call() {
        let (agent, backend) = agent_with(|_, prompt| {
            if prompt.starts_with("Analyze this coding request") {
                Ok("Simple".into())
            } else {
                Ok("def rev(s): return s[::-1]".into())
            }
        });

        let response = agent.generate("reverse a string in python").await.unwrap();
        let GenerateResponse::Simple(simple) = response else {
            panic!("expected simple response");
        };
        assert_eq!(simple.code, "def rev(s): return s[::-1]");
        assert_eq!(simple.steps.direct_code, simple.code);

        // classifier + one generation
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, agent.models().instruct_tuned);
    }

    #[tokio::test]
    async fn ambiguous_query_returns_feedback_twice() {
        let (agent, backend) = agent_with(|_, prompt| {
            if prompt.starts_with("Analyze this coding request") {
                Ok("AMBIGUOUS!".into())
            } else {
                Ok("Which language?".into())
            }
        });

        let response = agent.generate("make it work").await.unwrap();
        let GenerateResponse::Ambiguous(amb) = response else {
            panic!("expected ambiguous response");
        };
        assert!(amb.ambiguous);
        assert_eq!(amb.feedback, "Which language?");
        assert_eq!(amb.code, format!("Which language?{}", prompts::MORE_DETAIL_SUFFIX));

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, agent.models().interpreter);
        assert!(calls[1].1.contains("\"make it work\""));
    }

    #[tokio::test]
    async fn failing_backend_still_yields_payload() {
        let (agent, _) = agent_with(|model, prompt| {
            if prompt.starts_with("Analyze this coding request") {
                Ok("simple".into())
            } else {
                Err(LlmError::ApiError {
                    status: 503,
                    message: format!("{model} overloaded"),
                })
            }
        });

        let response = agent.generate("reverse a string").await.unwrap();
        let expected = format!("Failed to generate with {}. Error:", agent.models().instruct_tuned);
        assert!(response.code().starts_with(&expected));
        assert_eq!(response.kind(), QueryKind::Simple);
    }
}
