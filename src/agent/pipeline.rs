//! Complex-query pipeline.
//!
//! interpret → (hedge check) → direct branch ∥ interpreted branch → select → review
//!
//! Branches, selection and review run together as one spawned unit; inside
//! it the two branches are spawned as independent tasks and both are
//! awaited. A failed remote call is already inline text by the time any
//! step sees it. A task that panics or is cancelled anywhere in that unit
//! is the one fault this path recognises: the query is then answered by the
//! simple handler instead.

use tokio::task::JoinError;
use tracing::{info, warn};

use super::classify::is_hedged;
use super::prompts;
use super::response::{BranchResult, ComplexResponse, ComplexSteps, GenerateResponse};
use super::CodeAgent;
use crate::config::ModelRole;
use crate::llm::LlmPool;

/// Models and prompt for one generate-then-enhance branch.
struct Branch {
    name: &'static str,
    generator: String,
    enhancer: String,
    generation_prompt: String,
    query: String,
}

impl Branch {
    async fn run(self, pool: LlmPool) -> BranchResult {
        info!(branch = self.name, "generating");
        let raw = pool.generate(&self.generator, &self.generation_prompt).await;

        info!(branch = self.name, "enhancing");
        let enhanced = pool
            .generate(&self.enhancer, &prompts::enhance_code(&self.query, &raw))
            .await;

        info!(branch = self.name, "complete");
        BranchResult { raw, enhanced }
    }
}

impl CodeAgent {
    /// Full pipeline for a complex query.
    ///
    /// Returns an ambiguous payload when the interpretation hedges, and a
    /// simple payload when any task after interpretation faults.
    pub async fn handle_complex(&self, query: &str) -> GenerateResponse {
        info!("processing complex query with full pipeline");

        let interpretation = self
            .pool
            .generate(
                self.models.get(ModelRole::Interpreter),
                &prompts::interpret_query(query),
            )
            .await;
        info!("interpretation complete");

        if is_hedged(&interpretation) {
            info!("interpretation indicates ambiguity, redirecting to ambiguous handler");
            return self.handle_ambiguous(query).await.into();
        }

        let agent = self.clone();
        let owned_query = query.to_string();
        let unit = tokio::spawn(async move {
            agent
                .generate_select_review(&owned_query, interpretation)
                .await
        });

        match unit.await {
            Ok(Ok(response)) => {
                info!("complex pipeline complete");
                response.into()
            }
            Ok(Err(e)) | Err(e) => {
                warn!(error = %e, "complex pipeline faulted, falling back to simple handler");
                self.handle_simple(query).await.into()
            }
        }
    }

    /// Both branches, then selection and final review.
    async fn generate_select_review(
        &self,
        query: &str,
        interpretation: String,
    ) -> Result<ComplexResponse, JoinError> {
        let (direct, interpreted) = self.run_branches(query, &interpretation).await?;

        info!("selecting best implementation");
        let best_implementation = self
            .pool
            .generate(
                self.models.get(ModelRole::Reviewer),
                &prompts::select_best(&direct.enhanced, &interpreted.enhanced),
            )
            .await;

        info!("performing final review");
        let code = self
            .pool
            .generate(
                self.models.get(ModelRole::Reviewer),
                &prompts::final_review(&best_implementation),
            )
            .await;

        Ok(ComplexResponse {
            code,
            steps: ComplexSteps {
                interpretation,
                direct_code: direct.raw,
                enhanced_direct_code: direct.enhanced,
                interpreted_code: interpreted.raw,
                enhanced_interpreted_code: interpreted.enhanced,
                best_implementation,
            },
        })
    }

    /// Run both branches concurrently and wait for both.
    async fn run_branches(
        &self,
        query: &str,
        interpretation: &str,
    ) -> Result<(BranchResult, BranchResult), JoinError> {
        let generator = self.models.get(ModelRole::Generator);
        let enhancer = self.models.get(ModelRole::InstructTuned);

        let direct = Branch {
            name: "direct",
            generator: generator.to_string(),
            enhancer: enhancer.to_string(),
            generation_prompt: prompts::generate_direct(query),
            query: query.to_string(),
        };
        let interpreted = Branch {
            name: "interpreted",
            generator: generator.to_string(),
            enhancer: enhancer.to_string(),
            generation_prompt: prompts::generate_from_spec(interpretation),
            query: query.to_string(),
        };

        info!("running parallel branches");
        let direct = tokio::spawn(direct.run(self.pool.clone()));
        let interpreted = tokio::spawn(interpreted.run(self.pool.clone()));

        // Join-all: neither branch is cancelled when the other faults.
        let (direct, interpreted) = tokio::join!(direct, interpreted);
        Ok((direct?, interpreted?))
    }
}
