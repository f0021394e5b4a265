//! Query classification — one classifier call, then label normalization.

use std::fmt;

use tracing::info;

use super::prompts::{self, HEDGE_PHRASES};
use crate::config::{ModelRole, ModelTable};
use crate::llm::LlmPool;

/// Which handler a query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Simple,
    Complex,
    Ambiguous,
}

impl QueryKind {
    /// Map raw classifier output to a kind.
    ///
    /// "ambiguous" wins over everything, then "simple"; anything else,
    /// including unparseable output, is complex.
    pub fn from_label(raw: &str) -> Self {
        let label = normalize(raw);
        if label.contains("ambiguous") {
            QueryKind::Ambiguous
        } else if label.contains("simple") {
            QueryKind::Simple
        } else {
            QueryKind::Complex
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Simple => "simple",
            QueryKind::Complex => "complex",
            QueryKind::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case and drop every character outside `a..=z`.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Does an interpretation hedge badly enough to treat the query as ambiguous?
pub fn is_hedged(interpretation: &str) -> bool {
    let lower = interpretation.to_lowercase();
    HEDGE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Classify a query with one call to the classifier model.
pub async fn classify(pool: &LlmPool, models: &ModelTable, query: &str) -> QueryKind {
    let raw = pool
        .generate(models.get(ModelRole::Classifier), &prompts::classify_query(query))
        .await;
    let kind = QueryKind::from_label(&raw);
    info!(%kind, label = %normalize(&raw), "query classified");
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LlmError;
    use crate::llm::testing::ScriptedBackend;

    #[test]
    fn normalize_strips_non_letters() {
        assert_eq!(normalize("  ComPlex!!"), "complex");
        assert_eq!(normalize("Ambiguous-simple"), "ambiguoussimple");
        assert_eq!(normalize("\"Simple.\"\n"), "simple");
        assert_eq!(normalize("42 ✓"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["  ComPlex!!", "Ambiguous-simple", "SIMPLE", "über-complex"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn ambiguous_wins_tie_break() {
        assert_eq!(QueryKind::from_label("Ambiguous-simple"), QueryKind::Ambiguous);
        assert_eq!(QueryKind::from_label("simple, not ambiguous"), QueryKind::Ambiguous);
        assert_eq!(QueryKind::from_label("complex or simple"), QueryKind::Simple);
    }

    #[test]
    fn fallback_is_complex() {
        assert_eq!(QueryKind::from_label("  ComPlex!!"), QueryKind::Complex);
        assert_eq!(QueryKind::from_label(""), QueryKind::Complex);
        assert_eq!(QueryKind::from_label("I cannot answer that"), QueryKind::Complex);
        assert_eq!(
            QueryKind::from_label("Failed to generate with m. Error: timeout"),
            QueryKind::Complex
        );
    }

    #[test]
    fn hedge_detection_is_case_insensitive() {
        assert!(is_hedged("The request is UNCLEAR about the language."));
        assert!(is_hedged("We Need More Information on inputs."));
        assert!(is_hedged("somewhat ambiguous"));
        assert!(!is_hedged("A function that returns the reversed string."));
    }

    #[tokio::test]
    async fn classify_makes_one_classifier_call() {
        let backend = ScriptedBackend::new(|_, _| Ok("Simple.".into()));
        let pool = LlmPool::new(backend.clone());
        let models = ModelTable::default();

        let kind = classify(&pool, &models, "reverse a string").await;
        assert_eq!(kind, QueryKind::Simple);

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, models.classifier);
        assert!(calls[0].1.contains("reverse a string"));
    }

    #[tokio::test]
    async fn classifier_failure_falls_back_to_complex() {
        let pool = LlmPool::new(ScriptedBackend::new(|_, _| Err(LlmError::EmptyChoices)));
        let kind = classify(&pool, &ModelTable::default(), "anything").await;
        assert_eq!(kind, QueryKind::Complex);
    }
}
