//! Recommendation Generator: external strategy first, local strategy as the
//! always-available fallback, then shared post-processing.
//!
//! `RecommendationSource` is the seam for the external service. Production
//! uses `LlmRecommender`; tests plug in fakes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::recommendation::RecommendationItem;
use crate::recommendations::cache::Blocklist;
use crate::recommendations::local;
use crate::recommendations::postprocess::{finalize, GapTargets};
use crate::recommendations::prompts::{build_recommend_prompt, RECOMMEND_SYSTEM};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A strategy's output before post-processing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecommendations {
    #[serde(rename = "recommendations")]
    pub items: Vec<RecommendationItem>,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    External,
    Local,
}

/// Post-processed generator output.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub items: Vec<RecommendationItem>,
    pub explanation: String,
    pub strategy: Strategy,
}

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("recommendation service returned no items")]
    Empty,
}

// ────────────────────────────────────────────────────────────────────────────
// External source seam
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(
        &self,
        role: &str,
        weak: &[String],
        missing: &[String],
    ) -> Result<RawRecommendations, RecommenderError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

pub struct LlmRecommender {
    llm: LlmClient,
}

impl LlmRecommender {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RecommendationSource for LlmRecommender {
    async fn recommend(
        &self,
        role: &str,
        weak: &[String],
        missing: &[String],
    ) -> Result<RawRecommendations, RecommenderError> {
        let prompt = build_recommend_prompt(role, weak, missing);
        let raw: RawRecommendations = self.llm.call_json(&prompt, RECOMMEND_SYSTEM).await?;
        debug!(
            "LLM ({}) proposed {} recommendations for {role}",
            self.llm.model(),
            raw.items.len()
        );
        Ok(raw)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecommendationGenerator {
    external: Option<Arc<dyn RecommendationSource>>,
}

impl RecommendationGenerator {
    pub fn new(external: Option<Arc<dyn RecommendationSource>>) -> Self {
        Self { external }
    }

    /// Generator that never leaves the process.
    pub fn local_only() -> Self {
        Self { external: None }
    }

    /// Never fails: any external problem degrades to the local strategy.
    pub async fn generate(
        &self,
        role: &str,
        weak: &[String],
        missing: &[String],
        blocklist: &Blocklist,
    ) -> Recommendations {
        let (raw, strategy) = match self.try_external(role, weak, missing).await {
            Some(raw) => (raw, Strategy::External),
            None => (local::build(role, weak, missing), Strategy::Local),
        };

        let explanation = if raw.explanation.trim().is_empty() {
            local::explain(role, weak, missing)
        } else {
            raw.explanation
        };

        let targets = GapTargets {
            role,
            weak,
            missing,
        };
        let items = finalize(raw.items, &targets, blocklist);
        info!(
            "Generated {} recommendations for {role} via {:?} strategy",
            items.len(),
            strategy
        );

        Recommendations {
            items,
            explanation,
            strategy,
        }
    }

    async fn try_external(
        &self,
        role: &str,
        weak: &[String],
        missing: &[String],
    ) -> Option<RawRecommendations> {
        let source = self.external.as_ref()?;
        let result = source
            .recommend(role, weak, missing)
            .await
            .and_then(|raw| {
                if raw.items.is_empty() {
                    Err(RecommenderError::Empty)
                } else {
                    Ok(raw)
                }
            });
        match result {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(
                    "External recommendations ({}) unavailable, using local strategy: {e}",
                    source.name()
                );
                None
            }
        }
    }
}
