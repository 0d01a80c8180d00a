//! One analysis pass: profile snapshot in, `AnalysisView` out.
//!
//! analyze → (cache hit | generate) → roadmap. A freshly generated entry is
//! carried in the `Pass` and only written to the cache by `persist`, so the
//! caller decides whether a pass is still current before it touches shared
//! state. Store problems on the cache or blocklist side degrade to a
//! regeneration, never to an error.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::assessment::catalog::RoleCatalog;
use crate::assessment::dashboard::{summarize, DashboardStats};
use crate::assessment::gap::{analyze, GapResult};
use crate::models::profile::{SkillSet, UserProfile};
use crate::models::recommendation::RecommendationItem;
use crate::recommendations::cache::{
    cache_key, signature, Blocklist, BlocklistStore, CacheEntry, RecommendationCache,
};
use crate::recommendations::generator::{RecommendationGenerator, Strategy};
use crate::recommendations::roadmap::{group_into_phases, Roadmap};

/// Where the items of a view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    Cache,
    External,
    Local,
}

impl From<Strategy> for ItemSource {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::External => Self::External,
            Strategy::Local => Self::Local,
        }
    }
}

/// Everything the screens read for the acting user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub uid: Option<String>,
    pub role_title: String,
    pub gap: GapResult,
    pub dashboard: DashboardStats,
    pub items: Vec<RecommendationItem>,
    pub explanation: String,
    pub roadmap: Roadmap,
    pub source: ItemSource,
}

impl AnalysisView {
    pub fn find_item(&self, title: &str) -> Option<&RecommendationItem> {
        self.items.iter().find(|i| i.title == title)
    }
}

/// Result of `Pipeline::analyze`: the view plus the cache entry to store when
/// the items were generated rather than read back.
#[derive(Debug, Clone)]
pub struct Pass {
    pub view: AnalysisView,
    fresh: Option<(String, CacheEntry)>,
}

#[derive(Clone)]
pub struct Pipeline {
    pub(crate) catalog: Arc<RoleCatalog>,
    pub(crate) generator: RecommendationGenerator,
    pub(crate) cache: RecommendationCache,
    pub(crate) blocklist: BlocklistStore,
}

impl Pipeline {
    pub fn new(
        catalog: Arc<RoleCatalog>,
        generator: RecommendationGenerator,
        cache: RecommendationCache,
        blocklist: BlocklistStore,
    ) -> Self {
        Self {
            catalog,
            generator,
            cache,
            blocklist,
        }
    }

    pub async fn analyze(&self, uid: Option<&str>, profile: Option<&UserProfile>) -> Pass {
        let empty = SkillSet::new();
        let skills = profile.map_or(&empty, |p| &p.skills);
        let goal = profile.and_then(|p| p.goal.as_ref());

        let (role_title, role) = self.catalog.resolve_goal(goal);
        let gap = analyze(&role.required_skills(), skills);
        let dashboard = summarize(&gap);

        let key = cache_key(uid);
        let sig = signature(&role_title, &gap.weak_names, &gap.missing_names);
        let blocklist = self.load_blocklist().await;

        let (items, explanation, source, fresh) = match self.cache.lookup(&key, &sig).await {
            Ok(Some(entry)) => {
                debug!("Serving cached recommendations from {key}");
                let items = entry
                    .items
                    .into_iter()
                    .filter(|item| !blocklist.contains(&item.title))
                    .collect();
                (items, entry.explanation, ItemSource::Cache, None)
            }
            miss => {
                if let Err(e) = miss {
                    warn!("Recommendation cache {key} unreadable, regenerating: {e}");
                }
                let generated = self
                    .generator
                    .generate(&role_title, &gap.weak_names, &gap.missing_names, &blocklist)
                    .await;
                let entry = CacheEntry {
                    signature: sig,
                    items: generated.items.clone(),
                    explanation: generated.explanation.clone(),
                };
                (
                    generated.items,
                    generated.explanation,
                    generated.strategy.into(),
                    Some((key, entry)),
                )
            }
        };

        let roadmap = group_into_phases(&items, &gap.weak_names);

        Pass {
            view: AnalysisView {
                uid: uid.map(str::to_string),
                role_title,
                gap,
                dashboard,
                items,
                explanation,
                roadmap,
                source,
            },
            fresh,
        }
    }

    /// Writes the generated entry of `pass`, if any, to its cache slot.
    pub async fn persist(&self, pass: &Pass) {
        if let Some((key, entry)) = &pass.fresh {
            if let Err(e) = self.cache.put(key, entry).await {
                error!("Writing recommendation cache {key} failed: {e}");
            }
        }
    }

    #[cfg(test)]
    pub async fn run(&self, uid: Option<&str>, profile: Option<&UserProfile>) -> AnalysisView {
        let pass = self.analyze(uid, profile).await;
        self.persist(&pass).await;
        pass.view
    }

    async fn load_blocklist(&self) -> Blocklist {
        match self.blocklist.load().await {
            Ok(list) => list,
            Err(e) => {
                error!("Loading completion blocklist failed: {e}");
                Blocklist::default()
            }
        }
    }
}
