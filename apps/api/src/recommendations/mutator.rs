//! Profile Mutator: marking a recommendation complete raises the matching
//! skill in the user's profile. Levels only ever go up.

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::assessment::level::{rank, SkillLevel};
use crate::models::profile::{ProfilePatch, SkillSet, UserSkill};
use crate::models::recommendation::ItemKind;
use crate::recommendations::postprocess::clean_skill_name;
use crate::store::ProfileStore;

/// What a completion did to the skill set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum CompletionEffect {
    Added { skill: String, level: SkillLevel },
    Upgraded { skill: String, from: String, to: SkillLevel },
    Unchanged { skill: String },
}

/// Level a completed resource grants.
pub fn granted_level(kind: ItemKind) -> SkillLevel {
    match kind {
        ItemKind::Course => SkillLevel::Intermediate,
        ItemKind::Project => SkillLevel::Advanced,
    }
}

/// Applies one completion to `skills` in memory.
pub fn apply_completion(skills: &mut SkillSet, skill_name: &str, kind: ItemKind) -> CompletionEffect {
    let name = clean_skill_name(skill_name);
    let level = granted_level(kind);

    match skills.get_mut(&name) {
        Some(existing) if level.rank() > rank(Some(&existing.level)) => {
            let from = std::mem::replace(&mut existing.level, level.as_str().to_string());
            CompletionEffect::Upgraded {
                skill: existing.name.clone(),
                from,
                to: level,
            }
        }
        Some(existing) => CompletionEffect::Unchanged {
            skill: existing.name.clone(),
        },
        None => {
            skills.upsert(UserSkill::new(name.clone(), level.as_str()));
            CompletionEffect::Added { skill: name, level }
        }
    }
}

/// Loads the user's skills, applies the completion and writes the whole
/// skill set back. `false` on any store failure; nothing is assumed written.
pub async fn complete_recommendation(
    store: &dyn ProfileStore,
    uid: &str,
    skill_name: &str,
    kind: ItemKind,
) -> bool {
    let mut skills = match store.get(uid).await {
        Ok(profile) => profile.map(|p| p.skills).unwrap_or_default(),
        Err(e) => {
            error!("Loading profile of {uid} for completion failed: {e}");
            return false;
        }
    };

    let effect = apply_completion(&mut skills, skill_name, kind);

    let patch = ProfilePatch {
        updated_at: Some(Utc::now()),
        ..ProfilePatch::skills(skills)
    };
    match store.set_or_merge(uid, patch).await {
        Ok(()) => {
            info!("Completion recorded for {uid} on {}: {effect:?}", store.backend());
            true
        }
        Err(e) => {
            error!("Saving completion for {uid} failed: {e}");
            false
        }
    }
}
