//! Gap Analyzer: compares a user's skills against a role's requirements.
//!
//! Pure and deterministic. Readiness is the mean of per-skill scores:
//! GOOD = 100, WEAK = 100 * user_rank / required_rank, MISSING = 0,
//! rounded half-up to a whole percent.

use serde::{Deserialize, Serialize};

use crate::assessment::level::rank;
use crate::models::profile::SkillSet;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One requirement of a role. The level is a label so that unrecognized
/// values can flow through (they rank 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredSkill {
    pub skill: String,
    pub required_level: String,
}

impl RequiredSkill {
    pub fn new(skill: impl Into<String>, required_level: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            required_level: required_level.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SkillStatus {
    Good,
    Weak,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub required_level: String,
    /// `None` when the user does not list the skill at all.
    pub user_level: Option<String>,
    pub status: SkillStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapResult {
    pub readiness: u32, // 0 – 100
    pub per_skill: Vec<SkillGap>,
    pub missing_names: Vec<String>,
    pub weak_names: Vec<String>,
}

impl GapResult {
    pub fn count(&self, status: SkillStatus) -> usize {
        self.per_skill.iter().filter(|g| g.status == status).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

/// Classifies every required skill in catalog order and computes readiness.
///
/// Lookup is case-insensitive exact name match. A skill the user lists with
/// an unrecognized level ranks 0 and is WEAK (score 0) against any real
/// requirement. A requirement with an unrecognized level ranks 0, so any
/// listed skill satisfies it.
pub fn analyze(required: &[RequiredSkill], user_skills: &SkillSet) -> GapResult {
    let mut per_skill = Vec::with_capacity(required.len());
    let mut missing_names = Vec::new();
    let mut weak_names = Vec::new();
    let mut total_score = 0.0_f64;

    for req in required {
        let user_skill = user_skills.get(&req.skill);
        let req_rank = rank(Some(&req.required_level));

        let (status, score) = match user_skill {
            None => (SkillStatus::Missing, 0.0),
            Some(s) => {
                let user_rank = rank(Some(&s.level));
                if user_rank < req_rank {
                    let score = 100.0 * f64::from(user_rank) / f64::from(req_rank);
                    (SkillStatus::Weak, score)
                } else {
                    (SkillStatus::Good, 100.0)
                }
            }
        };

        match status {
            SkillStatus::Missing => missing_names.push(req.skill.clone()),
            SkillStatus::Weak => weak_names.push(req.skill.clone()),
            SkillStatus::Good => {}
        }
        total_score += score;

        per_skill.push(SkillGap {
            skill: req.skill.clone(),
            required_level: req.required_level.clone(),
            user_level: user_skill.map(|s| s.level.clone()),
            status,
        });
    }

    let readiness = if required.is_empty() {
        0
    } else {
        round_half_up(total_score / required.len() as f64)
    };

    GapResult {
        readiness,
        per_skill,
        missing_names,
        weak_names,
    }
}

/// Scores are never negative, so `f64::round` (half away from zero) is
/// half-up here. Clamped to the percent range.
fn round_half_up(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
