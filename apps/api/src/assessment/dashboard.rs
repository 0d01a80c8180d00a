//! Dashboard summary derived from a `GapResult`. Readiness is taken from the
//! analysis as-is; chart values come from the level scale.

use serde::{Deserialize, Serialize};

use crate::assessment::gap::{GapResult, SkillStatus};
use crate::assessment::level::chart_value;

/// Radar chart shows at most this many skills, in requirement order.
const RADAR_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub subject: String,
    pub user: u8,
    pub required: u8,
    pub full_mark: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub readiness: u32,
    pub good_count: usize,
    pub weak_count: usize,
    pub missing_count: usize,
    pub total_required: usize,
    pub radar: Vec<RadarPoint>,
}

pub fn summarize(result: &GapResult) -> DashboardStats {
    let radar = result
        .per_skill
        .iter()
        .take(RADAR_LIMIT)
        .map(|gap| RadarPoint {
            subject: gap
                .skill
                .split_whitespace()
                .next()
                .unwrap_or(&gap.skill)
                .to_string(),
            user: chart_value(gap.user_level.as_deref()),
            required: chart_value(Some(&gap.required_level)),
            full_mark: 100,
        })
        .collect();

    DashboardStats {
        readiness: result.readiness,
        good_count: result.count(SkillStatus::Good),
        weak_count: result.count(SkillStatus::Weak),
        missing_count: result.count(SkillStatus::Missing),
        total_required: result.per_skill.len(),
        radar,
    }
}
