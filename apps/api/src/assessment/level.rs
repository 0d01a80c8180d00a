//! Level scale: turns a free-text proficiency label into an ordered rank.
//!
//! `rank` (0..=3) is the only source of truth. The chart scale used by the
//! dashboard is derived from it, never maintained separately.

use serde::{Deserialize, Serialize};

/// Highest rank on the scale (Advanced).
pub const MAX_RANK: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Case-insensitive parse. Anything outside the three labels is `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("beginner") {
            Some(Self::Beginner)
        } else if label.eq_ignore_ascii_case("intermediate") {
            Some(Self::Intermediate)
        } else if label.eq_ignore_ascii_case("advanced") {
            Some(Self::Advanced)
        } else {
            None
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank of a level label. Absent or unrecognized labels rank 0, below Beginner.
pub fn rank(label: Option<&str>) -> u8 {
    label.and_then(SkillLevel::parse).map_or(0, SkillLevel::rank)
}

/// Display value on a 0–100 scale: 0, 33, 67, 100.
pub fn chart_value(label: Option<&str>) -> u8 {
    (f64::from(rank(label)) * 100.0 / f64::from(MAX_RANK)).round() as u8
}
