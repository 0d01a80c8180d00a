use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A self-reported skill. `level` is kept as the stored label; unknown labels
/// rank 0 rather than failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSkill {
    pub name: String,
    #[serde(default)]
    pub level: String,
}

impl UserSkill {
    pub fn new(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: level.into(),
        }
    }
}

/// A user's skills keyed by lower-cased name. Stored as a plain array; a
/// later entry with the same name replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<UserSkill>", into = "Vec<UserSkill>")]
pub struct SkillSet {
    skills: Vec<UserSkill>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&UserSkill> {
        self.position(name).map(|i| &self.skills[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut UserSkill> {
        self.position(name).map(move |i| &mut self.skills[i])
    }

    /// Inserts or replaces by case-insensitive name. Insertion order is kept
    /// for new names.
    pub fn upsert(&mut self, skill: UserSkill) {
        match self.position(&skill.name) {
            Some(i) => self.skills[i] = skill,
            None => self.skills.push(skill),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserSkill> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.skills
            .iter()
            .position(|s| s.name.trim().to_lowercase() == needle)
    }
}

impl From<Vec<UserSkill>> for SkillSet {
    fn from(skills: Vec<UserSkill>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<UserSkill> {
    fn from(set: SkillSet) -> Self {
        set.skills
    }
}

impl FromIterator<UserSkill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = UserSkill>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.upsert(skill);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedCourse {
    pub name: String,
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Career sector chosen on the goal screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Health,
    Agri,
    City,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub specialization: Option<String>,
}

/// The per-user document held by a profile store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub courses: Vec<CompletedCourse>,
    #[serde(default)]
    pub projects: Vec<PastProject>,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial document for merge writes. Only present fields are written;
/// each one replaces the stored top-level field wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<SkillSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<CompletedCourse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<PastProject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    pub fn skills(skills: SkillSet) -> Self {
        Self {
            skills: Some(skills),
            ..Default::default()
        }
    }

    pub fn goal(goal: Goal) -> Self {
        Self {
            goal: Some(goal),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_object().map_or(true, |m| m.is_empty())
    }

    /// The patch as a JSON object containing only the fields being written.
    pub fn as_object(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_lookup_is_case_insensitive() {
        let set: SkillSet = vec![UserSkill::new("ECG Interpretation", "Beginner")].into();
        assert_eq!(
            set.get("ecg interpretation").map(|s| s.level.as_str()),
            Some("Beginner")
        );
        assert!(set.get("ECG").is_none());
    }

    #[test]
    fn test_skill_set_last_duplicate_wins_in_place() {
        let set: SkillSet = vec![
            UserSkill::new("Soil Science", "Beginner"),
            UserSkill::new("GIS Mapping", "Advanced"),
            UserSkill::new("soil science", "Advanced"),
        ]
        .into();
        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["soil science", "GIS Mapping"]);
        assert_eq!(set.get("Soil Science").unwrap().level, "Advanced");
    }

    #[test]
    fn test_skill_set_serializes_as_array() {
        let set: SkillSet = vec![UserSkill::new("React", "Intermediate")].into();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"name": "React", "level": "Intermediate"}])
        );
    }

    #[test]
    fn test_profile_deserializes_document_shape() {
        let doc = serde_json::json!({
            "name": "Asha",
            "education": "Undergraduate",
            "skills": [{"name": "Cardiac Anatomy", "level": "Advanced"}],
            "courses": [{"name": "Anatomy 101", "platform": "Coursera"}],
            "goal": {"domain": "health", "specialization": "Cardiology"}
        });
        let profile: UserProfile = serde_json::from_value(doc).unwrap();
        assert_eq!(profile.skills.len(), 1);
        assert_eq!(profile.goal.unwrap().domain, Some(Domain::Health));
        assert!(profile.projects.is_empty());
    }

    #[test]
    fn test_unknown_domain_does_not_fail() {
        let goal: Goal = serde_json::from_str(r#"{"domain":"space"}"#).unwrap();
        assert_eq!(goal.domain, Some(Domain::Unknown));
    }

    #[test]
    fn test_patch_only_serializes_present_fields() {
        let patch = ProfilePatch::goal(Goal {
            domain: Some(Domain::City),
            specialization: None,
        });
        let obj = patch.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("goal"));
        assert!(ProfilePatch::default().is_empty());
    }
}
