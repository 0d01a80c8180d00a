use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Course,
    Project,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Project => "project",
        }
    }
}

/// A learning resource on the roadmap.
///
/// `related_skill`, `image` and `search_query` are filled by post-processing;
/// raw items from either strategy usually leave them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl RecommendationItem {
    pub fn new(kind: ItemKind, title: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            provider: provider.into(),
            tags: Vec::new(),
            purpose: None,
            related_skill: None,
            image: None,
            search_query: None,
            duration: None,
            rating: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_parses_external_record() {
        let json = r#"{
            "type": "course",
            "title": "ECG Mastery",
            "provider": "Coursera",
            "tags": ["ECG Interpretation"],
            "searchQuery": "ecg course"
        }"#;
        let item: RecommendationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Course);
        assert_eq!(item.search_query.as_deref(), Some("ecg course"));
        assert!(item.related_skill.is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"type": "video", "title": "x"}"#;
        assert!(serde_json::from_str::<RecommendationItem>(json).is_err());
    }
}
