//! Groups the final recommendation list into the three roadmap phases.

use serde::Serialize;

use crate::models::recommendation::{ItemKind, RecommendationItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub foundation: Vec<RecommendationItem>,
    pub acquisition: Vec<RecommendationItem>,
    pub mastery: Vec<RecommendationItem>,
    pub all_complete: bool,
}

fn is_foundation(item: &RecommendationItem, weak: &[String]) -> bool {
    item.kind == ItemKind::Course
        && (item.tags.iter().any(|t| t == "Basics")
            || item.purpose.as_deref().is_some_and(|p| p.contains("Improve"))
            || weak.iter().any(|w| item.title.contains(w.as_str())))
}

/// Foundation: courses that shore up weak skills. Mastery: every project.
/// Acquisition: the rest. Item order is kept inside each phase.
pub fn group_into_phases(items: &[RecommendationItem], weak: &[String]) -> Roadmap {
    let mut roadmap = Roadmap {
        all_complete: items.is_empty(),
        ..Roadmap::default()
    };
    for item in items {
        let phase = if item.kind == ItemKind::Project {
            &mut roadmap.mastery
        } else if is_foundation(item, weak) {
            &mut roadmap.foundation
        } else {
            &mut roadmap.acquisition
        };
        phase.push(item.clone());
    }
    roadmap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[RecommendationItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_phases() {
        let weak = vec!["ECG Interpretation".to_string()];
        let items = vec![
            RecommendationItem::new(ItemKind::Course, "Heart Basics", "edX").with_tags(["Basics"]),
            RecommendationItem::new(ItemKind::Course, "Echo Lab", "edX")
                .with_purpose("Learn Echocardiography"),
            RecommendationItem::new(ItemKind::Course, "Rhythm Strips", "edX")
                .with_purpose("Improve ECG Interpretation"),
            RecommendationItem::new(ItemKind::Project, "Improve ECG Interpretation", "GitHub"),
            RecommendationItem::new(ItemKind::Course, "ECG Interpretation Deep Dive", "Udemy"),
        ];

        let roadmap = group_into_phases(&items, &weak);
        assert_eq!(
            titles(&roadmap.foundation),
            vec!["Heart Basics", "Rhythm Strips", "ECG Interpretation Deep Dive"]
        );
        assert_eq!(titles(&roadmap.acquisition), vec!["Echo Lab"]);
        assert_eq!(titles(&roadmap.mastery), vec!["Improve ECG Interpretation"]);
        assert!(!roadmap.all_complete);
    }

    #[test]
    fn test_empty_list_is_all_complete() {
        let roadmap = group_into_phases(&[], &[]);
        assert!(roadmap.all_complete);
        assert!(roadmap.foundation.is_empty());
    }
}
