//! Local deterministic strategy. Always succeeds; used whenever the external
//! recommendation service is unavailable or returns nothing usable.

use std::collections::HashSet;

use crate::models::recommendation::{ItemKind, RecommendationItem};
use crate::recommendations::generator::RawRecommendations;
use crate::recommendations::resources::resources_for;

/// Builds the learning path: weak skills first ("Improve …"), then missing
/// skills ("Learn …"), then one capstone project for the role.
///
/// Courses of every gap skill come before projects. A resource reachable from
/// two skills is emitted once, under the first skill that reached it.
pub fn build(role: &str, weak: &[String], missing: &[String]) -> RawRecommendations {
    let mut courses = Vec::new();
    let mut projects = Vec::new();
    let mut seen: HashSet<&'static str> = HashSet::new();

    let steps = weak
        .iter()
        .map(|s| (s, format!("Improve {s}")))
        .chain(missing.iter().map(|s| (s, format!("Learn {s}"))));

    for (skill, purpose) in steps {
        let Some(entry) = resources_for(skill) else {
            continue;
        };
        for res in entry.courses {
            if seen.insert(res.title) {
                courses.push(res.to_item(ItemKind::Course).with_purpose(purpose.clone()));
            }
        }
        for res in entry.projects {
            if seen.insert(res.title) {
                projects.push(res.to_item(ItemKind::Project).with_purpose(purpose.clone()));
            }
        }
    }

    projects.push(capstone(role));

    let mut items = courses;
    items.extend(projects);

    RawRecommendations {
        items,
        explanation: explain(role, weak, missing),
    }
}

fn capstone(role: &str) -> RecommendationItem {
    let title = format!("Build a {role}-focused healthcare project");
    RecommendationItem::new(ItemKind::Project, title.clone(), "MedSkill Navigator Capstone")
        .with_tags([role, "Capstone"])
        .with_purpose(title)
}

/// Templated mentor text for the local strategy.
pub fn explain(role: &str, weak: &[String], missing: &[String]) -> String {
    if weak.is_empty() && missing.is_empty() {
        return format!(
            "Excellent work! You are well-prepared for a career in {role}. \
             Consider exploring advanced specialization projects to stand out further."
        );
    }
    let weak_text = if weak.is_empty() {
        "core areas".to_string()
    } else {
        weak.join(", ")
    };
    let missing_text = if missing.is_empty() {
        "specific technical skills".to_string()
    } else {
        missing.join(", ")
    };
    format!(
        "You have chosen {role} as your healthcare career goal. \
         To succeed in this field, it is important to strengthen {weak_text} first, \
         as these form the foundation. Learning {missing_text} next will help you meet \
         professional requirements. Finally, building a {role}-focused project will allow \
         you to apply your knowledge practically."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weak_before_missing_and_courses_before_projects() {
        let raw = build(
            "Cardiology",
            &names(&["ECG Interpretation"]),
            &names(&["Cardiac Anatomy"]),
        );
        let titles: Vec<&str> = raw.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "ECG Interpretation Course",
                "Anatomy of the Heart",
                "Arrhythmia Detection with PhysioNet Data",
                "Build a Cardiology-focused healthcare project",
            ]
        );
        assert_eq!(raw.items[0].purpose.as_deref(), Some("Improve ECG Interpretation"));
        assert_eq!(raw.items[1].purpose.as_deref(), Some("Learn Cardiac Anatomy"));
    }

    #[test]
    fn test_capstone_is_always_last() {
        let raw = build("Neurology", &[], &[]);
        assert_eq!(raw.items.len(), 1);
        let capstone = &raw.items[0];
        assert_eq!(capstone.kind, ItemKind::Project);
        assert_eq!(capstone.title, "Build a Neurology-focused healthcare project");
        assert_eq!(capstone.tags[0], "Neurology");
    }

    #[test]
    fn test_shared_resource_emitted_once() {
        let raw = build(
            "General Medicine",
            &names(&["Clinical Diagnosis"]),
            &names(&["Patient Counseling"]),
        );
        let count = raw
            .items
            .iter()
            .filter(|i| i.title == "Clinical Reasoning Masterclass")
            .count();
        assert_eq!(count, 1);
        let shared = raw
            .items
            .iter()
            .find(|i| i.title == "Clinical Reasoning Masterclass")
            .unwrap();
        assert_eq!(shared.purpose.as_deref(), Some("Improve Clinical Diagnosis"));
    }

    #[test]
    fn test_unknown_skill_contributes_nothing() {
        let raw = build("Orthopedics", &[], &names(&["Fracture Management"]));
        assert_eq!(raw.items.len(), 1);
    }

    #[test]
    fn test_explanation_without_gaps_congratulates() {
        let text = explain("Cardiology", &[], &[]);
        assert!(text.starts_with("Excellent work! You are well-prepared for a career in Cardiology."));
    }

    #[test]
    fn test_explanation_lists_weak_then_missing() {
        let text = explain("Cardiology", &names(&["A", "B"]), &[]);
        assert!(text.contains("strengthen A, B first"));
        assert!(text.contains("Learning specific technical skills next"));
        assert!(text.contains("building a Cardiology-focused project"));

        let text = explain("Cardiology", &[], &names(&["C"]));
        assert!(text.contains("strengthen core areas first"));
        assert!(text.contains("Learning C next"));
    }
}
