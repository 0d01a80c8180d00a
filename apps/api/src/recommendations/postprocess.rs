//! Post-processing shared by both strategies: skill attribution, relevance
//! filtering, the one-item-per-skill cap, completion blocklist and the
//! generic fallback course. There is deliberately no cap on item count.

use std::collections::HashSet;

use crate::models::recommendation::{ItemKind, RecommendationItem};
use crate::recommendations::cache::Blocklist;

/// Leading phrases removed before matching a title/purpose to a skill. Each
/// must be followed by whitespace.
const PREFIX_WORDS: &[&str] = &["Improve", "Learn", "Build a", "Master", "Intro to", "Basics of"];

const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?auto=format&fit=crop&q=80&w=300&h=200";

/// Strips one leading phrase and the trailing "-focused healthcare project",
/// "Course" and "Project" markers, case-insensitively, then trims.
pub fn clean_skill_name(raw: &str) -> String {
    let mut s = raw;
    for word in PREFIX_WORDS {
        if let Some(rest) = strip_prefix_word(s, word) {
            s = rest;
            break;
        }
    }
    s = strip_suffix_ci(s, "-focused healthcare project").unwrap_or(s);
    s = strip_suffix_word(s, "Course").unwrap_or(s);
    s = strip_suffix_word(s, "Project").unwrap_or(s);
    s.trim().to_string()
}

fn strip_prefix_word<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let head = s.get(..word.len())?;
    if !head.eq_ignore_ascii_case(word) {
        return None;
    }
    let rest = &s[word.len()..];
    let trimmed = rest.trim_start();
    (trimmed.len() < rest.len()).then_some(trimmed)
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    let tail = s.get(cut..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..cut])
}

/// Like `strip_suffix_ci` but the word must be preceded by whitespace, which
/// is removed too.
fn strip_suffix_word<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let head = strip_suffix_ci(s, word)?;
    let trimmed = head.trim_end();
    (trimmed.len() < head.len()).then_some(trimmed)
}

/// Gap context the post-processing runs against.
pub struct GapTargets<'a> {
    pub role: &'a str,
    pub weak: &'a [String],
    pub missing: &'a [String],
}

impl GapTargets<'_> {
    /// Weak first, then missing. Fuzzy matching picks the first hit.
    fn ordered(&self) -> Vec<&str> {
        self.weak
            .iter()
            .chain(self.missing)
            .map(String::as_str)
            .collect()
    }

    fn has_gaps(&self) -> bool {
        !self.weak.is_empty() || !self.missing.is_empty()
    }
}

/// Snaps an item to a canonical gap skill: cleaned purpose (or title) is
/// matched by case-insensitive substring in either direction. Without a
/// match, the first tag wins, then the cleaned text, then "General".
pub fn derive_related_skill(item: &RecommendationItem, targets: &[&str]) -> String {
    let basis = item.purpose.as_deref().unwrap_or(&item.title);
    let cleaned = clean_skill_name(basis);

    if !cleaned.is_empty() {
        let lower = cleaned.to_lowercase();
        let hit = targets.iter().find(|t| {
            let t = t.to_lowercase();
            !t.is_empty() && (lower.contains(&t) || t.contains(&lower))
        });
        if let Some(hit) = hit {
            return hit.to_string();
        }
    }

    item.tags
        .iter()
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| (!cleaned.is_empty()).then_some(cleaned))
        .unwrap_or_else(|| "General".to_string())
}

/// True if purpose, title or any tag mentions one of the target skills.
fn is_relevant(item: &RecommendationItem, targets: &[&str]) -> bool {
    let purpose = item.purpose.as_deref().unwrap_or_default().to_lowercase();
    let title = item.title.to_lowercase();
    let tags: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();

    targets.iter().any(|target| {
        let target = target.to_lowercase();
        purpose.contains(&target)
            || title.contains(&target)
            || tags.iter().any(|t| t.contains(&target))
    })
}

fn placeholder_image(item: &RecommendationItem, index: usize) -> String {
    let topic = item
        .tags
        .first()
        .map(String::as_str)
        .unwrap_or("technology");
    format!("https://source.unsplash.com/random/300x200?{topic},{index}")
}

fn fallback_course(targets: &GapTargets<'_>) -> RecommendationItem {
    let related = targets
        .missing
        .first()
        .or_else(|| targets.weak.first())
        .cloned()
        .unwrap_or_else(|| "Foundations".to_string());
    let mut item = RecommendationItem::new(
        ItemKind::Course,
        format!("Essentials of {}", targets.role),
        "MedSkill Navigator Recommended",
    )
    .with_tags(["Core Skill"]);
    item.duration = Some("4 Weeks".to_string());
    item.rating = Some(4.8);
    item.related_skill = Some(related);
    item.image = Some(FALLBACK_IMAGE.to_string());
    item
}

fn fill_search_query(item: &mut RecommendationItem) {
    if item.search_query.as_deref().map_or(true, |q| q.trim().is_empty()) {
        item.search_query = Some(format!(
            "{} {} {}",
            item.title,
            item.provider,
            item.kind.as_str()
        ));
    }
}

/// Runs the full post-processing pipeline over a raw strategy output.
///
/// 1. attribute each item to a skill
/// 2. drop courses not about any gap skill (projects always pass)
/// 3. keep the first item per related skill
/// 4. drop blocklisted titles
/// 5. synthesize "Essentials of {role}" if nothing is left but gaps remain
/// 6. fill placeholder images and search queries
pub fn finalize(
    raw: Vec<RecommendationItem>,
    targets: &GapTargets<'_>,
    blocklist: &Blocklist,
) -> Vec<RecommendationItem> {
    let ordered = targets.ordered();
    let mut seen_skills: HashSet<String> = HashSet::new();
    let mut processed = Vec::new();

    for (index, mut item) in raw.into_iter().enumerate() {
        let related = derive_related_skill(&item, &ordered);

        if item.kind == ItemKind::Course && !is_relevant(&item, &ordered) {
            continue;
        }
        if !seen_skills.insert(related.clone()) {
            continue;
        }
        if blocklist.contains(&item.title) {
            continue;
        }

        if item.image.as_deref().map_or(true, |i| i.trim().is_empty()) {
            item.image = Some(placeholder_image(&item, index));
        }
        item.related_skill = Some(related);
        fill_search_query(&mut item);
        processed.push(item);
    }

    if processed.is_empty() && targets.has_gaps() {
        let mut fallback = fallback_course(targets);
        fill_search_query(&mut fallback);
        processed.push(fallback);
    }

    processed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, tags: &[&str]) -> RecommendationItem {
        RecommendationItem::new(ItemKind::Course, title, "Coursera").with_tags(tags.iter().copied())
    }

    fn project(title: &str, tags: &[&str]) -> RecommendationItem {
        RecommendationItem::new(ItemKind::Project, title, "Kaggle").with_tags(tags.iter().copied())
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_skill_name_strips_prefixes() {
        assert_eq!(clean_skill_name("Improve ECG Interpretation"), "ECG Interpretation");
        assert_eq!(clean_skill_name("learn   GIS Mapping"), "GIS Mapping");
        assert_eq!(clean_skill_name("Intro to Soil Science"), "Soil Science");
        assert_eq!(clean_skill_name("Basics of Neuroanatomy"), "Neuroanatomy");
        assert_eq!(clean_skill_name("Master Urban Planning"), "Urban Planning");
    }

    #[test]
    fn test_clean_skill_name_strips_suffixes() {
        assert_eq!(
            clean_skill_name("Build a Cardiology-focused healthcare project"),
            "Cardiology"
        );
        assert_eq!(clean_skill_name("ECG Interpretation Course"), "ECG Interpretation");
        assert_eq!(clean_skill_name("GIS Mapping project"), "GIS Mapping");
    }

    #[test]
    fn test_clean_skill_name_needs_word_boundary() {
        assert_eq!(clean_skill_name("Learning Analytics"), "Learning Analytics");
        assert_eq!(clean_skill_name("Watercourse"), "Watercourse");
        assert_eq!(clean_skill_name("Improve"), "Improve");
    }

    #[test]
    fn test_related_skill_snaps_to_target() {
        let item = course("Anything", &["misc"]).with_purpose("Improve ecg interpretation");
        assert_eq!(
            derive_related_skill(&item, &["ECG Interpretation"]),
            "ECG Interpretation"
        );
        let item = course("EEG Analysis Deep Dive Course", &[]);
        assert_eq!(derive_related_skill(&item, &["EEG Analysis"]), "EEG Analysis");
    }

    #[test]
    fn test_related_skill_falls_back_to_tag_then_general() {
        let item = project("Build a Neurology-focused healthcare project", &["Neurology"]);
        assert_eq!(derive_related_skill(&item, &["EEG Analysis"]), "Neurology");
        let item = project("Improve", &[]);
        assert_eq!(derive_related_skill(&item, &[]), "Improve");
        let item = project("Course", &[]);
        assert_eq!(derive_related_skill(&item, &[]), "Course");
        let item = project("   ", &[]);
        assert_eq!(derive_related_skill(&item, &[]), "General");
    }

    #[test]
    fn test_irrelevant_course_dropped_project_kept() {
        let weak = strings(&["ECG Interpretation"]);
        let targets = GapTargets { role: "Cardiology", weak: &weak, missing: &[] };
        let raw = vec![
            course("Photography for Beginners", &["Art"]),
            project("Portfolio Website", &["Web"]),
        ];
        let out = finalize(raw, &targets, &Blocklist::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Portfolio Website");
    }

    #[test]
    fn test_one_item_per_related_skill() {
        let missing = strings(&["GIS Mapping"]);
        let targets = GapTargets { role: "Smart City & Urban Systems", weak: &[], missing: &missing };
        let raw = vec![
            course("GIS Mapping with QGIS", &["GIS Mapping"]),
            course("Advanced GIS Mapping", &["GIS Mapping"]),
            project("Map Urban Green Spaces", &["GIS Mapping"]),
        ];
        let out = finalize(raw, &targets, &Blocklist::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "GIS Mapping with QGIS");
        assert_eq!(out[0].related_skill.as_deref(), Some("GIS Mapping"));
    }

    #[test]
    fn test_blocklisted_titles_removed() {
        let missing = strings(&["Soil Science", "IoT Sensors"]);
        let targets = GapTargets { role: "Agricultural Technology", weak: &[], missing: &missing };
        let raw = vec![
            course("Soil Science Essentials", &["Soil Science"]),
            course("Introduction to the Internet of Things", &["IoT Sensors"]),
        ];
        let blocklist = Blocklist::from_titles(["Soil Science Essentials"]);
        let out = finalize(raw, &targets, &blocklist);
        let titles: Vec<&str> = out.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction to the Internet of Things"]);
    }

    #[test]
    fn test_fallback_course_when_nothing_survives() {
        let weak = strings(&["Prenatal Care"]);
        let missing = strings(&["Obstetric Ultrasound"]);
        let targets = GapTargets { role: "Gynecology & Obstetrics", weak: &weak, missing: &missing };
        let out = finalize(vec![course("Unrelated", &[])], &targets, &Blocklist::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Essentials of Gynecology & Obstetrics");
        assert_eq!(out[0].related_skill.as_deref(), Some("Obstetric Ultrasound"));
        assert_eq!(out[0].image.as_deref(), Some(FALLBACK_IMAGE));
    }

    #[test]
    fn test_no_fallback_without_gaps() {
        let targets = GapTargets { role: "Cardiology", weak: &[], missing: &[] };
        let out = finalize(vec![course("Unrelated", &[])], &targets, &Blocklist::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_placeholder_image_and_search_query() {
        let missing = strings(&["Data Analysis"]);
        let targets = GapTargets { role: "Smart City & Urban Systems", weak: &[], missing: &missing };
        let mut with_image = project("City Air Quality Analysis", &["Data Analysis"]);
        with_image.image = Some("https://example.org/a.png".to_string());
        let raw = vec![
            course("Data Analysis with Python", &["Data Analysis"]),
            project("Traffic Sensor Study", &[]),
        ];
        let out = finalize(raw, &targets, &Blocklist::default());
        assert_eq!(
            out[0].image.as_deref(),
            Some("https://source.unsplash.com/random/300x200?Data Analysis,0")
        );
        assert_eq!(
            out[1].image.as_deref(),
            Some("https://source.unsplash.com/random/300x200?technology,1")
        );
        assert_eq!(
            out[0].search_query.as_deref(),
            Some("Data Analysis with Python Coursera course")
        );

        let out = finalize(vec![with_image], &targets, &Blocklist::default());
        assert_eq!(out[0].image.as_deref(), Some("https://example.org/a.png"));
    }

    #[test]
    fn test_no_hard_limit_on_item_count() {
        let missing: Vec<String> = (b'A'..=b'L').map(|c| format!("Skill {}", c as char)).collect();
        let targets = GapTargets { role: "Cardiology", weak: &[], missing: &missing };
        let raw: Vec<RecommendationItem> = missing
            .iter()
            .map(|s| course(&format!("{s} Course"), &[s.as_str()]))
            .collect();
        let out = finalize(raw, &targets, &Blocklist::default());
        assert_eq!(out.len(), 12);
    }
}
