//! Static skill → resources table used by the local strategy.
//!
//! Keys are exact catalog skill names. Skills without an entry contribute
//! nothing; the post-processing fallback covers that case.

use crate::models::recommendation::{ItemKind, RecommendationItem};

#[derive(Debug)]
pub struct Resource {
    pub title: &'static str,
    pub provider: &'static str,
    pub tags: &'static [&'static str],
    pub duration: Option<&'static str>,
    pub rating: Option<f32>,
}

impl Resource {
    pub fn to_item(&self, kind: ItemKind) -> RecommendationItem {
        let mut item = RecommendationItem::new(kind, self.title, self.provider)
            .with_tags(self.tags.iter().copied());
        item.duration = self.duration.map(str::to_string);
        item.rating = self.rating;
        item
    }
}

#[derive(Debug)]
pub struct SkillResources {
    pub skill: &'static str,
    pub courses: &'static [Resource],
    pub projects: &'static [Resource],
}

const fn course(
    title: &'static str,
    provider: &'static str,
    tags: &'static [&'static str],
    duration: &'static str,
    rating: f32,
) -> Resource {
    Resource {
        title,
        provider,
        tags,
        duration: Some(duration),
        rating: Some(rating),
    }
}

const fn project(
    title: &'static str,
    provider: &'static str,
    tags: &'static [&'static str],
) -> Resource {
    Resource {
        title,
        provider,
        tags,
        duration: None,
        rating: None,
    }
}

const CLINICAL_REASONING: Resource = course(
    "Clinical Reasoning Masterclass",
    "Coursera",
    &["Clinical Diagnosis", "Patient Counseling"],
    "6 Weeks",
    4.7,
);

static TABLE: &[SkillResources] = &[
    SkillResources {
        skill: "Medical Terminology",
        courses: &[course(
            "Medical Terminology Course",
            "Coursera",
            &["Medical Terminology", "Basics"],
            "4 Weeks",
            4.6,
        )],
        projects: &[project(
            "Clinical Glossary Flashcard App",
            "Self-paced",
            &["Medical Terminology"],
        )],
    },
    SkillResources {
        skill: "Patient Care Systems",
        courses: &[course(
            "Introduction to Electronic Health Records",
            "edX",
            &["Patient Care Systems", "EHR"],
            "5 Weeks",
            4.5,
        )],
        projects: &[project(
            "Build a Patient Intake Workflow",
            "Self-paced",
            &["Patient Care Systems"],
        )],
    },
    SkillResources {
        skill: "Health Informatics",
        courses: &[course(
            "Health Informatics Specialization",
            "Johns Hopkins on Coursera",
            &["Health Informatics"],
            "8 Weeks",
            4.7,
        )],
        projects: &[project(
            "Hospital Readmission Dashboard",
            "Kaggle",
            &["Health Informatics", "Data Analysis"],
        )],
    },
    SkillResources {
        skill: "Cardiac Anatomy",
        courses: &[course(
            "Anatomy of the Heart",
            "Osmosis",
            &["Cardiac Anatomy", "Basics"],
            "3 Weeks",
            4.8,
        )],
        projects: &[],
    },
    SkillResources {
        skill: "ECG Interpretation",
        courses: &[course(
            "ECG Interpretation Course",
            "Udemy",
            &["ECG Interpretation"],
            "4 Weeks",
            4.6,
        )],
        projects: &[project(
            "Arrhythmia Detection with PhysioNet Data",
            "PhysioNet",
            &["ECG Interpretation", "Data Analysis"],
        )],
    },
    SkillResources {
        skill: "Clinical Diagnosis",
        courses: &[CLINICAL_REASONING],
        projects: &[project(
            "Differential Diagnosis Case Journal",
            "Self-paced",
            &["Clinical Diagnosis"],
        )],
    },
    SkillResources {
        skill: "Patient Counseling",
        courses: &[CLINICAL_REASONING],
        projects: &[],
    },
    SkillResources {
        skill: "EEG Analysis",
        courses: &[course(
            "Fundamentals of EEG",
            "Coursera",
            &["EEG Analysis"],
            "5 Weeks",
            4.5,
        )],
        projects: &[project(
            "Seizure Detection from EEG Signals",
            "Kaggle",
            &["EEG Analysis", "Data Analysis"],
        )],
    },
    SkillResources {
        skill: "Neuroanatomy",
        courses: &[course(
            "Medical Neuroscience",
            "Duke on Coursera",
            &["Neuroanatomy"],
            "12 Weeks",
            4.9,
        )],
        projects: &[],
    },
    SkillResources {
        skill: "IoT Sensors",
        courses: &[course(
            "Introduction to the Internet of Things",
            "edX",
            &["IoT Sensors", "Basics"],
            "6 Weeks",
            4.4,
        )],
        projects: &[project(
            "Soil Moisture Sensor Network",
            "Self-paced",
            &["IoT Sensors", "Soil Science"],
        )],
    },
    SkillResources {
        skill: "Soil Science",
        courses: &[course(
            "Soil Science Essentials",
            "FutureLearn",
            &["Soil Science"],
            "4 Weeks",
            4.3,
        )],
        projects: &[],
    },
    SkillResources {
        skill: "Data Analysis",
        courses: &[course(
            "Data Analysis with Python",
            "freeCodeCamp",
            &["Data Analysis", "Python"],
            "6 Weeks",
            4.7,
        )],
        projects: &[project(
            "City Air Quality Analysis",
            "Kaggle",
            &["Data Analysis"],
        )],
    },
    SkillResources {
        skill: "Urban Planning",
        courses: &[course(
            "Urban Planning Fundamentals",
            "edX",
            &["Urban Planning"],
            "6 Weeks",
            4.5,
        )],
        projects: &[],
    },
    SkillResources {
        skill: "GIS Mapping",
        courses: &[course(
            "GIS Mapping with QGIS",
            "Udemy",
            &["GIS Mapping"],
            "5 Weeks",
            4.6,
        )],
        projects: &[project(
            "Map Urban Green Spaces",
            "OpenStreetMap",
            &["GIS Mapping", "Urban Planning"],
        )],
    },
    SkillResources {
        skill: "Ayurvedic Principles",
        courses: &[course(
            "Foundations of Ayurveda",
            "AYUSH Ministry e-Learning",
            &["Ayurvedic Principles", "Basics"],
            "6 Weeks",
            4.5,
        )],
        projects: &[],
    },
    SkillResources {
        skill: "Herbal Pharmacology",
        courses: &[course(
            "Medicinal Plants and Herbal Pharmacology",
            "SWAYAM",
            &["Herbal Pharmacology"],
            "8 Weeks",
            4.4,
        )],
        projects: &[project(
            "Herbal Formulation Reference Database",
            "Self-paced",
            &["Herbal Pharmacology"],
        )],
    },
];

pub fn resources_for(skill: &str) -> Option<&'static SkillResources> {
    TABLE.iter().find(|r| r.skill == skill)
}
