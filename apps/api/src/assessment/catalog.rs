//! Role catalog: the fixed mapping from career titles to required skills,
//! plus the title-resolution rules used by every screen.

use std::collections::HashMap;

use serde::Serialize;

use crate::assessment::gap::RequiredSkill;
use crate::assessment::level::SkillLevel;
use crate::models::profile::{Domain, Goal};

pub const HEALTHCARE_TECHNOLOGY: &str = "Healthcare Technology";
pub const AGRICULTURAL_TECHNOLOGY: &str = "Agricultural Technology";
pub const SMART_CITY: &str = "Smart City & Urban Systems";
pub const AYUSH: &str = "AYUSH";

/// Alternative-medicine specializations that share the AYUSH requirements.
pub const ALTERNATIVE_MEDICINE_TITLES: &[&str] = &[
    "Ayurveda",
    "Homeopathy",
    "Unani Medicine",
    "Siddha Medicine",
    "Yoga & Naturopathy",
    "Ayurvedic Pharmacy & Herbal Technology",
    "Integrative Medicine (Allopathy + AYUSH)",
];

pub const MODERN_MEDICINE_TITLES: &[&str] = &[
    "Gynecology & Obstetrics",
    "Orthopedics",
    "Pediatrics",
    "General Medicine",
    "General Surgery",
    "Cardiology",
    "Neurology",
    "Dermatology",
    "Psychiatry",
    "Anesthesiology",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSkill {
    pub name: &'static str,
    pub level: SkillLevel,
}

const fn skill(name: &'static str, level: SkillLevel) -> CatalogSkill {
    CatalogSkill { name, level }
}

use SkillLevel::{Advanced as ADV, Beginner as BEG, Intermediate as INT};

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Role {
    pub title: &'static str,
    pub core: &'static [CatalogSkill],
    pub technical: &'static [CatalogSkill],
    pub supporting: &'static [CatalogSkill],
}

impl Role {
    /// Core, then technical, then supporting. Downstream tie-breaks rely on
    /// this order.
    pub fn required_skills(&self) -> Vec<RequiredSkill> {
        self.core
            .iter()
            .chain(self.technical)
            .chain(self.supporting)
            .map(|s| RequiredSkill::new(s.name, s.level.as_str()))
            .collect()
    }
}

static ROLES: &[Role] = &[
    Role {
        title: HEALTHCARE_TECHNOLOGY,
        core: &[
            skill("Medical Terminology", INT),
            skill("Patient Care Systems", INT),
        ],
        technical: &[
            skill("Health Informatics", INT),
            skill("Biomedical Basics", BEG),
        ],
        supporting: &[skill("Healthcare Data Privacy", BEG)],
    },
    Role {
        title: AGRICULTURAL_TECHNOLOGY,
        core: &[skill("IoT Sensors", INT), skill("Soil Science", INT)],
        technical: &[
            skill("Precision Agriculture", INT),
            skill("Data Analysis", BEG),
        ],
        supporting: &[skill("Sustainable Farming", BEG)],
    },
    Role {
        title: SMART_CITY,
        core: &[skill("Data Analysis", INT), skill("Urban Planning", INT)],
        technical: &[skill("GIS Mapping", ADV), skill("IoT Sensors", INT)],
        supporting: &[skill("Public Policy", BEG)],
    },
    Role {
        title: "Gynecology & Obstetrics",
        core: &[
            skill("Reproductive Anatomy", INT),
            skill("Prenatal Care", ADV),
        ],
        technical: &[
            skill("Obstetric Ultrasound", INT),
            skill("Clinical Diagnosis", ADV),
        ],
        supporting: &[skill("Patient Counseling", INT)],
    },
    Role {
        title: "Orthopedics",
        core: &[
            skill("Musculoskeletal Anatomy", ADV),
            skill("Fracture Management", INT),
        ],
        technical: &[
            skill("Radiographic Interpretation", INT),
            skill("Surgical Techniques", INT),
        ],
        supporting: &[skill("Rehabilitation Planning", BEG)],
    },
    Role {
        title: "Pediatrics",
        core: &[
            skill("Child Development", INT),
            skill("Pediatric Pharmacology", INT),
        ],
        technical: &[
            skill("Clinical Diagnosis", ADV),
            skill("Immunization Protocols", INT),
        ],
        supporting: &[skill("Patient Counseling", INT)],
    },
    Role {
        title: "General Medicine",
        core: &[
            skill("Clinical Diagnosis", ADV),
            skill("Pharmacology", INT),
        ],
        technical: &[
            skill("Medical Terminology", INT),
            skill("Laboratory Interpretation", INT),
        ],
        supporting: &[skill("Patient Counseling", INT)],
    },
    Role {
        title: "General Surgery",
        core: &[
            skill("Surgical Anatomy", ADV),
            skill("Surgical Techniques", ADV),
        ],
        technical: &[
            skill("Sterile Technique", INT),
            skill("Clinical Diagnosis", INT),
        ],
        supporting: &[skill("Post-operative Care", INT)],
    },
    Role {
        title: "Cardiology",
        core: &[
            skill("Cardiac Anatomy", INT),
            skill("ECG Interpretation", INT),
        ],
        technical: &[
            skill("Clinical Diagnosis", ADV),
            skill("Echocardiography", BEG),
        ],
        supporting: &[skill("Patient Counseling", INT)],
    },
    Role {
        title: "Neurology",
        core: &[skill("Neuroanatomy", INT), skill("EEG Analysis", ADV)],
        technical: &[
            skill("Clinical Diagnosis", ADV),
            skill("Neuroimaging", INT),
        ],
        supporting: &[skill("Patient Counseling", INT)],
    },
    Role {
        title: "Dermatology",
        core: &[
            skill("Skin Pathology", INT),
            skill("Dermatoscopy", INT),
        ],
        technical: &[
            skill("Clinical Diagnosis", ADV),
            skill("Cosmetic Procedures", BEG),
        ],
        supporting: &[skill("Patient Counseling", INT)],
    },
    Role {
        title: "Psychiatry",
        core: &[
            skill("Psychopathology", ADV),
            skill("Psychopharmacology", INT),
        ],
        technical: &[
            skill("Psychotherapy Techniques", INT),
            skill("Clinical Diagnosis", INT),
        ],
        supporting: &[skill("Patient Counseling", ADV)],
    },
    Role {
        title: "Anesthesiology",
        core: &[
            skill("Anesthetic Pharmacology", ADV),
            skill("Airway Management", ADV),
        ],
        technical: &[
            skill("Patient Monitoring", INT),
            skill("Pain Management", INT),
        ],
        supporting: &[skill("Critical Care Basics", BEG)],
    },
    Role {
        title: AYUSH,
        core: &[
            skill("Ayurvedic Principles", INT),
            skill("Herbal Pharmacology", INT),
        ],
        technical: &[
            skill("Traditional Diagnosis Methods", INT),
            skill("Yoga Therapy", BEG),
        ],
        supporting: &[
            skill("Integrative Care Coordination", BEG),
            skill("Patient Counseling", INT),
        ],
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct DomainChoice {
    pub id: Domain,
    pub title: &'static str,
}

/// Titles offered on the goal screen.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub domains: Vec<DomainChoice>,
    pub modern: Vec<&'static str>,
    pub ayush: Vec<&'static str>,
}

/// Immutable title → role mapping with the fallback rules attached.
pub struct RoleCatalog {
    roles: HashMap<&'static str, &'static Role>,
    alternative_medicine: &'static [&'static str],
    fallback: &'static Role,
}

impl RoleCatalog {
    pub fn builtin() -> Self {
        let roles: HashMap<&'static str, &'static Role> =
            ROLES.iter().map(|r| (r.title, r)).collect();
        let fallback = ROLES
            .iter()
            .find(|r| r.title == HEALTHCARE_TECHNOLOGY)
            .unwrap_or(&ROLES[0]);
        Self {
            roles,
            alternative_medicine: ALTERNATIVE_MEDICINE_TITLES,
            fallback,
        }
    }

    /// Generic title for a domain; `None` for unrecognized domains.
    pub fn domain_title(domain: Domain) -> Option<&'static str> {
        match domain {
            Domain::Health => Some(HEALTHCARE_TECHNOLOGY),
            Domain::Agri => Some(AGRICULTURAL_TECHNOLOGY),
            Domain::City => Some(SMART_CITY),
            Domain::Unknown => None,
        }
    }

    /// Effective title for a goal: specialization, else the domain's generic
    /// title, else Healthcare Technology. Blank specializations count as unset.
    pub fn resolve_title(goal: Option<&Goal>) -> String {
        let specialization = goal
            .and_then(|g| g.specialization.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(spec) = specialization {
            return spec.to_string();
        }
        goal.and_then(|g| g.domain)
            .and_then(Self::domain_title)
            .unwrap_or(HEALTHCARE_TECHNOLOGY)
            .to_string()
    }

    pub fn lookup(&self, title: &str) -> Option<&'static Role> {
        self.roles.get(title).copied()
    }

    /// Direct entry, else AYUSH for alternative-medicine titles, else the
    /// generic Healthcare Technology role.
    pub fn resolve(&self, title: &str) -> &'static Role {
        if let Some(role) = self.lookup(title) {
            return role;
        }
        if self.alternative_medicine.contains(&title) {
            if let Some(role) = self.lookup(AYUSH) {
                return role;
            }
        }
        self.fallback
    }

    /// Requested title (shown on screens and used in the recommendation
    /// signature) paired with the role that actually serves it.
    pub fn resolve_goal(&self, goal: Option<&Goal>) -> (String, &'static Role) {
        let title = Self::resolve_title(goal);
        let role = self.resolve(&title);
        (title, role)
    }

    pub fn listing(&self) -> CatalogListing {
        CatalogListing {
            domains: [Domain::Health, Domain::Agri, Domain::City]
                .into_iter()
                .filter_map(|d| Self::domain_title(d).map(|title| DomainChoice { id: d, title }))
                .collect(),
            modern: MODERN_MEDICINE_TITLES.to_vec(),
            ayush: self.alternative_medicine.to_vec(),
        }
    }
}
