use std::collections::BTreeMap;

use super::domain::{Assessment, CategoryPoints, EligibilityStatus, VisaSubclass};
use super::rules;

/// Which scoring categories an update touched. Drives the selective
/// recompute in [`SubclassRules::rescore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedCategories {
    pub age: bool,
    pub english: bool,
    pub education: bool,
    pub experience: bool,
    pub australian_study: bool,
    pub specialist_education: bool,
    pub partner_skills: bool,
    pub community_language: bool,
    pub regional_study: bool,
    pub professional_year: bool,
}

impl ChangedCategories {
    pub fn any(&self) -> bool {
        self.age
            || self.english
            || self.education
            || self.experience
            || self.australian_study
            || self.specialist_education
            || self.partner_skills
            || self.community_language
            || self.regional_study
            || self.professional_year
    }
}

/// Scoring capability for one visa subclass: category points, the
/// eligibility threshold, and the verdict for a total.
pub trait SubclassRules: Send + Sync {
    fn subclass(&self) -> VisaSubclass;

    /// Minimum total points for a potentially-eligible verdict.
    fn threshold(&self) -> u32;

    /// Score every category from the assessment's current attributes.
    fn score(&self, assessment: &Assessment) -> CategoryPoints;

    /// Recompute only the categories whose inputs changed, carrying the
    /// remaining category fields forward unchanged.
    fn rescore(&self, assessment: &Assessment, changed: ChangedCategories) -> CategoryPoints;

    /// Verdict and audit note for a total. Pure in `total_points`.
    fn eligibility(&self, total_points: u32) -> (EligibilityStatus, String);
}

/// Points test for the Skilled Independent Visa (subclass 189).
#[derive(Debug, Default)]
pub struct Visa189Rules;

const VISA_189_THRESHOLD: u32 = 65;

impl SubclassRules for Visa189Rules {
    fn subclass(&self) -> VisaSubclass {
        VisaSubclass::Independent189
    }

    fn threshold(&self) -> u32 {
        VISA_189_THRESHOLD
    }

    fn score(&self, assessment: &Assessment) -> CategoryPoints {
        CategoryPoints {
            age: rules::age_points(assessment.age_value),
            english: rules::english_points(assessment.english_level),
            education: rules::education_points(assessment.education_level.as_deref()),
            experience: rules::experience_points(
                assessment.experience_overseas_years,
                assessment.experience_australia_years,
            ),
            australian_study: rules::australian_study_points(assessment.australian_study),
            specialist_education: rules::specialist_education_points(
                assessment.specialist_education,
            ),
            partner_skills: rules::partner_skills_points(
                assessment.partner_skilled,
                assessment.partner_competent_english,
            ),
            community_language: rules::community_language_points(assessment.community_language),
            regional_study: rules::regional_study_points(assessment.regional_study),
            professional_year: rules::professional_year_points(assessment.professional_year),
        }
    }

    fn rescore(&self, assessment: &Assessment, changed: ChangedCategories) -> CategoryPoints {
        let mut points = assessment.points;

        if changed.age {
            points.age = rules::age_points(assessment.age_value);
        }
        if changed.english {
            points.english = rules::english_points(assessment.english_level);
        }
        if changed.education {
            points.education = rules::education_points(assessment.education_level.as_deref());
        }
        if changed.experience {
            points.experience = rules::experience_points(
                assessment.experience_overseas_years,
                assessment.experience_australia_years,
            );
        }
        if changed.australian_study {
            points.australian_study = rules::australian_study_points(assessment.australian_study);
        }
        if changed.specialist_education {
            points.specialist_education =
                rules::specialist_education_points(assessment.specialist_education);
        }
        if changed.partner_skills {
            points.partner_skills = rules::partner_skills_points(
                assessment.partner_skilled,
                assessment.partner_competent_english,
            );
        }
        if changed.community_language {
            points.community_language =
                rules::community_language_points(assessment.community_language);
        }
        if changed.regional_study {
            points.regional_study = rules::regional_study_points(assessment.regional_study);
        }
        if changed.professional_year {
            points.professional_year =
                rules::professional_year_points(assessment.professional_year);
        }

        points
    }

    fn eligibility(&self, total_points: u32) -> (EligibilityStatus, String) {
        if total_points >= VISA_189_THRESHOLD {
            (
                EligibilityStatus::PotentiallyEligible,
                "Points requirement met. Further verification needed.".to_string(),
            )
        } else {
            (
                EligibilityStatus::NotEligible,
                format!(
                    "Minimum {VISA_189_THRESHOLD} points required. Current points: {total_points}"
                ),
            )
        }
    }
}

/// Rule sets keyed by visa subclass. Subclasses without an entry are
/// unsupported and must surface a hard error, never a silent zero score.
pub struct RuleSetRegistry {
    rules: BTreeMap<VisaSubclass, Box<dyn SubclassRules>>,
}

impl RuleSetRegistry {
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, rules: Box<dyn SubclassRules>) {
        self.rules.insert(rules.subclass(), rules);
    }

    pub fn get(&self, subclass: VisaSubclass) -> Option<&dyn SubclassRules> {
        self.rules.get(&subclass).map(Box::as_ref)
    }

    pub fn supports(&self, subclass: VisaSubclass) -> bool {
        self.rules.contains_key(&subclass)
    }
}

impl Default for RuleSetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Visa189Rules));
        registry
    }
}

impl std::fmt::Debug for RuleSetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSetRegistry")
            .field("subclasses", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
