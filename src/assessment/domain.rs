use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessment records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Skilled-migration visa subclasses known to the core. Only subclasses
/// registered with a rule set can be scored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum VisaSubclass {
    #[serde(rename = "189")]
    Independent189,
    #[serde(rename = "190")]
    Nominated190,
    #[serde(rename = "491")]
    Regional491,
    #[serde(rename = "186")]
    EmployerNomination186,
    #[serde(rename = "482")]
    SkillShortage482,
    #[serde(rename = "500")]
    Student500,
}

impl VisaSubclass {
    pub const fn code(self) -> &'static str {
        match self {
            VisaSubclass::Independent189 => "189",
            VisaSubclass::Nominated190 => "190",
            VisaSubclass::Regional491 => "491",
            VisaSubclass::EmployerNomination186 => "186",
            VisaSubclass::SkillShortage482 => "482",
            VisaSubclass::Student500 => "500",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            VisaSubclass::Independent189 => "Skilled Independent Visa",
            VisaSubclass::Nominated190 => "Skilled Nominated Visa",
            VisaSubclass::Regional491 => "Skilled Work Regional (Provisional) Visa",
            VisaSubclass::EmployerNomination186 => "Employer Nomination Scheme",
            VisaSubclass::SkillShortage482 => "Temporary Skill Shortage Visa",
            VisaSubclass::Student500 => "Student Visa",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "189" => Some(VisaSubclass::Independent189),
            "190" => Some(VisaSubclass::Nominated190),
            "491" => Some(VisaSubclass::Regional491),
            "186" => Some(VisaSubclass::EmployerNomination186),
            "482" => Some(VisaSubclass::SkillShortage482),
            "500" => Some(VisaSubclass::Student500),
            _ => None,
        }
    }
}

/// Lifecycle status tracked on an assessment. The core never closes or
/// archives a record; that belongs to the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    Scored,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::Scored => "scored",
        }
    }
}

/// Verdict derived from total points against the subclass threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Undetermined,
    PotentiallyEligible,
    NotEligible,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Undetermined => "undetermined",
            EligibilityStatus::PotentiallyEligible => "potentially_eligible",
            EligibilityStatus::NotEligible => "not_eligible",
        }
    }
}

/// English proficiency bands recognised by the points tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnglishLevel {
    Superior,
    Proficient,
    Competent,
}

impl EnglishLevel {
    /// Lenient parse for extractor output ("Superior", " proficient ", ...).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "superior" => Some(EnglishLevel::Superior),
            "proficient" => Some(EnglishLevel::Proficient),
            "competent" => Some(EnglishLevel::Competent),
            _ => None,
        }
    }
}

/// Applicant attributes as delivered by the CV extraction step. Loosely
/// typed on purpose; normalization turns this into scoring inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantAttributes {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub age: Option<u8>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub english: Option<EnglishAttributes>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub level: Option<String>,
    pub field: Option<String>,
    pub institution: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration_years: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnglishAttributes {
    pub level: Option<String>,
    pub test: Option<String>,
    pub scores: Option<EnglishScores>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnglishScores {
    pub overall: Option<f32>,
    pub reading: Option<f32>,
    pub writing: Option<f32>,
    pub speaking: Option<f32>,
    pub listening: Option<f32>,
}

/// Per-category point fields. The total is always recomputed from the
/// current fields, never accumulated incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPoints {
    pub age: u32,
    pub english: u32,
    pub education: u32,
    pub experience: u32,
    pub australian_study: u32,
    pub specialist_education: u32,
    pub partner_skills: u32,
    pub community_language: u32,
    pub regional_study: u32,
    pub professional_year: u32,
}

impl CategoryPoints {
    /// Fresh sum of every category field.
    pub fn total(&self) -> u32 {
        self.age
            + self.english
            + self.education
            + self.experience
            + self.australian_study
            + self.specialist_education
            + self.partner_skills
            + self.community_language
            + self.regional_study
            + self.professional_year
    }
}

/// Occupation metadata attached to an assessment. Optional; never a
/// scoring input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationSelection {
    pub code: String,
    pub name: String,
}

/// The assessment record owned by the engine. Mutated in place by
/// re-scoring; deletion is a storage-layer concern.
///
/// Invariants held after every mutation: `total_points` equals
/// `points.total()`, and `eligibility_status` is a pure function of
/// `total_points` and the subclass threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub user_id: String,
    pub client_id: String,
    pub document_id: Option<String>,
    pub visa_subclass: VisaSubclass,
    pub visa_name: String,
    pub occupation_code: Option<String>,
    pub occupation_name: Option<String>,
    pub status: AssessmentStatus,
    pub eligibility_status: EligibilityStatus,
    pub eligibility_notes: String,

    pub age_value: Option<u8>,
    pub english_level: Option<EnglishLevel>,
    pub english_test: Option<String>,
    pub education_level: Option<String>,
    pub education_field: Option<String>,
    pub experience_overseas_years: f32,
    pub experience_australia_years: f32,
    pub australian_study: bool,
    pub specialist_education: bool,
    pub partner_skilled: bool,
    pub partner_competent_english: bool,
    pub community_language: bool,
    pub regional_study: bool,
    pub professional_year: bool,

    pub points: CategoryPoints,
    pub total_points: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
