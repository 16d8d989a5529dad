//! Points assessment: applicant normalization, per-subclass rule sets, and
//! the assessment lifecycle (full scoring plus partial re-scoring).

pub mod domain;
pub mod engine;
pub mod normalize;
pub mod registry;
pub(crate) mod rules;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantAttributes, Assessment, AssessmentId, AssessmentStatus, CategoryPoints,
    EducationEntry, EligibilityStatus, EnglishAttributes, EnglishLevel, EnglishScores,
    ExperienceEntry, OccupationSelection, VisaSubclass,
};
pub use engine::{AssessmentEngine, AssessmentError, AssessmentRequest, AssessmentUpdate};
pub use normalize::{ApplicantSnapshot, UNKNOWN_DATE};
pub use registry::{ChangedCategories, RuleSetRegistry, SubclassRules, Visa189Rules};
