use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::domain::{
    ApplicantAttributes, Assessment, AssessmentId, AssessmentStatus, CategoryPoints,
    EligibilityStatus, EnglishLevel, OccupationSelection, VisaSubclass,
};
use super::normalize;
use super::registry::{ChangedCategories, RuleSetRegistry, SubclassRules};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("va-{id:06}"))
}

/// Inputs for a new assessment. Occupation is optional metadata carried on
/// the record; it never feeds the score.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub user_id: String,
    pub client_id: String,
    pub document_id: Option<String>,
    pub visa_subclass: VisaSubclass,
    pub occupation: Option<OccupationSelection>,
    pub applicant: ApplicantAttributes,
}

/// Partial update applied during re-scoring. Identity, ownership, and the
/// creation timestamp are not expressible here; loose payloads naming them
/// are rejected by [`AssessmentUpdate::from_json`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssessmentUpdate {
    pub document_id: Option<String>,
    pub occupation_code: Option<String>,
    pub occupation_name: Option<String>,
    pub age_value: Option<u8>,
    pub english_level: Option<EnglishLevel>,
    pub english_test: Option<String>,
    pub education_level: Option<String>,
    pub education_field: Option<String>,
    pub experience_overseas_years: Option<f32>,
    pub experience_australia_years: Option<f32>,
    pub australian_study: Option<bool>,
    pub specialist_education: Option<bool>,
    pub partner_skilled: Option<bool>,
    pub partner_competent_english: Option<bool>,
    pub community_language: Option<bool>,
    pub regional_study: Option<bool>,
    pub professional_year: Option<bool>,
}

const PROTECTED_FIELDS: [&str; 3] = ["id", "user_id", "created_at"];

impl AssessmentUpdate {
    /// Parse a loose JSON payload, rejecting protected and unknown fields.
    pub fn from_json(payload: serde_json::Value) -> Result<Self, AssessmentError> {
        if let Some(object) = payload.as_object() {
            for field in PROTECTED_FIELDS {
                if object.contains_key(field) {
                    return Err(AssessmentError::ProtectedField(field.to_string()));
                }
            }
        }

        serde_json::from_value(payload)
            .map_err(|err| AssessmentError::MalformedUpdate(err.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("unsupported visa subclass {code}: no rule set registered", code = .0.code())]
    UnsupportedSubclass(VisaSubclass),
    #[error("field '{0}' is protected and cannot be updated")]
    ProtectedField(String),
    #[error("malformed update payload: {0}")]
    MalformedUpdate(String),
}

/// Owns the assessment lifecycle: creation with a full scoring pass, and
/// partial re-scoring when attributes change later.
///
/// The engine holds no per-assessment state and performs no locking;
/// concurrent updates to the *same* assessment record must be serialised
/// by the caller.
#[derive(Debug, Default)]
pub struct AssessmentEngine {
    registry: RuleSetRegistry,
}

impl AssessmentEngine {
    pub fn new(registry: RuleSetRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleSetRegistry {
        &self.registry
    }

    /// Create and fully score an assessment against the current wall
    /// clock. Open-ended ("present") experience is measured against
    /// today, so re-running months later can move duration-derived
    /// points; use [`Self::score_assessment_as_of`] to pin the date.
    pub fn score_assessment(
        &self,
        request: AssessmentRequest,
    ) -> Result<Assessment, AssessmentError> {
        self.score_assessment_as_of(request, Utc::now())
    }

    pub fn score_assessment_as_of(
        &self,
        request: AssessmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Assessment, AssessmentError> {
        let rules = self.rules_for(request.visa_subclass)?;
        let snapshot = normalize::snapshot(&request.applicant, now.date_naive());

        let (occupation_code, occupation_name) = match request.occupation {
            Some(selection) => (Some(selection.code), Some(selection.name)),
            None => (None, None),
        };

        let mut assessment = Assessment {
            id: next_assessment_id(),
            user_id: request.user_id,
            client_id: request.client_id,
            document_id: request.document_id,
            visa_subclass: request.visa_subclass,
            visa_name: request.visa_subclass.display_name().to_string(),
            occupation_code,
            occupation_name,
            status: AssessmentStatus::Draft,
            eligibility_status: EligibilityStatus::Undetermined,
            eligibility_notes: String::new(),
            age_value: snapshot.age,
            english_level: snapshot.english_level,
            english_test: snapshot.english_test,
            education_level: snapshot.education_level,
            education_field: snapshot.education_field,
            experience_overseas_years: snapshot.experience_overseas_years,
            experience_australia_years: snapshot.experience_australia_years,
            australian_study: false,
            specialist_education: false,
            partner_skilled: false,
            partner_competent_english: false,
            community_language: false,
            regional_study: false,
            professional_year: false,
            points: Default::default(),
            total_points: 0,
            created_at: now,
            updated_at: now,
        };

        let points = rules.score(&assessment);
        apply_points(&mut assessment, rules, points);
        assessment.status = AssessmentStatus::Scored;

        info!(
            id = %assessment.id.0,
            subclass = assessment.visa_subclass.code(),
            total = assessment.total_points,
            verdict = assessment.eligibility_status.label(),
            "assessment scored"
        );

        Ok(assessment)
    }

    /// Apply changed fields and re-score. Only categories whose inputs
    /// changed are recomputed; the total and eligibility verdict are
    /// always recomputed from the full current category set so the stored
    /// fields and the total cannot drift apart.
    pub fn recompute_assessment(
        &self,
        assessment: &mut Assessment,
        update: AssessmentUpdate,
    ) -> Result<(), AssessmentError> {
        self.recompute_assessment_as_of(assessment, update, Utc::now())
    }

    pub fn recompute_assessment_as_of(
        &self,
        assessment: &mut Assessment,
        update: AssessmentUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), AssessmentError> {
        // Resolve the rule set before touching the record: an unsupported
        // subclass must fail without leaving points half-recalculated.
        let rules = self.rules_for(assessment.visa_subclass)?;

        let changed = apply_update(assessment, update);
        let points = rules.rescore(assessment, changed);
        apply_points(assessment, rules, points);
        assessment.updated_at = now;

        info!(
            id = %assessment.id.0,
            recomputed = changed.any(),
            total = assessment.total_points,
            verdict = assessment.eligibility_status.label(),
            "assessment updated"
        );

        Ok(())
    }

    fn rules_for(&self, subclass: VisaSubclass) -> Result<&dyn SubclassRules, AssessmentError> {
        self.registry
            .get(subclass)
            .ok_or(AssessmentError::UnsupportedSubclass(subclass))
    }
}

fn apply_points(assessment: &mut Assessment, rules: &dyn SubclassRules, points: CategoryPoints) {
    assessment.points = points;
    assessment.total_points = points.total();
    let (status, notes) = rules.eligibility(assessment.total_points);
    assessment.eligibility_status = status;
    assessment.eligibility_notes = notes;
}

fn apply_update(assessment: &mut Assessment, update: AssessmentUpdate) -> ChangedCategories {
    let mut changed = ChangedCategories::default();

    if let Some(document_id) = update.document_id {
        assessment.document_id = Some(document_id);
    }
    if let Some(code) = update.occupation_code {
        assessment.occupation_code = Some(code);
    }
    if let Some(name) = update.occupation_name {
        assessment.occupation_name = Some(name);
    }
    if let Some(test) = update.english_test {
        assessment.english_test = Some(test);
    }
    if let Some(field) = update.education_field {
        assessment.education_field = Some(field);
    }

    if let Some(age) = update.age_value {
        assessment.age_value = Some(age);
        changed.age = true;
    }
    if let Some(level) = update.english_level {
        assessment.english_level = Some(level);
        changed.english = true;
    }
    if let Some(level) = update.education_level {
        assessment.education_level = Some(level);
        changed.education = true;
    }
    if let Some(years) = update.experience_overseas_years {
        assessment.experience_overseas_years = years;
        changed.experience = true;
    }
    if let Some(years) = update.experience_australia_years {
        assessment.experience_australia_years = years;
        changed.experience = true;
    }
    if let Some(flag) = update.australian_study {
        assessment.australian_study = flag;
        changed.australian_study = true;
    }
    if let Some(flag) = update.specialist_education {
        assessment.specialist_education = flag;
        changed.specialist_education = true;
    }
    if let Some(flag) = update.partner_skilled {
        assessment.partner_skilled = flag;
        changed.partner_skills = true;
    }
    if let Some(flag) = update.partner_competent_english {
        assessment.partner_competent_english = flag;
        changed.partner_skills = true;
    }
    if let Some(flag) = update.community_language {
        assessment.community_language = flag;
        changed.community_language = true;
    }
    if let Some(flag) = update.regional_study {
        assessment.regional_study = flag;
        changed.regional_study = true;
    }
    if let Some(flag) = update.professional_year {
        assessment.professional_year = flag;
        changed.professional_year = true;
    }

    changed
}
