use chrono::Duration;
use serde_json::json;

use super::common::*;
use crate::assessment::domain::{AssessmentStatus, EligibilityStatus, EnglishLevel, VisaSubclass};
use crate::assessment::engine::{AssessmentError, AssessmentUpdate};

#[test]
fn scores_the_worked_sixty_five_point_example() {
    let assessment = scored_assessment();

    assert_eq!(assessment.points.age, 30);
    assert_eq!(assessment.points.english, 10);
    assert_eq!(assessment.points.education, 15);
    assert_eq!(assessment.points.experience, 10);
    assert_eq!(assessment.total_points, 65);
    assert_eq!(
        assessment.eligibility_status,
        EligibilityStatus::PotentiallyEligible
    );
    assert_eq!(
        assessment.eligibility_notes,
        "Points requirement met. Further verification needed."
    );
}

#[test]
fn scored_assessment_carries_lifecycle_and_metadata() {
    let assessment = scored_assessment();

    assert!(assessment.id.0.starts_with("va-"));
    assert_eq!(assessment.status, AssessmentStatus::Scored);
    assert_eq!(assessment.visa_name, "Skilled Independent Visa");
    assert_eq!(assessment.occupation_code.as_deref(), Some("261313"));
    assert_eq!(assessment.created_at, evaluation_instant());
    assert_eq!(assessment.updated_at, evaluation_instant());
}

#[test]
fn occupation_is_optional_metadata() {
    let mut request = request(applicant());
    request.occupation = None;

    let assessment = engine()
        .score_assessment_as_of(request, evaluation_instant())
        .expect("scores without occupation");

    assert!(assessment.occupation_code.is_none());
    assert_eq!(assessment.status, AssessmentStatus::Scored);
    assert_eq!(assessment.total_points, 65);
}

#[test]
fn total_always_equals_category_sum() {
    let engine = engine();
    let mut assessment = scored_assessment();
    assert_eq!(assessment.total_points, assessment.points.total());

    let update = AssessmentUpdate {
        australian_study: Some(true),
        partner_skilled: Some(true),
        ..Default::default()
    };
    engine
        .recompute_assessment_as_of(&mut assessment, update, evaluation_instant())
        .expect("update succeeds");

    assert_eq!(assessment.total_points, assessment.points.total());
    assert_eq!(assessment.total_points, 80);
}

#[test]
fn eligibility_is_never_undetermined_after_scoring() {
    let mut applicant = applicant();
    applicant.age = Some(60);
    applicant.english = None;
    applicant.education.clear();
    applicant.experience.clear();

    let assessment = engine()
        .score_assessment_as_of(request(applicant), evaluation_instant())
        .expect("scores a zero-point applicant");

    assert_eq!(assessment.total_points, 0);
    assert_eq!(assessment.eligibility_status, EligibilityStatus::NotEligible);
    assert_eq!(
        assessment.eligibility_notes,
        "Minimum 65 points required. Current points: 0"
    );
}

#[test]
fn upgrading_english_rescores_only_that_category() {
    let engine = engine();
    let mut assessment = scored_assessment();
    let before = assessment.points;
    let total_before = assessment.total_points;

    let update = AssessmentUpdate {
        english_level: Some(EnglishLevel::Superior),
        ..Default::default()
    };
    let later = evaluation_instant() + Duration::days(3);
    engine
        .recompute_assessment_as_of(&mut assessment, update, later)
        .expect("update succeeds");

    assert_eq!(assessment.points.english, 20);
    assert_eq!(assessment.total_points, total_before + 10);
    assert_eq!(assessment.points.age, before.age);
    assert_eq!(assessment.points.education, before.education);
    assert_eq!(assessment.points.experience, before.experience);
    assert_eq!(assessment.points.partner_skills, before.partner_skills);
    assert_eq!(assessment.english_level, Some(EnglishLevel::Superior));
    assert_eq!(assessment.updated_at, later);
    assert_eq!(assessment.created_at, evaluation_instant());
}

#[test]
fn downgrading_english_crosses_back_below_threshold() {
    let engine = engine();
    let mut assessment = scored_assessment();

    let update = AssessmentUpdate {
        english_level: Some(EnglishLevel::Competent),
        ..Default::default()
    };
    engine
        .recompute_assessment_as_of(&mut assessment, update, evaluation_instant())
        .expect("update succeeds");

    assert_eq!(assessment.total_points, 55);
    assert_eq!(assessment.eligibility_status, EligibilityStatus::NotEligible);
    assert_eq!(
        assessment.eligibility_notes,
        "Minimum 65 points required. Current points: 55"
    );
}

#[test]
fn metadata_only_update_leaves_points_untouched() {
    let engine = engine();
    let mut assessment = scored_assessment();
    let before = assessment.points;

    let update = AssessmentUpdate {
        occupation_code: Some("261312".to_string()),
        occupation_name: Some("Developer Programmer".to_string()),
        ..Default::default()
    };
    engine
        .recompute_assessment_as_of(&mut assessment, update, evaluation_instant())
        .expect("update succeeds");

    assert_eq!(assessment.points, before);
    assert_eq!(assessment.total_points, 65);
    assert_eq!(assessment.occupation_code.as_deref(), Some("261312"));
}

#[test]
fn unsupported_subclass_fails_creation() {
    let mut request = request(applicant());
    request.visa_subclass = VisaSubclass::Nominated190;

    let error = engine()
        .score_assessment_as_of(request, evaluation_instant())
        .expect_err("190 has no rule set yet");

    assert!(matches!(
        error,
        AssessmentError::UnsupportedSubclass(VisaSubclass::Nominated190)
    ));
}

#[test]
fn unsupported_subclass_fails_update_without_mutating() {
    let engine = engine();
    let mut assessment = scored_assessment();
    // Simulate a stored record for a subclass whose rules shipped later.
    assessment.visa_subclass = VisaSubclass::SkillShortage482;
    let before = assessment.clone();

    let update = AssessmentUpdate {
        english_level: Some(EnglishLevel::Superior),
        ..Default::default()
    };
    let error = engine
        .recompute_assessment_as_of(&mut assessment, update, evaluation_instant())
        .expect_err("482 has no rule set yet");

    assert!(matches!(
        error,
        AssessmentError::UnsupportedSubclass(VisaSubclass::SkillShortage482)
    ));
    assert_eq!(assessment, before);
}

#[test]
fn json_updates_reject_protected_fields() {
    let error = AssessmentUpdate::from_json(json!({
        "english_level": "superior",
        "user_id": "someone-else",
    }))
    .expect_err("owner is protected");

    match error {
        AssessmentError::ProtectedField(field) => assert_eq!(field, "user_id"),
        other => panic!("expected protected-field rejection, got {other:?}"),
    }
}

#[test]
fn json_updates_reject_unknown_fields() {
    let error = AssessmentUpdate::from_json(json!({
        "visa_subclass": "190",
    }))
    .expect_err("subclass is not updatable");

    assert!(matches!(error, AssessmentError::MalformedUpdate(_)));
}

#[test]
fn json_updates_apply_like_typed_updates() {
    let engine = engine();
    let mut assessment = scored_assessment();

    let update = AssessmentUpdate::from_json(json!({
        "english_level": "superior",
        "australian_study": true,
    }))
    .expect("payload is valid");
    engine
        .recompute_assessment_as_of(&mut assessment, update, evaluation_instant())
        .expect("update succeeds");

    assert_eq!(assessment.points.english, 20);
    assert_eq!(assessment.points.australian_study, 5);
    assert_eq!(assessment.total_points, 80);
}

#[test]
fn assessment_ids_are_unique_per_creation() {
    let first = scored_assessment();
    let second = scored_assessment();
    assert_ne!(first.id, second.id);
}
