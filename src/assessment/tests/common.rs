use chrono::{DateTime, TimeZone, Utc};

use crate::assessment::domain::{
    ApplicantAttributes, Assessment, EducationEntry, EnglishAttributes, ExperienceEntry,
    OccupationSelection, VisaSubclass,
};
use crate::assessment::engine::{AssessmentEngine, AssessmentRequest};

/// Pinned evaluation instant so "present" durations and ages stay stable.
pub(super) fn evaluation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid instant")
}

pub(super) fn engine() -> AssessmentEngine {
    AssessmentEngine::default()
}

/// The worked example from the scoring tables: age 29, proficient English,
/// bachelors, six years overseas experience.
pub(super) fn applicant() -> ApplicantAttributes {
    ApplicantAttributes {
        full_name: Some("Asha Nair".to_string()),
        email: Some("asha.nair@example.com".to_string()),
        date_of_birth: None,
        age: Some(29),
        education: vec![EducationEntry {
            level: Some("bachelors".to_string()),
            field: Some("Computer Science".to_string()),
            institution: Some("University of Mumbai".to_string()),
            country: Some("India".to_string()),
            start_date: Some("2013-07".to_string()),
            end_date: Some("2017-06".to_string()),
        }],
        experience: vec![ExperienceEntry {
            title: Some("Software Engineer".to_string()),
            company: Some("Acme Systems".to_string()),
            country: Some("India".to_string()),
            start_date: Some("2017-07".to_string()),
            end_date: Some("2023-07".to_string()),
            duration_years: None,
        }],
        english: Some(EnglishAttributes {
            level: Some("Proficient".to_string()),
            test: Some("IELTS".to_string()),
            scores: None,
        }),
    }
}

pub(super) fn request(applicant: ApplicantAttributes) -> AssessmentRequest {
    AssessmentRequest {
        user_id: "user-1".to_string(),
        client_id: "client-1".to_string(),
        document_id: Some("doc-1".to_string()),
        visa_subclass: VisaSubclass::Independent189,
        occupation: Some(OccupationSelection {
            code: "261313".to_string(),
            name: "Software Engineer".to_string(),
        }),
        applicant,
    }
}

pub(super) fn scored_assessment() -> Assessment {
    engine()
        .score_assessment_as_of(request(applicant()), evaluation_instant())
        .expect("subclass 189 is supported")
}
