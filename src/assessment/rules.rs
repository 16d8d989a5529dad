//! Points tables for subclass 189. Every function is pure and total:
//! unknown or missing input scores zero rather than failing, which keeps
//! the total well-defined once normalization has run.

use super::domain::EnglishLevel;

pub fn age_points(age: Option<u8>) -> u32 {
    match age {
        Some(18..=24) => 25,
        Some(25..=32) => 30,
        Some(33..=39) => 25,
        Some(40..=44) => 15,
        _ => 0,
    }
}

pub fn english_points(level: Option<EnglishLevel>) -> u32 {
    match level {
        Some(EnglishLevel::Superior) => 20,
        Some(EnglishLevel::Proficient) => 10,
        Some(EnglishLevel::Competent) | None => 0,
    }
}

pub fn education_points(level: Option<&str>) -> u32 {
    let Some(level) = level else {
        return 0;
    };

    match level.trim().to_ascii_lowercase().as_str() {
        "phd" | "doctorate" => 20,
        "masters" | "master" | "bachelors" | "bachelor" => 15,
        "diploma" | "advanced diploma" | "trade" => 10,
        _ => 0,
    }
}

/// Overseas and Australian employment are scored on separate tables and
/// the category takes the better of the two; the tracks are not additive.
/// Buckets are half-open on the upper bound.
pub fn experience_points(overseas_years: f32, australia_years: f32) -> u32 {
    let overseas = match overseas_years {
        years if years >= 8.0 => 15,
        years if years >= 5.0 => 10,
        years if years >= 3.0 => 5,
        _ => 0,
    };

    let australia = match australia_years {
        years if years >= 8.0 => 20,
        years if years >= 5.0 => 15,
        years if years >= 3.0 => 10,
        years if years >= 1.0 => 5,
        _ => 0,
    };

    overseas.max(australia)
}

pub fn australian_study_points(completed: bool) -> u32 {
    if completed {
        5
    } else {
        0
    }
}

pub fn specialist_education_points(completed: bool) -> u32 {
    if completed {
        10
    } else {
        0
    }
}

pub fn community_language_points(accredited: bool) -> u32 {
    if accredited {
        5
    } else {
        0
    }
}

pub fn regional_study_points(completed: bool) -> u32 {
    if completed {
        5
    } else {
        0
    }
}

pub fn professional_year_points(completed: bool) -> u32 {
    if completed {
        5
    } else {
        0
    }
}

/// A skilled partner outranks a partner with competent English; the two
/// never stack.
pub fn partner_skills_points(skilled_partner: bool, competent_english: bool) -> u32 {
    if skilled_partner {
        10
    } else if competent_english {
        5
    } else {
        0
    }
}
