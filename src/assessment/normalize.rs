use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::domain::{ApplicantAttributes, EnglishLevel};

/// Placeholder recorded for date strings that cannot be normalised.
/// Missing personal data must not abort the extraction/scoring flow.
pub const UNKNOWN_DATE: &str = "unknown";

const PRESENT: &str = "present";

/// Scoring inputs distilled from the loose applicant attributes, fixed to
/// one evaluation date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicantSnapshot {
    pub age: Option<u8>,
    pub english_level: Option<EnglishLevel>,
    pub english_test: Option<String>,
    pub education_level: Option<String>,
    pub education_field: Option<String>,
    pub experience_overseas_years: f32,
    pub experience_australia_years: f32,
}

/// Distill scoring inputs from extracted attributes.
///
/// `as_of` anchors age derivation and "present"-ended experience entries.
/// Because open-ended durations are measured against this date, two
/// snapshots of identical stored data taken months apart yield different
/// experience years; callers needing point-in-time stability must pin the
/// evaluation date alongside the assessment.
pub fn snapshot(attributes: &ApplicantAttributes, as_of: NaiveDate) -> ApplicantSnapshot {
    let age = attributes
        .date_of_birth
        .as_deref()
        .and_then(normalize_date)
        .map(|dob| derive_age(dob, as_of))
        .or(attributes.age);

    let english_level = attributes
        .english
        .as_ref()
        .and_then(|english| english.level.as_deref())
        .and_then(EnglishLevel::parse);
    let english_test = attributes
        .english
        .as_ref()
        .and_then(|english| english.test.clone());

    // Highest qualification wins; ties keep the earlier entry since the
    // extractor lists most recent first.
    let mut best_rank = 0u8;
    let mut education_level = None;
    let mut education_field = None;
    for entry in &attributes.education {
        let level = entry.level.as_deref().unwrap_or_default();
        let rank = education_level_rank(level);
        if education_level.is_none() || rank > best_rank {
            best_rank = rank;
            education_level = entry.level.clone();
            education_field = entry.field.clone();
        }
    }

    let mut overseas_years = 0.0f32;
    let mut australia_years = 0.0f32;
    for entry in &attributes.experience {
        let years = match entry.duration_years {
            Some(years) => years,
            None => experience_years_from_dates(
                entry.start_date.as_deref(),
                entry.end_date.as_deref(),
                as_of,
            ),
        };

        if years <= 0.0 {
            continue;
        }

        let in_australia = entry
            .country
            .as_deref()
            .map(|country| country.trim().eq_ignore_ascii_case("australia"))
            .unwrap_or(false);
        if in_australia {
            australia_years += years;
        } else {
            overseas_years += years;
        }
    }

    ApplicantSnapshot {
        age,
        english_level,
        english_test,
        education_level,
        education_field,
        experience_overseas_years: round_to_hundredth(overseas_years),
        experience_australia_years: round_to_hundredth(australia_years),
    }
}

/// Return a copy of the attributes with every date string normalised to
/// `YYYY-MM-DD`, `"present"`, or [`UNKNOWN_DATE`].
pub fn normalize_attributes(attributes: &ApplicantAttributes) -> ApplicantAttributes {
    let mut normalized = attributes.clone();

    normalized.date_of_birth = normalized
        .date_of_birth
        .as_deref()
        .map(normalize_date_string);

    for entry in &mut normalized.education {
        entry.start_date = entry.start_date.as_deref().map(normalize_date_string);
        entry.end_date = entry.end_date.as_deref().map(normalize_end_date_string);
    }

    for entry in &mut normalized.experience {
        entry.start_date = entry.start_date.as_deref().map(normalize_date_string);
        entry.end_date = entry.end_date.as_deref().map(normalize_end_date_string);
    }

    normalized
}

/// Parse a loosely-formatted date string. Tolerates ISO dates, slashed and
/// day-first forms, month-year, and bare years; month-level inputs clamp
/// to the first of the month.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_DATE) {
        return None;
    }

    const FULL_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%d %B %Y",
        "%B %d, %Y",
    ];
    for format in FULL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}/01"), "%Y/%m/%d") {
        return Some(date);
    }

    for format in ["%d %B %Y", "%d %b %Y"] {
        let padded = format!("1 {trimmed}");
        if let Ok(date) = NaiveDate::parse_from_str(&padded, format) {
            return Some(date);
        }
    }

    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(year) = trimmed.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    debug!(value = %trimmed, "unparseable date");
    None
}

fn normalize_date_string(raw: &str) -> String {
    match normalize_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

fn normalize_end_date_string(raw: &str) -> String {
    if raw.trim().eq_ignore_ascii_case(PRESENT) {
        PRESENT.to_string()
    } else {
        normalize_date_string(raw)
    }
}

/// Whole years of age at `as_of`, honoring whether the birthday has
/// occurred yet this year.
pub fn derive_age(date_of_birth: NaiveDate, as_of: NaiveDate) -> u8 {
    let mut age = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.clamp(0, u8::MAX as i32) as u8
}

/// Month-granularity duration in years between two dates. Day-of-month is
/// ignored; inverted ranges collapse to zero.
pub fn duration_years(start: NaiveDate, end: NaiveDate) -> f32 {
    let years = (end.year() - start.year()) as f32
        + (end.month() as i32 - start.month() as i32) as f32 / 12.0;
    years.max(0.0)
}

fn experience_years_from_dates(
    start_date: Option<&str>,
    end_date: Option<&str>,
    as_of: NaiveDate,
) -> f32 {
    let Some(start) = start_date.and_then(normalize_date) else {
        return 0.0;
    };

    let end = match end_date {
        Some(raw) if raw.trim().eq_ignore_ascii_case(PRESENT) => Some(as_of),
        Some(raw) => normalize_date(raw),
        None => None,
    };

    match end {
        Some(end) => duration_years(start, end),
        None => 0.0,
    }
}

/// Fixed ranking of qualification levels used to pick the highest
/// qualification among all education entries.
pub fn education_level_rank(level: &str) -> u8 {
    match level.trim().to_ascii_lowercase().as_str() {
        "phd" | "doctorate" => 5,
        "masters" | "master" => 4,
        "bachelors" | "bachelor" => 3,
        "diploma" | "advanced diploma" => 2,
        "certificate" | "trade" => 1,
        _ => 0,
    }
}

fn round_to_hundredth(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
