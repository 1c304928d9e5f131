//! Local eligibility filtering over normalized registry studies.
//!
//! The registry query is broad, so age and sex are checked here.
//! When nothing passes but candidates exist, the first N unfiltered studies
//! are returned instead of an empty list (no-empty-state policy).

use lazy_static::lazy_static;
use regex::Regex;
use registry_client::StudyRecord;

use crate::domains::trials::models::{PatientProfile, Sex};

lazy_static! {
    // "18 Years", "6 Months", "2 weeks", "30 days"
    static ref AGE_BOUND: Regex =
        Regex::new(r"(?i)^\s*(\d+)\s*(year|month|week|day|hour|minute)?s?\b").unwrap();
}

/// Registry age bound in whole years. `None` means unbounded.
pub fn parse_age_years(raw: &str) -> Option<u32> {
    let caps = AGE_BOUND.captures(raw)?;
    let value: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| "year".to_string());

    Some(match unit.as_str() {
        "month" => value / 12,
        "week" => value / 52,
        "day" => value / 365,
        "hour" | "minute" => 0,
        _ => value,
    })
}

/// Inclusive range check. Unknown age passes; missing bounds are open.
pub fn age_in_range(age: Option<u32>, min_age: &str, max_age: &str) -> bool {
    let Some(age) = age else {
        return true;
    };
    if parse_age_years(min_age).is_some_and(|min| age < min) {
        return false;
    }
    if parse_age_years(max_age).is_some_and(|max| age > max) {
        return false;
    }
    true
}

/// Unknown sex passes; so does a study open to all or with no sex listed.
pub fn sex_matches(sex: Sex, gender: &str) -> bool {
    let gender = gender.trim();
    if !sex.is_known() || gender.is_empty() || gender.eq_ignore_ascii_case("all") {
        return true;
    }
    gender.eq_ignore_ascii_case(sex.as_str())
}

pub fn is_eligible(profile: &PatientProfile, study: &StudyRecord) -> bool {
    age_in_range(profile.age, &study.min_age, &study.max_age) && sex_matches(profile.sex, &study.gender)
}

/// Studies chosen for a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub studies: Vec<StudyRecord>,
    /// Eligible studies found (before truncation to N), or the number
    /// returned when the unfiltered fallback applied
    pub count: usize,
    pub unfiltered_fallback: bool,
}

/// Filter by eligibility, keep registry order, return at most `max`.
pub fn select_studies(profile: &PatientProfile, studies: Vec<StudyRecord>, max: usize) -> Selection {
    let (eligible, rejected): (Vec<StudyRecord>, Vec<StudyRecord>) =
        studies.into_iter().partition(|s| is_eligible(profile, s));

    if eligible.is_empty() && !rejected.is_empty() {
        let studies: Vec<StudyRecord> = rejected.into_iter().take(max).collect();
        return Selection {
            count: studies.len(),
            studies,
            unfiltered_fallback: true,
        };
    }

    let count = eligible.len();
    Selection {
        studies: eligible.into_iter().take(max).collect(),
        count,
        unfiltered_fallback: false,
    }
}

/// Cut to `max_chars` characters on a char boundary, marking the cut with `…`.
pub fn truncate_summary(summary: &str, max_chars: usize) -> String {
    let summary = summary.trim();
    match summary.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", summary[..cut].trim_end()),
        None => summary.to_string(),
    }
}
