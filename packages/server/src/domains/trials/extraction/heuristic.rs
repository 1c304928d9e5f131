//! Regex/lexicon extraction used when the LLM is unavailable or returns
//! unusable fields.
//!
//! Each field has its own pass over the transcript; no pass reads another's
//! result. Nothing here can fail: missing evidence yields unknown/empty.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::trials::models::{push_unique, PatientProfile, Sex, MAX_AGE};

const MAX_LOCATIONS: usize = 3;

lazy_static! {
    // "58-year-old", "58 year old", "58 yr old"
    static ref AGE_YEAR_OLD: Regex =
        Regex::new(r"(?i)\b(\d{1,3})\s*[- ]?(?:year|yr)s?[- ]?old\b").unwrap();

    // "aged 58"
    static ref AGE_AGED: Regex = Regex::new(r"(?i)\baged\s*(\d{1,3})\b").unwrap();

    // "58 years", "58 yo", "58 y/o" - also matches durations, so ranked lower
    static ref AGE_GENERIC: Regex =
        Regex::new(r"(?i)\b(\d{1,3})\s*(?:years?|yo|y/o)\b").unwrap();

    static ref SEX: Regex = Regex::new(r"(?i)\b(male|female|man|woman)\b").unwrap();

    // "diagnosed with X.", "diagnosis of X,", "diagnosis: X;"
    // The connector must be a whole word and a phrase must follow it.
    static ref DIAGNOSED: Regex = Regex::new(
        r"(?i)\bdiagnos(?:ed|is)\s*(?:(?:with|of)\b|:)\s*(\w[\w\s\-]*?)(?:[.,;]|$)"
    )
    .unwrap();

    // Curated condition phrases with optional biomarker/extent qualifiers
    static ref CONDITION: Regex = Regex::new(concat!(
        r"(?i)\b(?:(?:her2|er|pr|hr|egfr|alk|brca[12]?|kras)[- ](?:positive|negative|mutant|mutated)\s+)?",
        r"(?:(?:metastatic|recurrent|advanced|early[- ]stage|locally advanced)\s+)?",
        r"(?:invasive\s+)?",
        r"(?:ductal carcinoma(?: in situ)?|lobular carcinoma|triple[- ]negative breast cancer|breast cancer",
        r"|non[- ]small[- ]cell lung cancer|small[- ]cell lung cancer|lung cancer",
        r"|colorectal cancer|prostate cancer|pancreatic cancer|ovarian cancer",
        r"|melanoma|glioblastoma|multiple myeloma|type [12] diabetes)\b"
    ))
    .unwrap();

    static ref HEART_FAILURE: Regex = Regex::new(r"(?i)\bheart failure\b").unwrap();
    static ref REDUCED_EF: Regex =
        Regex::new(r"(?i)\b(?:hfref|reduced ejection fraction)\b").unwrap();

    // Capitalized place names after "in"/"at"
    static ref LOCATION: Regex =
        Regex::new(r"\b(?:in|at)\s+([A-Z][a-zA-Z]+(?:\s[A-Z][a-zA-Z]+)*)\b").unwrap();

    static ref KEYWORDS: Vec<(&'static str, Regex)> = KEYWORD_LEXICON
        .iter()
        .map(|(kw, pattern)| (*kw, Regex::new(&format!(r"(?i)\b{}\b", pattern)).unwrap()))
        .collect();
}

/// Keyword and the pattern that detects it, in reporting order.
const KEYWORD_LEXICON: &[(&str, &str)] = &[
    ("stage ii", r"stage ii"),
    ("stage iii", r"stage iii"),
    ("stage iv", r"stage iv"),
    ("metastatic", r"metastatic"),
    ("recurrent", r"recurrent"),
    ("adjuvant", r"adjuvant"),
    ("neoadjuvant", r"neoadjuvant"),
    ("immunotherapy", r"immunotherapy"),
    ("chemo", r"chemo\w*"),
    ("radiation", r"radiation"),
    ("biomarker", r"biomarkers?"),
    ("egfr", r"egfr"),
    ("alk", r"alk"),
    ("brca", r"brca[12]?"),
    ("pd-l1", r"pd-l1"),
    ("her2", r"her2"),
    ("heart failure", r"heart failure"),
    ("hfref", r"hfref"),
    ("reduced ejection fraction", r"reduced ejection fraction"),
    ("nyha", r"nyha"),
    ("sglt2", r"sglt2i?"),
];

/// Capitalized words after "in"/"at" that are dates, not places.
const NOT_PLACES: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December", "Monday", "Tuesday",
    "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Run every heuristic pass over the transcript.
pub fn heuristic_extract(transcript: &str) -> PatientProfile {
    PatientProfile {
        age: extract_age(transcript),
        sex: extract_sex(transcript),
        diagnosis: extract_diagnosis(transcript),
        keywords: extract_keywords(transcript),
        locations: extract_locations(transcript),
    }
}

/// Patient's current age.
///
/// The earliest candidate wins; at the same position "N-year-old"/"aged N"
/// beats the generic "N years" form, which often denotes a duration.
pub fn extract_age(text: &str) -> Option<u32> {
    let mut candidates: Vec<(usize, bool, &str)> = Vec::new();

    for (re, specific) in [(&*AGE_YEAR_OLD, true), (&*AGE_AGED, true), (&*AGE_GENERIC, false)] {
        for caps in re.captures_iter(text) {
            if let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) {
                candidates.push((whole.start(), specific, num.as_str()));
            }
        }
    }

    candidates.sort_by_key(|(start, specific, _)| (*start, !*specific));
    let (_, _, digits) = candidates.first()?;
    digits.parse::<u32>().ok().filter(|age| *age <= MAX_AGE)
}

pub fn extract_sex(text: &str) -> Sex {
    SEX.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| Sex::from_text(m.as_str()))
        .unwrap_or_default()
}

pub fn extract_diagnosis(text: &str) -> Option<String> {
    if let Some(found) = DIAGNOSED
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return Some(capitalize_first(found));
    }

    if let Some(m) = CONDITION.find(text) {
        return Some(m.as_str().to_string());
    }

    if HEART_FAILURE.is_match(text) {
        return Some(if REDUCED_EF.is_match(text) {
            "Heart failure with reduced ejection fraction (HFrEF)".to_string()
        } else {
            "Heart failure".to_string()
        });
    }

    None
}

pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    for (kw, re) in KEYWORDS.iter() {
        if re.is_match(text) {
            push_unique(&mut keywords, kw);
        }
    }
    keywords
}

pub fn extract_locations(text: &str) -> Vec<String> {
    let mut locations = Vec::new();
    for caps in LOCATION.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let place = m.as_str();
        if place.len() <= 2 || NOT_PLACES.contains(&place) {
            continue;
        }
        push_unique(&mut locations, place);
        if locations.len() == MAX_LOCATIONS {
            break;
        }
    }
    locations
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
