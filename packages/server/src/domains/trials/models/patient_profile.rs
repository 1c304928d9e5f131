use serde::{Deserialize, Serialize};

/// Patient sex as far as eligibility is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Read a free-form sex/gender word. Anything unrecognized is `Unknown`.
    pub fn from_text(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        // "female" contains "male", check it first
        if s.contains("female") || s == "f" || s == "woman" || s == "women" {
            Sex::Female
        } else if s.contains("male") || s == "m" || s == "man" || s == "men" {
            Sex::Male
        } else {
            Sex::Unknown
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Sex::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
    }
}

/// Structured attributes derived from a transcript.
///
/// Every field is either a typed value or an explicit unknown (`None`,
/// `Sex::Unknown`, empty list). Keyword and location lists keep first-seen
/// order and hold no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Sex,
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Oldest age accepted as a patient's current age.
pub const MAX_AGE: u32 = 120;

/// Append `value` unless an equal entry (case-insensitive) is already present.
pub fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    if !list.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_from_text_checks_female_before_male() {
        assert_eq!(Sex::from_text("Female"), Sex::Female);
        assert_eq!(Sex::from_text("MALE"), Sex::Male);
        assert_eq!(Sex::from_text("woman"), Sex::Female);
        assert_eq!(Sex::from_text("other"), Sex::Unknown);
        assert_eq!(Sex::from_text(""), Sex::Unknown);
    }

    #[test]
    fn profile_serializes_unknowns_explicitly() {
        let v = serde_json::to_value(PatientProfile::default()).unwrap();
        assert!(v["age"].is_null());
        assert_eq!(v["sex"], "unknown");
        assert!(v["diagnosis"].is_null());
        assert_eq!(v["keywords"], serde_json::json!([]));
    }

    #[test]
    fn push_unique_ignores_case_duplicates_and_blanks() {
        let mut list = Vec::new();
        push_unique(&mut list, "HER2");
        push_unique(&mut list, "her2");
        push_unique(&mut list, "  ");
        push_unique(&mut list, "adjuvant");
        assert_eq!(list, vec!["HER2", "adjuvant"]);
    }
}
