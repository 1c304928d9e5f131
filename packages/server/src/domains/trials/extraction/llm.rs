//! LLM extraction: prompt contract, lenient response parsing and
//! field-level merge with the heuristic profile.

use serde_json::{Map, Value};

use crate::domains::trials::models::{push_unique, PatientProfile, Sex, MAX_AGE};

const MAX_KEYWORDS: usize = 10;
const MAX_LOCATIONS: usize = 5;

/// Prompt demanding strict JSON with exactly the five profile keys.
pub fn extraction_prompt(transcript: &str) -> String {
    format!(
        "You are extracting structured clinical info from a patient-doctor transcript.\n\
         Requirements:\n\
         - Output ONLY JSON (no prose).\n\
         - Keys: age (number or null), sex ('Male'|'Female'|null), diagnosis (string or null), \
         keywords (string[]), locations (string[]).\n\
         - Age must be the patient's current age, not durations (e.g., 'quit 10 years ago' is NOT age).\n\
         - Prefer concise, canonical diagnosis terms (e.g., 'Heart failure with reduced ejection \
         fraction (HFrEF)', 'HER2-positive invasive ductal carcinoma').\n\
         - Keywords: include staging, biomarkers, therapies (e.g., HER2, HFrEF, NYHA, SGLT2, adjuvant).\n\
         Transcript:\n\n{}",
        transcript
    )
}

/// Fields of an LLM answer that survived validation. `None` means the key
/// was missing, null, or had the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialProfile {
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub diagnosis: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
}

impl PartialProfile {
    fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.sex.is_none()
            && self.diagnosis.is_none()
            && self.keywords.is_none()
            && self.locations.is_none()
    }

    fn into_complete(self) -> Result<PatientProfile, Self> {
        match self {
            PartialProfile {
                age: Some(age),
                sex: Some(sex),
                diagnosis: Some(diagnosis),
                keywords: Some(keywords),
                locations: Some(locations),
            } => Ok(PatientProfile {
                age: Some(age),
                sex,
                diagnosis: Some(diagnosis),
                keywords,
                locations,
            }),
            partial => Err(partial),
        }
    }
}

/// Result of reading an LLM response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedProfile {
    /// All five fields present and well-typed
    Valid(PatientProfile),
    /// Some fields usable, the rest need heuristic values
    Partial(PartialProfile),
    /// No JSON object, or nothing in it was usable
    Invalid,
}

impl ParsedProfile {
    /// Fill anything the LLM did not supply from the heuristic profile.
    pub fn merge_with(self, heuristic: PatientProfile) -> PatientProfile {
        match self {
            ParsedProfile::Valid(profile) => profile,
            ParsedProfile::Invalid => heuristic,
            ParsedProfile::Partial(p) => PatientProfile {
                age: p.age.or(heuristic.age),
                sex: p.sex.unwrap_or(heuristic.sex),
                diagnosis: p.diagnosis.or(heuristic.diagnosis),
                keywords: p.keywords.unwrap_or(heuristic.keywords),
                locations: p.locations.unwrap_or(heuristic.locations),
            },
        }
    }

    /// Names of fields that will come from heuristics.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            ParsedProfile::Valid(_) => Vec::new(),
            ParsedProfile::Invalid => vec!["age", "sex", "diagnosis", "keywords", "locations"],
            ParsedProfile::Partial(p) => [
                ("age", p.age.is_none()),
                ("sex", p.sex.is_none()),
                ("diagnosis", p.diagnosis.is_none()),
                ("keywords", p.keywords.is_none()),
                ("locations", p.locations.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect(),
        }
    }
}

/// Parse an LLM response, tolerating prose or code fences around the JSON.
pub fn parse_llm_response(text: &str) -> ParsedProfile {
    let Some(obj) = json_object(text) else {
        return ParsedProfile::Invalid;
    };

    let partial = PartialProfile {
        age: obj.get("age").and_then(parse_age),
        sex: obj.get("sex").and_then(parse_sex),
        diagnosis: obj.get("diagnosis").and_then(parse_text),
        keywords: obj.get("keywords").and_then(|v| parse_list(v, MAX_KEYWORDS)),
        locations: obj.get("locations").and_then(|v| parse_list(v, MAX_LOCATIONS)),
    };

    if partial.is_empty() {
        return ParsedProfile::Invalid;
    }
    match partial.into_complete() {
        Ok(profile) => ParsedProfile::Valid(profile),
        Err(partial) => ParsedProfile::Partial(partial),
    }
}

/// Outermost `{...}` block of the text, parsed as a JSON object.
fn json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Integer age, or the first integer in a string like "58-year-old".
fn parse_age(v: &Value) -> Option<u32> {
    let age = match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))?,
        Value::String(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()?
        }
        _ => return None,
    };
    u32::try_from(age).ok().filter(|a| *a <= MAX_AGE)
}

fn parse_sex(v: &Value) -> Option<Sex> {
    let sex = Sex::from_text(v.as_str()?);
    sex.is_known().then_some(sex)
}

fn parse_text(v: &Value) -> Option<String> {
    let s = v.as_str()?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(s.to_string())
    }
}

/// String array; non-string items are dropped, duplicates removed.
fn parse_list(v: &Value, cap: usize) -> Option<Vec<String>> {
    let items = v.as_array()?;
    let mut out = Vec::new();
    for s in items.iter().filter_map(Value::as_str) {
        push_unique(&mut out, s);
        if out.len() == cap {
            break;
        }
    }
    Some(out)
}
