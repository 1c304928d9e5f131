use serde::{Deserialize, Serialize};

/// The registry API shapes, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryShape {
    /// Classic `study_fields` endpoint with a projected field list.
    Primary,
    /// Classic `full_studies` endpoint.
    Secondary,
    /// v2 `studies` endpoint.
    Tertiary,
}

impl QueryShape {
    /// Fixed priority order.
    pub const ALL: [QueryShape; 3] = [QueryShape::Primary, QueryShape::Secondary, QueryShape::Tertiary];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryShape::Primary => "study_fields",
            QueryShape::Secondary => "full_studies",
            QueryShape::Tertiary => "v2_studies",
        }
    }
}

impl std::fmt::Display for QueryShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registry study projected onto the fields the matcher and UI need.
///
/// List-valued fields are always present (possibly empty). Missing sex
/// eligibility is `"All"`, missing age bounds are `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecord {
    pub nct_id: String,
    pub brief_title: Option<String>,
    pub overall_status: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub gender: String,
    pub min_age: String,
    pub max_age: String,
    #[serde(default)]
    pub location_city: Vec<String>,
    #[serde(default)]
    pub location_state: Vec<String>,
    #[serde(default)]
    pub location_country: Vec<String>,
    #[serde(default)]
    pub phase: Vec<String>,
    #[serde(default)]
    pub study_type: Vec<String>,
    #[serde(default)]
    pub intervention_names: Vec<String>,
    #[serde(default)]
    pub brief_summary: String,
}

impl StudyRecord {
    /// Minimal record with defaults for everything but the id.
    pub fn new(nct_id: impl Into<String>) -> Self {
        Self {
            nct_id: nct_id.into(),
            brief_title: None,
            overall_status: None,
            conditions: Vec::new(),
            gender: "All".to_string(),
            min_age: "N/A".to_string(),
            max_age: "N/A".to_string(),
            location_city: Vec::new(),
            location_state: Vec::new(),
            location_country: Vec::new(),
            phase: Vec::new(),
            study_type: Vec::new(),
            intervention_names: Vec::new(),
            brief_summary: String::new(),
        }
    }
}

/// Projected fields requested from the `study_fields` endpoint.
pub const STUDY_FIELDS: &[&str] = &[
    "NCTId",
    "BriefTitle",
    "Condition",
    "OverallStatus",
    "BriefSummary",
    "LocationCity",
    "LocationState",
    "LocationCountry",
    "Gender",
    "MinimumAge",
    "MaximumAge",
    "Phase",
    "StudyType",
    "InterventionName",
];
