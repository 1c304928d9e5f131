use registry_client::{QueryShape, StudyRecord};
use serde::{Deserialize, Serialize};

/// Outcome of one match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Search expression sent to the registry
    pub expr: String,
    /// Studies that passed eligibility, or the number returned when the
    /// unfiltered fallback was used
    pub count: usize,
    pub studies: Vec<StudyRecord>,
    /// Registry shape that produced the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<QueryShape>,
    /// Set when no study passed the local filters and unfiltered results are shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
