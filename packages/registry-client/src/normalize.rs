//! One normalizer per registry response shape.
//!
//! Each normalizer returns `None` when the payload does not have the
//! expected envelope, so the caller can move on to the next shape.
//! Individual studies that cannot be projected (not an object, no NCT id)
//! are skipped rather than failing the batch.

use serde_json::Value;
use tracing::debug;

use crate::types::{QueryShape, StudyRecord};

impl QueryShape {
    /// Normalize a raw payload returned for this shape.
    pub fn normalize(&self, payload: &Value) -> Option<Vec<StudyRecord>> {
        match self {
            QueryShape::Primary => normalize_study_fields(payload),
            QueryShape::Secondary => normalize_full_studies(payload),
            QueryShape::Tertiary => normalize_v2_studies(payload),
        }
    }
}

// =============================================================================
// JSON helpers
// =============================================================================

/// Walk a path of object keys.
fn path<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(v, |cur, k| cur.get(*k))
}

/// Non-empty trimmed string at a path.
fn text(v: &Value, keys: &[&str]) -> Option<String> {
    path(v, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A string list at a path. A bare string becomes a one-element list,
/// non-string items are dropped.
fn text_list(v: &Value, keys: &[&str]) -> Vec<String> {
    match path(v, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Array of objects at a path, or empty.
fn objects<'a>(v: &'a Value, keys: &[&str]) -> &'a [Value] {
    path(v, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

fn skip(shape: QueryShape, index: usize, reason: &str) {
    debug!(shape = %shape, index, reason, "Skipping malformed registry study");
}

// =============================================================================
// Primary: classic study_fields
// =============================================================================

/// `{"StudyFieldsResponse": {"StudyFields": [{"NCTId": ["..."], ...}]}}`
///
/// Every projected field arrives as a list.
pub fn normalize_study_fields(payload: &Value) -> Option<Vec<StudyRecord>> {
    let studies = path(payload, &["StudyFieldsResponse", "StudyFields"])?.as_array()?;

    let records = studies
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            if !s.is_object() {
                skip(QueryShape::Primary, i, "not an object");
                return None;
            }
            let first = |key: &str| text_list(s, &[key]).into_iter().next();
            let Some(nct_id) = first("NCTId") else {
                skip(QueryShape::Primary, i, "missing NCTId");
                return None;
            };

            Some(StudyRecord {
                nct_id,
                brief_title: first("BriefTitle"),
                overall_status: first("OverallStatus"),
                conditions: text_list(s, &["Condition"]),
                gender: or_default(first("Gender"), "All"),
                min_age: or_default(first("MinimumAge"), "N/A"),
                max_age: or_default(first("MaximumAge"), "N/A"),
                location_city: text_list(s, &["LocationCity"]),
                location_state: text_list(s, &["LocationState"]),
                location_country: text_list(s, &["LocationCountry"]),
                phase: text_list(s, &["Phase"]),
                study_type: text_list(s, &["StudyType"]),
                intervention_names: text_list(s, &["InterventionName"]),
                brief_summary: first("BriefSummary").unwrap_or_default(),
            })
        })
        .collect();

    Some(records)
}

// =============================================================================
// Secondary: classic full_studies
// =============================================================================

/// `{"FullStudiesResponse": {"FullStudies": [{"Study": {"ProtocolSection": {...}}}]}}`
pub fn normalize_full_studies(payload: &Value) -> Option<Vec<StudyRecord>> {
    let studies = path(payload, &["FullStudiesResponse", "FullStudies"])?.as_array()?;

    let records = studies
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let Some(proto) = path(item, &["Study", "ProtocolSection"]) else {
                skip(QueryShape::Secondary, i, "missing ProtocolSection");
                return None;
            };
            let Some(nct_id) = text(proto, &["IdentificationModule", "NCTId"]) else {
                skip(QueryShape::Secondary, i, "missing NCTId");
                return None;
            };

            let mut record = StudyRecord::new(nct_id);
            record.brief_title = text(proto, &["IdentificationModule", "BriefTitle"])
                .or_else(|| text(proto, &["IdentificationModule", "OfficialTitle"]));
            record.overall_status = text(proto, &["StatusModule", "OverallStatus"]);
            record.conditions = text_list(proto, &["ConditionsModule", "ConditionList", "Condition"]);
            record.brief_summary =
                text(proto, &["DescriptionModule", "BriefSummary"]).unwrap_or_default();
            record.phase = text_list(proto, &["DesignModule", "PhaseList", "Phase"]);
            record.study_type = text_list(proto, &["DesignModule", "StudyType"]);
            record.gender = or_default(text(proto, &["EligibilityModule", "Gender"]), "All");
            record.min_age = or_default(text(proto, &["EligibilityModule", "MinimumAge"]), "N/A");
            record.max_age = or_default(text(proto, &["EligibilityModule", "MaximumAge"]), "N/A");

            let locations = objects(proto, &["ContactsLocationsModule", "LocationList", "Location"]);
            for loc in locations {
                let field = |flat: &str, nested: &str| {
                    text(loc, &[flat]).or_else(|| text(loc, &["Facility", "Location", nested]))
                };
                record.location_city.extend(field("LocationCity", "City"));
                record.location_state.extend(field("LocationState", "State"));
                record.location_country.extend(field("LocationCountry", "Country"));
            }

            for module in ["ArmsInterventionsModule", "InterventionsModule"] {
                for iv in objects(proto, &[module, "InterventionList", "Intervention"]) {
                    record.intervention_names.extend(text(iv, &["InterventionName"]));
                }
            }

            Some(record)
        })
        .collect();

    Some(records)
}

// =============================================================================
// Tertiary: v2 studies
// =============================================================================

/// `{"studies": [{"protocolSection": {...}}], "nextPageToken": "..."}`
pub fn normalize_v2_studies(payload: &Value) -> Option<Vec<StudyRecord>> {
    let studies = payload.get("studies")?.as_array()?;

    let records = studies
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let Some(proto) = s.get("protocolSection") else {
                skip(QueryShape::Tertiary, i, "missing protocolSection");
                return None;
            };
            let Some(nct_id) = text(proto, &["identificationModule", "nctId"]) else {
                skip(QueryShape::Tertiary, i, "missing nctId");
                return None;
            };

            let mut record = StudyRecord::new(nct_id);
            record.brief_title = text(proto, &["identificationModule", "briefTitle"])
                .or_else(|| text(proto, &["identificationModule", "officialTitle"]));
            record.overall_status = text(proto, &["statusModule", "overallStatus"]);
            record.conditions = text_list(proto, &["conditionsModule", "conditions"]);
            record.brief_summary =
                text(proto, &["descriptionModule", "briefSummary"]).unwrap_or_default();
            record.phase = text_list(proto, &["designModule", "phases"]);
            record.study_type = text_list(proto, &["designModule", "studyType"]);
            record.gender = or_default(text(proto, &["eligibilityModule", "sex"]), "All");
            record.min_age = or_default(text(proto, &["eligibilityModule", "minimumAge"]), "N/A");
            record.max_age = or_default(text(proto, &["eligibilityModule", "maximumAge"]), "N/A");

            for loc in objects(proto, &["contactsLocationsModule", "locations"]) {
                let field = |key: &str| text(loc, &[key]).or_else(|| text(loc, &["location", key]));
                record.location_city.extend(field("city"));
                record.location_state.extend(field("state"));
                record.location_country.extend(field("country"));
            }

            for module in ["armsInterventionsModule", "interventionsModule"] {
                for iv in objects(proto, &[module, "interventions"]) {
                    record.intervention_names.extend(text(iv, &["name"]));
                }
            }

            Some(record)
        })
        .collect();

    Some(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn study_fields_takes_first_scalar_and_keeps_lists() {
        let payload = json!({
            "StudyFieldsResponse": {
                "StudyFields": [{
                    "Rank": 1,
                    "NCTId": ["NCT04000001"],
                    "BriefTitle": ["Trastuzumab Deruxtecan in HER2+ Breast Cancer"],
                    "Condition": ["Breast Cancer", "HER2-positive Breast Cancer"],
                    "Gender": [],
                    "MinimumAge": ["18 Years"],
                    "LocationCity": ["Boston", "Houston"]
                }]
            }
        });

        let records = normalize_study_fields(&payload).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.nct_id, "NCT04000001");
        assert_eq!(r.conditions.len(), 2);
        assert_eq!(r.gender, "All");
        assert_eq!(r.min_age, "18 Years");
        assert_eq!(r.max_age, "N/A");
        assert_eq!(r.location_city, vec!["Boston", "Houston"]);
        assert!(r.phase.is_empty());
        assert_eq!(r.brief_summary, "");
    }

    #[test]
    fn wrong_envelope_is_none() {
        let v2 = json!({"studies": []});
        assert!(normalize_study_fields(&v2).is_none());
        assert!(normalize_full_studies(&v2).is_none());
        assert!(normalize_v2_studies(&json!({"StudyFieldsResponse": {}})).is_none());
        assert!(normalize_v2_studies(&json!("not an object")).is_none());
    }

    #[test]
    fn malformed_studies_are_skipped() {
        let payload = json!({
            "studies": [
                42,
                {"protocolSection": {"identificationModule": {"briefTitle": "No id"}}},
                {"protocolSection": {"identificationModule": {"nctId": "NCT05000002"}}}
            ]
        });

        let records = normalize_v2_studies(&payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nct_id, "NCT05000002");
    }

    #[test]
    fn full_studies_single_phase_string_becomes_list() {
        let payload = json!({
            "FullStudiesResponse": {
                "FullStudies": [{
                    "Rank": 1,
                    "Study": {"ProtocolSection": {
                        "IdentificationModule": {"NCTId": "NCT03000003", "OfficialTitle": "Official"},
                        "DesignModule": {"PhaseList": {"Phase": "Phase 2"}, "StudyType": "Interventional"}
                    }}
                }]
            }
        });

        let r = &normalize_full_studies(&payload).unwrap()[0];
        assert_eq!(r.brief_title.as_deref(), Some("Official"));
        assert_eq!(r.phase, vec!["Phase 2"]);
        assert_eq!(r.study_type, vec!["Interventional"]);
    }
}
