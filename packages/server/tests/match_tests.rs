//! Transcript-to-trials matching against a mocked registry.

use registry_client::QueryShape;
use serde_json::json;
use trials_core::config::MatchConfig;
use trials_core::domains::trials::{match_profile, match_trials, PatientProfile, Sex, TrialsError};
use trials_core::kernel::test_dependencies::v2_payload;
use trials_core::kernel::{MockRegistry, TestDependencies};

const HER2_CASE: &str = "58-year-old woman with HER2-positive invasive ductal carcinoma";

fn her2_registry() -> MockRegistry {
    MockRegistry::new()
        .with_error(QueryShape::Primary, "HTTP 404")
        .with_error(QueryShape::Secondary, "HTTP 404")
        .with_payload(
            QueryShape::Tertiary,
            v2_payload(&[
                ("NCT00000001", "FEMALE", "18 Years", "75 Years"),
                ("NCT00000002", "MALE", "18 Years", "N/A"),
                ("NCT00000003", "ALL", "65 Years", "N/A"),
                ("NCT00000004", "ALL", "18 Years", "N/A"),
            ]),
        )
}

#[tokio::test]
async fn her2_case_matches_eligible_studies() {
    let test_deps = TestDependencies::new().mock_registry(her2_registry());
    let registry = test_deps.registry.clone();
    let deps = test_deps.into_deps();

    let result = match_trials(HER2_CASE, &deps).await.unwrap();

    assert!(result.expr.contains("HER2"));
    let ids: Vec<&str> = result.studies.iter().map(|s| s.nct_id.as_str()).collect();
    assert_eq!(ids, vec!["NCT00000001", "NCT00000004"]);
    assert_eq!(result.count, 2);
    assert_eq!(result.endpoint, Some(QueryShape::Tertiary));
    assert_eq!(result.note, None);

    assert_eq!(registry.shapes_tried(), QueryShape::ALL.to_vec());
    assert!(registry.calls().iter().all(|c| c.expr == result.expr && c.page_size == 30));
}

#[tokio::test]
async fn every_shape_failing_is_registry_unavailable() {
    let deps = TestDependencies::new().into_deps();

    let err = match_trials(HER2_CASE, &deps).await.unwrap_err();

    match err {
        TrialsError::RegistryUnavailable { attempts } => assert_eq!(attempts.len(), 3),
        other => panic!("expected RegistryUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn no_eligible_study_returns_unfiltered_with_note() {
    let registry = MockRegistry::new().with_payload(
        QueryShape::Primary,
        json!({"StudyFieldsResponse": {"StudyFields": [
            {"NCTId": ["NCT00000010"], "Gender": ["Male"], "MinimumAge": ["18 Years"]},
            {"NCTId": ["NCT00000011"], "Gender": ["All"], "MinimumAge": ["70 Years"]}
        ]}}),
    );
    let deps = TestDependencies::new().mock_registry(registry).into_deps();

    let result = match_trials(HER2_CASE, &deps).await.unwrap();

    assert_eq!(result.studies.len(), 2);
    assert_eq!(result.count, 2);
    assert_eq!(result.endpoint, Some(QueryShape::Primary));
    assert!(result.note.unwrap().contains("unfiltered"));
}

#[tokio::test]
async fn well_formed_empty_result_is_not_an_outage() {
    let registry = MockRegistry::new()
        .with_payload(QueryShape::Secondary, json!({"FullStudiesResponse": {"FullStudies": []}}));
    let deps = TestDependencies::new().mock_registry(registry).into_deps();

    let result = match_trials(HER2_CASE, &deps).await.unwrap();

    assert!(result.studies.is_empty());
    assert_eq!(result.count, 0);
    assert_eq!(result.endpoint, Some(QueryShape::Secondary));
    assert_eq!(result.note, None);
}

#[tokio::test]
async fn results_are_capped_and_summaries_truncated() {
    let ids: Vec<String> = (0..20).map(|i| format!("NCT000001{:02}", i)).collect();
    let studies: Vec<(&str, &str, &str, &str)> = ids
        .iter()
        .map(|id| (id.as_str(), "ALL", "18 Years", "N/A"))
        .collect();
    let mut payload = v2_payload(&studies);
    payload["studies"][0]["protocolSection"]["descriptionModule"]["briefSummary"] =
        json!("x".repeat(1000));

    // Wrong envelope for the primary shape, so the search moves on
    let registry = MockRegistry::new()
        .with_payload(QueryShape::Primary, payload.clone())
        .with_payload(QueryShape::Tertiary, payload);
    let deps = TestDependencies::new()
        .mock_registry(registry)
        .matching(MatchConfig {
            max_results: 5,
            summary_max_chars: 100,
            include_locations: false,
        })
        .into_deps();

    let result = match_trials(HER2_CASE, &deps).await.unwrap();

    assert_eq!(result.studies.len(), 5);
    assert_eq!(result.count, 20);
    assert_eq!(result.endpoint, Some(QueryShape::Tertiary));
    assert_eq!(result.studies[0].brief_summary.chars().count(), 101);
    assert!(result.studies[0].brief_summary.ends_with('…'));
    assert_eq!(result.studies[1].brief_summary, "Summary.");
}

#[tokio::test]
async fn unknown_profile_uses_broad_query() {
    let test_deps = TestDependencies::new().mock_registry(her2_registry());
    let registry = test_deps.registry.clone();
    let deps = test_deps.into_deps();

    let result = match_profile(&PatientProfile::default(), &deps).await.unwrap();

    assert_eq!(result.expr, "\"breast cancer\" OR HER2");
    // Unknown age and sex pass every study
    assert_eq!(result.count, 4);
    assert_eq!(registry.calls()[0].expr, result.expr);
}

#[tokio::test]
async fn locations_narrow_the_query_only_when_enabled() {
    let profile = PatientProfile {
        age: Some(58),
        sex: Sex::Female,
        diagnosis: Some("Melanoma".into()),
        keywords: vec![],
        locations: vec!["Boston".into()],
    };

    let deps = TestDependencies::new().mock_registry(her2_registry()).into_deps();
    let result = match_profile(&profile, &deps).await.unwrap();
    assert_eq!(result.expr, "Melanoma");

    let deps = TestDependencies::new()
        .mock_registry(her2_registry())
        .matching(MatchConfig {
            include_locations: true,
            ..MatchConfig::default()
        })
        .into_deps();
    let result = match_profile(&profile, &deps).await.unwrap();
    assert_eq!(result.expr, "(Melanoma) AND (Boston)");
}
