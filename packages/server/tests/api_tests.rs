//! HTTP surface: routing, status codes and response envelopes.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use registry_client::QueryShape;
use serde_json::{json, Value};
use tower::ServiceExt;
use trials_core::kernel::test_dependencies::v2_payload;
use trials_core::kernel::{MockRegistry, TestDependencies};
use trials_core::server::build_app;

const HER2_CASE: &str = "58-year-old woman with HER2-positive invasive ductal carcinoma";

fn app(registry: MockRegistry) -> Router {
    build_app(TestDependencies::new().mock_registry(registry).into_deps())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_json_raw(uri, &body.to_string())
}

fn post_json_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(MockRegistry::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn extract_returns_profile() {
    let request = post_json("/api/extract", json!({"transcript": HER2_CASE}));

    let (status, body) = send(app(MockRegistry::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extracted"]["age"], 58);
    assert_eq!(body["extracted"]["sex"], "female");
    assert_eq!(body["extracted"]["keywords"], json!(["her2"]));
}

#[tokio::test]
async fn missing_or_blank_transcript_is_bad_request() {
    for (uri, body) in [
        ("/api/extract", json!({})),
        ("/api/extract", json!({"transcript": "   "})),
        ("/api/match", json!({"transcript": ""})),
    ] {
        let (status, body) = send(app(MockRegistry::new()), post_json(uri, body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body, json!({"error": "Missing transcript"}));
    }
}

#[tokio::test]
async fn bodies_that_are_not_json_are_bad_request() {
    let requests = [
        // Empty body
        Request::builder()
            .method("POST")
            .uri("/api/extract")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap(),
        // Form-encoded body
        Request::builder()
            .method("POST")
            .uri("/api/match")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("transcript=58F"))
            .unwrap(),
        // Malformed JSON
        post_json_raw("/api/extract", "{\"transcript\": "),
    ];

    for request in requests {
        let (status, body) = send(app(MockRegistry::new()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing transcript"}));
    }
}

#[tokio::test]
async fn json_without_content_type_is_accepted() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/extract")
        .body(Body::from(json!({"transcript": HER2_CASE}).to_string()))
        .unwrap();

    let (status, body) = send(app(MockRegistry::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extracted"]["age"], 58);
}

#[tokio::test]
async fn match_returns_profile_and_results() {
    let registry = MockRegistry::new()
        .with_payload(
            QueryShape::Primary,
            json!({"StudyFieldsResponse": {"StudyFields": []}}),
        )
        .with_payload(QueryShape::Secondary, json!({"unexpected": true}))
        .with_payload(
            QueryShape::Tertiary,
            v2_payload(&[("NCT00000001", "FEMALE", "18 Years", "N/A")]),
        );
    let request = post_json("/api/match", json!({"transcript": HER2_CASE}));

    let (status, body) = send(app(registry), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extracted"]["age"], 58);
    assert_eq!(body["results"]["count"], 1);
    assert_eq!(body["results"]["endpoint"], "v2_studies");
    assert_eq!(body["results"]["studies"][0]["nctId"], "NCT00000001");
    assert!(body["results"]["expr"].as_str().unwrap().contains("HER2"));
    assert!(body["results"].get("note").is_none());
}

#[tokio::test]
async fn registry_outage_is_bad_gateway_with_profile() {
    let request = post_json("/api/match", json!({"transcript": HER2_CASE}));

    let (status, body) = send(app(MockRegistry::new()), request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["extracted"]["sex"], "female");
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
    assert!(body.get("results").is_none());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app(MockRegistry::new()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
