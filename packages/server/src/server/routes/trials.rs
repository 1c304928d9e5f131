//! Transcript extraction and trial matching endpoints.
//!
//! POST /api/extract  {"transcript": "..."} -> {"extracted": PatientProfile}
//! POST /api/match    {"transcript": "..."} -> {"extracted": PatientProfile, "results": MatchResult}
//!
//! If the client disconnects, axum drops the handler future, which drops
//! any in-flight LLM or registry request with it.

use axum::{body::Bytes, extract::Extension, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::trials::{self, PatientProfile, TrialsError};
use crate::server::app::AxumAppState;

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    #[serde(default)]
    pub transcript: String,
}

type ApiResponse = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (status, Json(json!({ "error": message.into() })))
}

fn missing_transcript() -> ApiResponse {
    error_response(StatusCode::BAD_REQUEST, "Missing transcript")
}

/// Read the transcript from a JSON body regardless of content type.
/// An unreadable body or a blank transcript yields `None`.
fn transcript_from(body: &[u8]) -> Option<String> {
    let request: TranscriptRequest = serde_json::from_slice(body).ok()?;
    if request.transcript.trim().is_empty() {
        return None;
    }
    Some(request.transcript)
}

fn status_for(error: &TrialsError) -> StatusCode {
    match error {
        TrialsError::RegistryUnavailable { .. } => StatusCode::BAD_GATEWAY,
        TrialsError::ExtractionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn extract_for(state: &AxumAppState, transcript: &str) -> Result<PatientProfile, ApiResponse> {
    trials::extract(transcript, &state.deps).await.map_err(|e| {
        tracing::error!(error = %e, "Extraction failed");
        error_response(status_for(&e), e.to_string())
    })
}

pub async fn extract_handler(Extension(state): Extension<AxumAppState>, body: Bytes) -> ApiResponse {
    let Some(transcript) = transcript_from(&body) else {
        return missing_transcript();
    };

    match extract_for(&state, &transcript).await {
        Ok(profile) => (StatusCode::OK, Json(json!({ "extracted": profile }))),
        Err(response) => response,
    }
}

pub async fn match_handler(Extension(state): Extension<AxumAppState>, body: Bytes) -> ApiResponse {
    let Some(transcript) = transcript_from(&body) else {
        return missing_transcript();
    };

    let profile = match extract_for(&state, &transcript).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    match trials::match_profile(&profile, &state.deps).await {
        Ok(results) => (
            StatusCode::OK,
            Json(json!({ "extracted": profile, "results": results })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Trial matching failed");
            (
                status_for(&e),
                Json(json!({ "extracted": profile, "error": e.to_string() })),
            )
        }
    }
}
