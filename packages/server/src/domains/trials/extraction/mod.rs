//! Transcript → PatientProfile.
//!
//! The LLM is tried first when configured. Any failure of the call itself
//! (timeout, network, no usable JSON) falls back to heuristics entirely;
//! unusable individual fields fall back one by one.

pub mod heuristic;
pub mod llm;

pub use heuristic::heuristic_extract;
pub use llm::{extraction_prompt, parse_llm_response, ParsedProfile, PartialProfile};

use std::time::Duration;

use crate::domains::trials::models::PatientProfile;
use crate::kernel::BaseAI;

/// Extract a profile, preferring the LLM and degrading to heuristics.
///
/// Never fails: the worst case is the heuristic profile.
pub async fn extract_profile(
    ai: Option<&dyn BaseAI>,
    timeout: Duration,
    transcript: &str,
) -> PatientProfile {
    let heuristic = heuristic_extract(transcript);

    let Some(ai) = ai else {
        tracing::debug!("No LLM configured, using heuristic extraction");
        return heuristic;
    };

    let prompt = extraction_prompt(transcript);
    let response = match tokio::time::timeout(timeout, ai.complete_json(&prompt)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "LLM extraction failed, using heuristics");
            return heuristic;
        }
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis(), "LLM extraction timed out, using heuristics");
            return heuristic;
        }
    };

    let parsed = parse_llm_response(&response);
    let missing = parsed.missing_fields();
    if !missing.is_empty() {
        tracing::warn!(
            fields = ?missing,
            response_length = response.len(),
            "LLM response incomplete, filling from heuristics"
        );
    }

    parsed.merge_with(heuristic)
}
