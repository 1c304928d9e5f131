use crate::domains::trials::error::Result;
use crate::domains::trials::extraction::extract_profile;
use crate::domains::trials::models::PatientProfile;
use crate::kernel::ServerDeps;

/// Extract a patient profile from a transcript.
///
/// LLM problems are absorbed by heuristic fallback, so in practice this
/// always returns a profile.
pub async fn extract(transcript: &str, deps: &ServerDeps) -> Result<PatientProfile> {
    tracing::debug!(transcript_length = transcript.len(), "Extracting patient profile");
    let profile = extract_profile(deps.ai.as_deref(), deps.llm_timeout, transcript).await;
    Ok(profile)
}
