use crate::domains::trials::actions::extract;
use crate::domains::trials::effects::search_registry;
use crate::domains::trials::error::Result;
use crate::domains::trials::models::{MatchResult, PatientProfile};
use crate::domains::trials::utils::{build_expr, select_studies, truncate_summary};
use crate::kernel::ServerDeps;

const UNFILTERED_NOTE: &str =
    "No trials passed local age/sex filters; showing top unfiltered results.";

/// Extract a profile from the transcript, then match it against the registry.
pub async fn match_trials(transcript: &str, deps: &ServerDeps) -> Result<MatchResult> {
    let profile = extract(transcript, deps).await?;
    match_profile(&profile, deps).await
}

/// Query the registry for a profile and filter the studies for it.
///
/// `RegistryUnavailable` is returned unchanged; there is no partial result.
pub async fn match_profile(profile: &PatientProfile, deps: &ServerDeps) -> Result<MatchResult> {
    let expr = build_expr(profile, deps.matching.include_locations);
    tracing::info!(expr = %expr, "Searching registry");

    let hit = search_registry(deps.registry.as_ref(), &expr, deps.page_size).await?;
    let candidates = hit.studies.len();

    let mut selection = select_studies(profile, hit.studies, deps.matching.max_results);
    for study in &mut selection.studies {
        study.brief_summary = truncate_summary(&study.brief_summary, deps.matching.summary_max_chars);
    }

    if selection.unfiltered_fallback {
        tracing::warn!(candidates, "No study passed eligibility filters, returning unfiltered");
    }
    tracing::info!(
        shape = %hit.shape,
        candidates,
        returned = selection.studies.len(),
        "Match complete"
    );

    Ok(MatchResult {
        expr,
        count: selection.count,
        studies: selection.studies,
        endpoint: Some(hit.shape),
        note: selection
            .unfiltered_fallback
            .then(|| UNFILTERED_NOTE.to_string()),
    })
}
