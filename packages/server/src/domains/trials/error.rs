use thiserror::Error;

/// Failures surfaced by the trials pipeline.
///
/// LLM failures never appear here; they are absorbed by heuristic fallback.
#[derive(Debug, Error)]
pub enum TrialsError {
    /// Neither the LLM nor the heuristics could produce a profile
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// Every registry query shape failed
    #[error("registry unavailable: {}", .attempts.join("; "))]
    RegistryUnavailable { attempts: Vec<String> },
}

pub type Result<T> = std::result::Result<T, TrialsError>;
