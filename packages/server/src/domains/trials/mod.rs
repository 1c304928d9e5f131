//! Trial matching: transcript extraction, registry search and eligibility filtering.

pub mod actions;
pub mod effects;
pub mod error;
pub mod extraction;
pub mod models;
pub mod utils;

pub use actions::{extract, match_profile, match_trials};
pub use error::{Result, TrialsError};
pub use models::{MatchResult, PatientProfile, Sex};
