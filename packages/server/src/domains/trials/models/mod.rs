pub mod match_result;
pub mod patient_profile;

pub use match_result::MatchResult;
pub use patient_profile::{push_unique, PatientProfile, Sex, MAX_AGE};
