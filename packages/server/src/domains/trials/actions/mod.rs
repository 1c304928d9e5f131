//! Entry points exposed to the HTTP layer.

pub mod extract;
pub mod match_trials;

pub use extract::extract;
pub use match_trials::{match_profile, match_trials};
