// Clinical Trial Matcher - API Core
//
// Extracts a patient profile from a clinical transcript (LLM with heuristic
// fallback), searches a public trial registry and filters the studies for
// the patient. All state is request-scoped.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
