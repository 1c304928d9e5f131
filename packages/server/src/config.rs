use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use registry_client::RegistryEndpoints;

/// Models tried after the configured one, in order.
pub const FALLBACK_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-latest",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub llm: LlmConfig,
    pub registry: RegistryConfig,
    pub matching: MatchConfig,
}

/// Generative-text service settings. No key means heuristic extraction only.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Configured model first, then the fixed alternates, without repeats.
    pub fn candidate_models(&self) -> Vec<String> {
        let mut models = vec![self.model.clone()];
        for m in FALLBACK_MODELS {
            if !models.iter().any(|existing| existing == m) {
                models.push((*m).to_string());
            }
        }
        models
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

/// Trial registry settings.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub endpoints: RegistryEndpoints,
    /// Applied to each shape attempt separately.
    pub timeout: Duration,
    pub page_size: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoints: RegistryEndpoints::default(),
            timeout: Duration::from_secs(20),
            page_size: 30,
        }
    }
}

/// Query building and result shaping.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_results: usize,
    pub summary_max_chars: usize,
    pub include_locations: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_results: 15,
            summary_max_chars: 600,
            include_locations: false,
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got {:?}", key, raw)),
        _ => Ok(default),
    }
}

fn string_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let llm_defaults = LlmConfig::default();
        let registry_defaults = RegistryConfig::default();
        let endpoints = registry_defaults.endpoints.clone();
        let match_defaults = MatchConfig::default();

        Ok(Self {
            port: parsed("PORT", 8000)?,
            llm: LlmConfig {
                api_key: env::var("GOOGLE_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                model: string_or("GEMINI_MODEL", llm_defaults.model),
                base_url: string_or("GEMINI_BASE_URL", llm_defaults.base_url),
                timeout: Duration::from_secs(parsed("LLM_TIMEOUT_SECS", 20)?),
            },
            registry: RegistryConfig {
                endpoints: RegistryEndpoints {
                    study_fields_url: string_or("REGISTRY_STUDY_FIELDS_URL", endpoints.study_fields_url),
                    full_studies_url: string_or("REGISTRY_FULL_STUDIES_URL", endpoints.full_studies_url),
                    v2_studies_url: string_or("REGISTRY_V2_STUDIES_URL", endpoints.v2_studies_url),
                },
                timeout: Duration::from_secs(parsed("REGISTRY_TIMEOUT_SECS", 20)?),
                page_size: parsed("REGISTRY_PAGE_SIZE", registry_defaults.page_size)?,
            },
            matching: MatchConfig {
                max_results: parsed("MATCH_MAX_RESULTS", match_defaults.max_results)?,
                summary_max_chars: parsed("SUMMARY_MAX_CHARS", match_defaults.summary_max_chars)?,
                include_locations: parsed("QUERY_INCLUDE_LOCATIONS", match_defaults.include_locations)?,
            },
        })
    }
}
