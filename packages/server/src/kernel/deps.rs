//! Server dependencies for the trials pipeline (using traits for testability)
//!
//! Every request borrows these; nothing in here is mutated after startup.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, MatchConfig};
use crate::kernel::{BaseAI, BaseRegistry, GeminiAI, RegistryAdapter};

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    /// LLM used for extraction. `None` when no key is configured.
    pub ai: Option<Arc<dyn BaseAI>>,
    pub registry: Arc<dyn BaseRegistry>,
    /// Upper bound on the whole LLM extraction call
    pub llm_timeout: Duration,
    pub page_size: u32,
    pub matching: MatchConfig,
}

impl ServerDeps {
    pub fn new(
        ai: Option<Arc<dyn BaseAI>>,
        registry: Arc<dyn BaseRegistry>,
        llm_timeout: Duration,
        page_size: u32,
        matching: MatchConfig,
    ) -> Self {
        Self {
            ai,
            registry,
            llm_timeout,
            page_size,
            matching,
        }
    }

    /// Wire the real Gemini and registry clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ai = GeminiAI::from_config(&config.llm)?.map(|ai| Arc::new(ai) as Arc<dyn BaseAI>);
        if ai.is_none() {
            tracing::warn!("GOOGLE_API_KEY not set; extraction will use heuristics only");
        }

        let registry: Arc<dyn BaseRegistry> = Arc::new(RegistryAdapter::from_config(&config.registry)?);

        Ok(Self::new(
            ai,
            registry,
            config.llm.timeout,
            config.registry.page_size,
            config.matching.clone(),
        ))
    }
}
