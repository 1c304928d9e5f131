// AI implementation using Gemini
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gemini_client::{GeminiClient, GenerationConfig};

use super::BaseAI;
use crate::config::LlmConfig;

const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.9;

/// Gemini implementation of AI capabilities
///
/// Tries each candidate model in order; the first one that answers wins.
#[derive(Clone)]
pub struct GeminiAI {
    client: GeminiClient,
    models: Vec<String>,
}

impl GeminiAI {
    pub fn new(client: GeminiClient, models: Vec<String>) -> Self {
        Self { client, models }
    }

    /// Build from config. Returns `None` when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };
        let client = GeminiClient::new(api_key)
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout)
            .context("Failed to create Gemini client")?;
        Ok(Some(Self::new(client, config.candidate_models())))
    }

    async fn generate(&self, prompt: &str, config: GenerationConfig) -> Result<String> {
        let mut last_error = None;

        for model in &self.models {
            tracing::debug!(model = %model, prompt_length = prompt.len(), "Calling Gemini API");

            match self.client.generate_text(model, prompt, config.clone()).await {
                Ok(text) => {
                    tracing::info!(
                        model = %model,
                        response_length = text.len(),
                        "Gemini API response received"
                    );
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Gemini model failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err::<String, _>(e).context("No Gemini model succeeded"),
            None => anyhow::bail!("No Gemini models configured"),
        }
    }
}

#[async_trait]
impl BaseAI for GeminiAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let config = GenerationConfig {
            temperature: Some(TEMPERATURE),
            top_p: Some(TOP_P),
            response_mime_type: None,
        };
        self.generate(prompt, config).await
    }

    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, GenerationConfig::json(TEMPERATURE, TOP_P))
            .await
    }
}
