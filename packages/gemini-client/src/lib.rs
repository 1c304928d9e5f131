//! Pure Gemini REST API client
//!
//! A minimal client for the Generative Language API with no domain-specific logic.
//! Supports single-turn `generateContent` calls with optional JSON output.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerationConfig};
//!
//! let client = GeminiClient::from_env()?;
//!
//! let text = client
//!     .generate_text("gemini-2.5-flash", "Reply with {\"ok\": true}", GenerationConfig::json(0.2, 0.9))
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::*;

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| GeminiError::Config("GOOGLE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, regional endpoints, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a per-request timeout to every call made by this client.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Call `models/{model}:generateContent`.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, model, "Gemini request failed");
                GeminiError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, model, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model,
            candidates = body.candidates.len(),
            duration_ms = start.elapsed().as_millis(),
            "Gemini generateContent"
        );

        Ok(body)
    }

    /// Single prompt in, first candidate's text out.
    pub async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<String> {
        let request = GenerateRequest::prompt(prompt).with_config(config);
        let response = self.generate_content(model, &request).await?;
        response.text().ok_or_else(|| {
            GeminiError::Parse(format!(
                "No text candidate in Gemini response (finish reason: {})",
                response.finish_reason().unwrap_or("none")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key").with_base_url("https://proxy.example.com/v1/");

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url(), "https://proxy.example.com/v1");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://proxy.example.com/v1/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = GeminiClient::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .unwrap();

        let err = client
            .generate_text("m", "p", GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::Network(_) | GeminiError::Timeout));
    }
}
