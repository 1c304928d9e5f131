// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for and how to read registry payloads live in the trials domain.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseRegistry)

use anyhow::Result;
use async_trait::async_trait;
use registry_client::QueryShape;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Complete a prompt expecting JSON response (returns raw text, which may
    /// still wrap the JSON in prose or fences)
    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }
}

// =============================================================================
// Registry Trait (Infrastructure - trial registry search)
// =============================================================================

#[async_trait]
pub trait BaseRegistry: Send + Sync {
    /// Run one search against one API shape and return the raw JSON body.
    /// Non-2xx responses, timeouts and non-JSON bodies are errors.
    async fn search(
        &self,
        expr: &str,
        shape: QueryShape,
        page_size: u32,
    ) -> Result<serde_json::Value>;
}
