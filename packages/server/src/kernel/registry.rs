// Registry implementation using the ClinicalTrials.gov client

use anyhow::{Context, Result};
use async_trait::async_trait;
use registry_client::{QueryShape, RegistryClient};

use super::BaseRegistry;
use crate::config::RegistryConfig;

/// Wrapper around RegistryClient that implements BaseRegistry trait
pub struct RegistryAdapter(pub RegistryClient);

impl RegistryAdapter {
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let client = RegistryClient::new(config.endpoints.clone(), config.timeout)
            .context("Failed to create registry client")?;
        Ok(Self(client))
    }
}

#[async_trait]
impl BaseRegistry for RegistryAdapter {
    async fn search(
        &self,
        expr: &str,
        shape: QueryShape,
        page_size: u32,
    ) -> Result<serde_json::Value> {
        self.0
            .search(expr, shape, page_size)
            .await
            .map_err(|e| anyhow::anyhow!("{} search failed: {}", shape, e))
    }
}
