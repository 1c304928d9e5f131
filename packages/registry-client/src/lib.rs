//! Pure ClinicalTrials.gov REST client.
//!
//! Issues one search against one of the three registry API shapes and
//! returns the raw JSON payload. Shape-specific normalizers in
//! [`normalize`] project payloads onto [`StudyRecord`].
//!
//! # Example
//!
//! ```rust,ignore
//! use registry_client::{QueryShape, RegistryClient, RegistryEndpoints};
//!
//! let client = RegistryClient::new(RegistryEndpoints::default(), Duration::from_secs(20))?;
//! let payload = client.search("\"breast cancer\" OR HER2", QueryShape::Tertiary, 30).await?;
//! let studies = QueryShape::Tertiary.normalize(&payload).unwrap_or_default();
//! ```

pub mod error;
pub mod normalize;
pub mod types;

pub use error::{RegistryError, Result};
pub use types::{QueryShape, StudyRecord, STUDY_FIELDS};

use std::time::Duration;

use serde_json::Value;

const USER_AGENT: &str = "TrialMatchDemo/0.1 (+https://example.com)";

/// Endpoint per query shape.
#[derive(Debug, Clone)]
pub struct RegistryEndpoints {
    pub study_fields_url: String,
    pub full_studies_url: String,
    pub v2_studies_url: String,
}

impl Default for RegistryEndpoints {
    fn default() -> Self {
        Self {
            study_fields_url: "https://classic.clinicaltrials.gov/api/query/study_fields".into(),
            full_studies_url: "https://classic.clinicaltrials.gov/api/query/full_studies".into(),
            v2_studies_url: "https://clinicaltrials.gov/api/v2/studies".into(),
        }
    }
}

impl RegistryEndpoints {
    pub fn url(&self, shape: QueryShape) -> &str {
        match shape {
            QueryShape::Primary => &self.study_fields_url,
            QueryShape::Secondary => &self.full_studies_url,
            QueryShape::Tertiary => &self.v2_studies_url,
        }
    }
}

/// Query parameters for a shape.
pub fn query_params(expr: &str, shape: QueryShape, page_size: u32) -> Vec<(&'static str, String)> {
    match shape {
        QueryShape::Primary => vec![
            ("expr", expr.to_string()),
            ("fields", STUDY_FIELDS.join(",")),
            ("min_rnk", "1".to_string()),
            ("max_rnk", page_size.to_string()),
            ("fmt", "json".to_string()),
        ],
        QueryShape::Secondary => vec![
            ("expr", expr.to_string()),
            ("min_rnk", "1".to_string()),
            ("max_rnk", page_size.to_string()),
            ("fmt", "json".to_string()),
        ],
        QueryShape::Tertiary => vec![
            ("query.term", expr.to_string()),
            ("pageSize", page_size.to_string()),
        ],
    }
}

/// Registry HTTP client. No auth is needed.
#[derive(Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    endpoints: RegistryEndpoints,
}

impl RegistryClient {
    /// Build a client whose every attempt is bounded by `timeout`.
    pub fn new(endpoints: RegistryEndpoints, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RegistryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoints })
    }

    /// Run one search against one shape and return the JSON body.
    pub async fn search(&self, expr: &str, shape: QueryShape, page_size: u32) -> Result<Value> {
        let url = self.endpoints.url(shape);
        tracing::debug!(shape = %shape, url, page_size, "Querying registry");

        let resp = self
            .client
            .get(url)
            .query(&query_params(expr, shape, page_size))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| RegistryError::Parse(e.to_string()))
    }
}
