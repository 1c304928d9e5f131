// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use registry_client::QueryShape;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseAI, BaseRegistry, ServerDeps};
use crate::config::MatchConfig;

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

enum MockReply {
    Text(String),
    Fail(String),
    Hang,
}

pub struct MockAI {
    responses: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(MockReply::Text(response.into()));
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.push(MockReply::Text(json));
        self
    }

    /// Queue a service error
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Fail(message.into()));
        self
    }

    /// Queue a call that never completes (exercises the caller's timeout)
    pub fn with_hang(self) -> Self {
        self.push(MockReply::Hang);
        self
    }

    fn push(&self, reply: MockReply) {
        self.responses.lock().unwrap().push_back(reply);
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the last prompt sent to the AI
    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(prompt.to_string());

        let reply = self.responses.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(anyhow::anyhow!(message)),
            Some(MockReply::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => anyhow::bail!("MockAI has no queued response"),
        }
    }
}

// =============================================================================
// Mock Registry
// =============================================================================

/// Arguments captured from a registry search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub expr: String,
    pub shape: QueryShape,
    pub page_size: u32,
}

pub struct MockRegistry {
    responses: Arc<Mutex<HashMap<QueryShape, std::result::Result<serde_json::Value, String>>>>,
    calls: Arc<Mutex<Vec<SearchCall>>>,
}

impl MockRegistry {
    /// Every shape fails until a response is registered for it.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return this payload whenever `shape` is searched
    pub fn with_payload(self, shape: QueryShape, payload: serde_json::Value) -> Self {
        self.responses.lock().unwrap().insert(shape, Ok(payload));
        self
    }

    /// Fail whenever `shape` is searched
    pub fn with_error(self, shape: QueryShape, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(shape, Err(message.into()));
        self
    }

    /// Get all searches in the order they were issued
    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Shapes attempted, in order
    pub fn shapes_tried(&self) -> Vec<QueryShape> {
        self.calls.lock().unwrap().iter().map(|c| c.shape).collect()
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRegistry for MockRegistry {
    async fn search(
        &self,
        expr: &str,
        shape: QueryShape,
        page_size: u32,
    ) -> Result<serde_json::Value> {
        self.calls.lock().unwrap().push(SearchCall {
            expr: expr.to_string(),
            shape,
            page_size,
        });

        match self.responses.lock().unwrap().get(&shape) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => anyhow::bail!("HTTP 503 from {}", shape),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// v2-shaped payload for the given `(nct_id, sex, min_age, max_age)` studies.
pub fn v2_payload(studies: &[(&str, &str, &str, &str)]) -> serde_json::Value {
    let studies: Vec<serde_json::Value> = studies
        .iter()
        .map(|(id, sex, min_age, max_age)| {
            serde_json::json!({
                "protocolSection": {
                    "identificationModule": {"nctId": id, "briefTitle": format!("Study {}", id)},
                    "statusModule": {"overallStatus": "RECRUITING"},
                    "descriptionModule": {"briefSummary": "Summary."},
                    "eligibilityModule": {"sex": sex, "minimumAge": min_age, "maximumAge": max_age}
                }
            })
        })
        .collect();
    serde_json::json!({ "studies": studies })
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Option<Arc<MockAI>>,
    pub registry: Arc<MockRegistry>,
    pub llm_timeout: Duration,
    pub page_size: u32,
    pub matching: MatchConfig,
}

impl TestDependencies {
    /// No LLM configured, registry fails on every shape.
    pub fn new() -> Self {
        Self {
            ai: None,
            registry: Arc::new(MockRegistry::new()),
            llm_timeout: Duration::from_millis(200),
            page_size: 30,
            matching: MatchConfig::default(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Some(Arc::new(ai));
        self
    }

    /// Set a mock registry
    pub fn mock_registry(mut self, registry: MockRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.ai.map(|ai| ai as Arc<dyn BaseAI>),
            self.registry,
            self.llm_timeout,
            self.page_size,
            self.matching,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
