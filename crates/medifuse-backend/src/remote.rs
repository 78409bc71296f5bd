//! HTTP backend for a remote analysis service.
//!
//! Contract:
//!   GET  {base}/health   → `{"status": "healthy", ...}`
//!   POST {base}/analyze  → `AnalysisResult` JSON (request body is the
//!                          `AnalysisRequest`)

use std::time::Duration;

use async_trait::async_trait;
use medifuse_common::entities::{AnalysisOutcome, AnalysisRequest, AnalysisResult};
use tracing::debug;

use crate::backend::{AnalysisBackend, BackendError, HealthStatus};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RemoteBackend {
    pub base_url: String,
    client: reqwest::Client,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Parse a JSON body, turning HTTP error statuses into `ApiError`.
async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value, BackendError> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    let body: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(_) if status >= 400 => serde_json::Value::String(text),
        Err(e) => return Err(e.into()),
    };
    if status >= 400 {
        let message = body["error"]["message"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .or_else(|| body.as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(BackendError::ApiError { status, message });
    }
    Ok(body)
}

#[async_trait]
impl AnalysisBackend for RemoteBackend {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, BackendError> {
        let resp = self.client.post(self.url("analyze")).json(req).send().await?;
        let status = resp.status().as_u16();
        let body = check_response_status(resp).await?;

        // A service may answer 200 with its own failure marker.
        match serde_json::from_value::<AnalysisOutcome>(body)? {
            AnalysisOutcome::Success(result) => {
                debug!(engine = %result.engine, fused = result.fused_results.len(), "Remote analysis received");
                Ok(*result)
            }
            AnalysisOutcome::Failure(failure) => Err(BackendError::ApiError {
                status,
                message: failure.error,
            }),
        }
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let resp = self.client.get(self.url("health")).send().await?;
        let body = check_response_status(resp).await?;
        let health: HealthStatus = serde_json::from_value(body)?;
        if !health.is_healthy() {
            return Err(BackendError::Unavailable(format!(
                "{} reports status '{}'",
                self.base_url, health.status
            )));
        }
        Ok(health)
    }

    fn name(&self) -> &str { &self.base_url }
    fn is_local(&self) -> bool { false }
}
