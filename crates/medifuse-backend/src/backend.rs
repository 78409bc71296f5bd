//! Analysis backend trait and shared error type.

use async_trait::async_trait;
use medifuse_common::entities::{AnalysisRequest, AnalysisResult};
use medifuse_common::MedifuseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Analysis error: {0}")]
    Analysis(#[from] MedifuseError),
}

// ── Health ────────────────────────────────────────────────────────────────────

pub const HEALTHY: &str = "healthy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn healthy(engine: impl Into<String>) -> Self {
        Self {
            status: HEALTHY.to_string(),
            engine: Some(engine.into()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, BackendError>;
    async fn health(&self) -> Result<HealthStatus, BackendError>;
    fn name(&self) -> &str;
    fn is_local(&self) -> bool;
}
