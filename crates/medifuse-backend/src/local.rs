//! In-process backend over the local analyzer.

use std::sync::Arc;

use async_trait::async_trait;
use medifuse_common::entities::{AnalysisRequest, AnalysisResult};
use medifuse_ranker::pipeline::LOCAL_ENGINE;
use medifuse_ranker::Analyzer;

use crate::backend::{AnalysisBackend, BackendError, HealthStatus};

pub struct LocalBackend {
    analyzer: Arc<Analyzer>,
}

impl LocalBackend {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self { analyzer }
    }

    /// Local backend over the builtin knowledge base.
    pub fn builtin() -> Result<Self, BackendError> {
        Ok(Self::new(Arc::new(Analyzer::builtin()?)))
    }
}

#[async_trait]
impl AnalysisBackend for LocalBackend {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResult, BackendError> {
        // Scoring is CPU-bound; keep it off the async workers.
        let analyzer = Arc::clone(&self.analyzer);
        let req = req.clone();
        tokio::task::spawn_blocking(move || analyzer.analyze(&req))
            .await
            .map_err(|e| BackendError::Unavailable(format!("local analysis task failed: {e}")))
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Ok(HealthStatus::healthy(LOCAL_ENGINE))
    }

    fn name(&self) -> &str { LOCAL_ENGINE }
    fn is_local(&self) -> bool { true }
}
