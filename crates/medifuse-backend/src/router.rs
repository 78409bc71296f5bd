//! Analysis router — remote first, local fallback.
//!
//! Every path ends in an [`AnalysisOutcome`]: a full result, or an explicit
//! failure with an empty differential. Callers never see a partial result.

use std::sync::Arc;

use medifuse_common::entities::{AnalysisFailure, AnalysisOutcome, AnalysisRequest};
use tracing::{info, warn};

use crate::backend::{AnalysisBackend, BackendError};

#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    /// Run the request locally when the remote backend fails.
    pub fallback_to_local: bool,
    /// Probe `health` before each remote call and skip the remote when it
    /// is not healthy.
    pub check_health: bool,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self { fallback_to_local: true, check_health: false }
    }
}

pub struct AnalysisRouter {
    local: Arc<dyn AnalysisBackend>,
    remote: Option<Arc<dyn AnalysisBackend>>,
    policy: RoutingPolicy,
}

impl AnalysisRouter {
    pub fn new(local: Arc<dyn AnalysisBackend>, policy: RoutingPolicy) -> Self {
        Self { local, remote: None, policy }
    }

    pub fn with_remote(mut self, remote: Arc<dyn AnalysisBackend>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    pub async fn analyze(&self, req: &AnalysisRequest) -> AnalysisOutcome {
        let Some(remote) = &self.remote else {
            return self.run_local(req).await;
        };

        match self.try_remote(remote.as_ref(), req).await {
            Ok(outcome) => outcome,
            Err(e) if self.policy.fallback_to_local => {
                warn!(backend = remote.name(), error = %e, "Remote analysis failed, falling back to local");
                self.run_local(req).await
            }
            Err(e) => {
                warn!(backend = remote.name(), error = %e, "Remote analysis failed, no fallback configured");
                AnalysisFailure::new(e).into()
            }
        }
    }

    async fn try_remote(
        &self,
        remote: &dyn AnalysisBackend,
        req: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, BackendError> {
        if self.policy.check_health {
            remote.health().await?;
        }
        let result = remote.analyze(req).await?;
        info!(
            backend = remote.name(),
            is_local = false,
            fused = result.fused_results.len(),
            "Analysis routed"
        );
        Ok(result.into())
    }

    async fn run_local(&self, req: &AnalysisRequest) -> AnalysisOutcome {
        match self.local.analyze(req).await {
            Ok(result) => {
                info!(
                    backend = self.local.name(),
                    is_local = true,
                    fused = result.fused_results.len(),
                    "Analysis routed"
                );
                result.into()
            }
            Err(e) => {
                warn!(error = %e, "Local analysis failed");
                AnalysisFailure::new(e).into()
            }
        }
    }
}
