//! medifuse-backend — where an analysis runs.
//!
//! A local backend wraps the in-process [`medifuse_ranker::Analyzer`]; a
//! remote backend calls an analysis service over HTTP. The router prefers
//! the remote one and falls back to local analysis when it fails.

pub mod backend;
pub mod local;
pub mod remote;
pub mod router;

pub use backend::{AnalysisBackend, BackendError, HealthStatus};
pub use local::LocalBackend;
pub use remote::RemoteBackend;
pub use router::{AnalysisRouter, RoutingPolicy};
