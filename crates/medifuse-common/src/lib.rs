//! medifuse-common — Shared types, errors, and configuration used across all medifuse crates.

pub mod error;
pub mod entities;
pub mod confidence;
pub mod patient;
pub mod analysis_config;

// Re-export commonly used types
pub use analysis_config::{AnalysisConfig, InsightConfig, MissingValuePolicy, ScoringConfig, TextWeighting};
pub use error::{MedifuseError, Result};
