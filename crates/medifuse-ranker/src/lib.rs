//! medifuse-ranker — Disease scoring, fusion, and ranking engine.
//!
//! Two independent heuristic scorers (clinical text, structured patient data)
//! feed a fusion step that produces the ranked differential; knowledge,
//! recommendations and insights are attached by [`pipeline::Analyzer`].

pub mod text_scorer;
pub mod risk_rules;
pub mod structured_scorer;
pub mod fusion;
pub mod recommend;
pub mod insights;
pub mod pipeline;

pub use fusion::{fuse, MAX_FUSED_RESULTS};
pub use pipeline::Analyzer;
pub use structured_scorer::StructuredScorer;
pub use text_scorer::TextScorer;
