/// Confidence bucketing and overall-confidence dampening.
///
/// Every score the pipeline emits lives in [0.0, 1.0]; the bucket thresholds
/// and dampening constants below are fixed so that output stays comparable
/// across scorers and across runs.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are `High`.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Scores strictly above this (and not high) are `Medium`.
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// A scorer emits a disease only when its score is strictly above this.
pub const INCLUSION_THRESHOLD: f64 = 0.1;

/// Multiplier applied to the top fused score.
pub const OVERALL_DAMPENING: f64 = 0.9;
/// A heuristic never reports more than this.
pub const OVERALL_CEILING: f64 = 0.95;

/// Coarse low/medium/high label derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBucket {
    Low,
    Medium,
    High,
}

impl ConfidenceBucket {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_CONFIDENCE_THRESHOLD {
            ConfidenceBucket::High
        } else if score > MEDIUM_CONFIDENCE_THRESHOLD {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBucket::Low    => "low",
            ConfidenceBucket::Medium => "medium",
            ConfidenceBucket::High   => "high",
        }
    }
}

/// Clamp a raw additive score into [0, 1].
pub fn clamp_score(raw: f64) -> f64 {
    raw.clamp(0.0, 1.0)
}

/// Whether a score is high enough for a scorer to emit the disease.
/// The boundary itself (exactly 0.1) is excluded.
pub fn passes_inclusion(score: f64) -> bool {
    score > INCLUSION_THRESHOLD
}

/// Overall confidence for a ranked differential, given the top fused score.
/// Returns 0.0 when nothing was found.
pub fn overall_confidence(top_fused_score: Option<f64>) -> f64 {
    match top_fused_score {
        Some(score) => (score * OVERALL_DAMPENING).min(OVERALL_CEILING),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_thresholds_are_strict() {
        assert_eq!(ConfidenceBucket::from_score(0.7), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::from_score(0.71), ConfidenceBucket::High);
        assert_eq!(ConfidenceBucket::from_score(0.4), ConfidenceBucket::Low);
        assert_eq!(ConfidenceBucket::from_score(0.41), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::from_score(0.0), ConfidenceBucket::Low);
    }

    #[test]
    fn test_inclusion_boundary_excluded() {
        assert!(!passes_inclusion(0.1));
        assert!(passes_inclusion(0.1000001));
        assert!(!passes_inclusion(0.0));
    }

    #[test]
    fn test_overall_confidence_capped() {
        assert!((overall_confidence(Some(1.0)) - 0.9).abs() < 1e-9);
        // Out-of-range input still never exceeds the ceiling
        assert_eq!(overall_confidence(Some(5.0)), 0.95);
        assert!((overall_confidence(Some(0.5)) - 0.45).abs() < 1e-9);
        assert_eq!(overall_confidence(None), 0.0);
    }

    #[test]
    fn test_bucket_serializes_lowercase() {
        let json = serde_json::to_string(&ConfidenceBucket::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
