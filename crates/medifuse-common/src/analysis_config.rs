//! Analysis configuration.
//!
//! Two scoring choices change emitted numbers for the same input and are
//! therefore explicit configuration rather than hardcoded behaviour:
//! the text-scoring weighting and the missing-value policy for sparse
//! patient records. Both default to the canonical behaviour.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Complete analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Scoring choices
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Clinical insight generation
    #[serde(default)]
    pub insights: InsightConfig,

    /// Optional YAML/JSON knowledge base replacing the builtin one
    #[serde(default)]
    pub knowledge_base_path: Option<String>,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// How matched keywords contribute to a text score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextWeighting {
    /// Σ 1/|symptoms| only.
    SymptomsOnly,
    /// Σ 1/|symptoms| plus Σ 0.5/|risk_factors|.
    #[default]
    SymptomsAndRiskFactors,
}

/// What absent patient measurements are replaced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Age 45, glucose 100, cholesterol 200, HDL 50, LDL 120, BMI 25.
    #[default]
    Neutral,
    /// Everything 0.
    Zero,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub text_weighting: TextWeighting,

    #[serde(default)]
    pub missing_values: MissingValuePolicy,
}

// ── Insights ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Attach taxonomy levels, follow-up questions and differentials
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_follow_ups")]
    pub max_follow_up_questions: usize,

    #[serde(default = "default_max_differentials")]
    pub max_differentials: usize,
}

fn default_true() -> bool { true }
fn default_max_follow_ups() -> usize { 12 }
fn default_max_differentials() -> usize { 6 }

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_follow_up_questions: default_max_follow_ups(),
            max_differentials: default_max_differentials(),
        }
    }
}

// ── Helper Methods ───────────────────────────────────────────────────────────

impl AnalysisConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        debug!(path, "Analysis config loaded");
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!(path, "Analysis config loaded");
        Ok(config)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
