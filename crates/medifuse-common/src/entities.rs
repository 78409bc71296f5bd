/// Core request/response types for the analysis pipeline.
/// These are the serialisable shapes exchanged between the scorers, the
/// fusion engine, the backends, and callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::confidence::ConfidenceBucket;
use crate::patient::{PatientFeatures, RawPatientData};

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// How strongly a contributing factor pushed a structured risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// Value of a contributing factor: a measurement or a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub factor: String,
    pub value: FactorValue,
    pub impact: ImpactLevel,
}

/// Why a scorer emitted a disease: a matched keyword from the notes,
/// or a structured factor that crossed a threshold band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Evidence {
    Keyword(String),
    Factor(ContributingFactor),
}

impl Evidence {
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Evidence::Keyword(k) => Some(k.as_str()),
            Evidence::Factor(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-scorer output
// ---------------------------------------------------------------------------

/// Name of the scorer a fused entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerSource {
    Text,
    Structured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDisease {
    pub disease_id: String,
    pub disease_name: String,
    pub score: f64,
    pub confidence: ConfidenceBucket,
    pub evidence: Vec<Evidence>,
}

/// Surface features of the clinical notes, kept for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub length: usize,
    pub word_count: usize,
    pub has_symptoms: bool,
    pub has_history: bool,
    pub has_medication: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextScoring {
    pub diseases: Vec<ScoredDisease>,
    /// Top disease score, 0.0 when nothing was detected.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_features: Option<TextFeatures>,
}

impl TextScoring {
    pub fn empty() -> Self {
        Self { diseases: vec![], confidence: 0.0, text_features: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredScoring {
    pub predictions: Vec<ScoredDisease>,
    /// Top prediction score, 0.0 when nothing was predicted.
    pub risk_score: f64,
    pub features: PatientFeatures,
}

// ---------------------------------------------------------------------------
// Fused differential
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDisease {
    pub disease_id: String,
    pub disease_name: String,
    pub fused_score: f64,
    pub confidence: ConfidenceBucket,
    pub sources: Vec<ScorerSource>,
    pub evidence: Vec<Evidence>,
}

impl FusedDisease {
    pub fn has_source(&self, source: ScorerSource) -> bool {
        self.sources.contains(&source)
    }
}

// ---------------------------------------------------------------------------
// Knowledge and recommendations
// ---------------------------------------------------------------------------

/// Reference knowledge retrieved for a ranked disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    pub disease_id: String,
    pub disease_name: String,
    pub symptoms: Vec<String>,
    pub risk_factors: Vec<String>,
    pub lab_indicators: Vec<String>,
    pub treatments: Vec<String>,
    pub guidelines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Diagnostic,
    Treatment,
    Management,
    Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub content: String,
    pub details: Vec<String>,
}

// ---------------------------------------------------------------------------
// Clinical insights
// ---------------------------------------------------------------------------

/// Three-level category placement of a ranked disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyLevel {
    pub disease: String,
    pub l1: String,
    pub l2: String,
    pub l3: String,
}

/// A pair of look-alike conditions and what tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Differential {
    pub pair: [String; 2],
    pub distinguishing_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClinicalInsights {
    pub levels: Vec<TaxonomyLevel>,
    pub follow_up_questions: Vec<String>,
    pub differentials: Vec<Differential>,
    /// Immediate work-up prompted by acute cardiac cues in the notes.
    #[serde(default)]
    pub urgent_guidance: Vec<String>,
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, alias = "patientData")]
    pub patient_data: RawPatientData,
    #[serde(default, alias = "clinicalNotes")]
    pub clinical_notes: Option<String>,
}

impl AnalysisRequest {
    pub fn new(patient_data: RawPatientData, clinical_notes: impl Into<String>) -> Self {
        Self { patient_data, clinical_notes: Some(clinical_notes.into()) }
    }

    pub fn notes(&self) -> &str {
        self.clinical_notes.as_deref().unwrap_or("")
    }
}

/// The aggregate payload returned for one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Which backend produced the result ("local" or a remote name).
    pub engine: String,
    pub text_scoring: TextScoring,
    pub structured_scoring: StructuredScoring,
    pub fused_results: Vec<FusedDisease>,
    pub knowledge: Vec<KnowledgeSummary>,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<ClinicalInsights>,
    pub confidence_score: f64,
}

impl AnalysisResult {
    pub fn top(&self) -> Option<&FusedDisease> {
        self.fused_results.first()
    }
}

/// Explicit failure marker. Distinct from a successful result with an
/// empty differential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub error: String,
    pub confidence_score: f64,
    pub fused_results: Vec<FusedDisease>,
}

impl AnalysisFailure {
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            error: format!("Analysis failed: {message}"),
            confidence_score: 0.0,
            fused_results: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(Box<AnalysisResult>),
    Failure(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisOutcome::Failure(_))
    }

    pub fn fused_results(&self) -> &[FusedDisease] {
        match self {
            AnalysisOutcome::Success(r) => &r.fused_results,
            AnalysisOutcome::Failure(f) => &f.fused_results,
        }
    }

    pub fn confidence_score(&self) -> f64 {
        match self {
            AnalysisOutcome::Success(r) => r.confidence_score,
            AnalysisOutcome::Failure(f) => f.confidence_score,
        }
    }
}

impl From<AnalysisResult> for AnalysisOutcome {
    fn from(result: AnalysisResult) -> Self {
        AnalysisOutcome::Success(Box::new(result))
    }
}

impl From<AnalysisFailure> for AnalysisOutcome {
    fn from(failure: AnalysisFailure) -> Self {
        AnalysisOutcome::Failure(failure)
    }
}
