//! End-to-end local analysis.
//!
//! ```text
//! notes ──► TextScorer ───────┐
//!                             ├─► fuse ─► retrieve ─► recommend / insights
//! patient ─► StructuredScorer ┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use medifuse_common::confidence::overall_confidence;
use medifuse_common::entities::{AnalysisFailure, AnalysisOutcome, AnalysisRequest, AnalysisResult};
use medifuse_common::patient::PatientFeatures;
use medifuse_common::{AnalysisConfig, Result};
use medifuse_kb::retriever::DEFAULT_KNOWLEDGE_DEPTH;
use medifuse_kb::{KnowledgeBase, KnowledgeRetriever};
use tracing::{info, info_span};
use uuid::Uuid;

use crate::fusion::fuse;
use crate::insights::InsightEngine;
use crate::recommend;
use crate::structured_scorer::StructuredScorer;
use crate::text_scorer::TextScorer;

/// Engine name stamped on locally produced results.
pub const LOCAL_ENGINE: &str = "local";

/// Owns the scorers for one knowledge base. Immutable after construction
/// and safe to share across threads.
pub struct Analyzer {
    config: AnalysisConfig,
    text: TextScorer,
    structured: StructuredScorer,
    retriever: KnowledgeRetriever,
    insights: InsightEngine,
}

impl Analyzer {
    pub fn new(kb: Arc<KnowledgeBase>, config: AnalysisConfig) -> Result<Self> {
        let text = TextScorer::new(&kb, config.scoring.text_weighting)?;
        let structured = StructuredScorer::new(Arc::clone(&kb))?;
        let retriever = KnowledgeRetriever::new(Arc::clone(&kb));
        let insights = InsightEngine::new(kb, config.insights.clone());
        Ok(Self { config, text, structured, retriever, insights })
    }

    /// Analyzer over the builtin knowledge base with default settings.
    pub fn builtin() -> Result<Self> {
        Self::new(Arc::new(KnowledgeBase::builtin()), AnalysisConfig::default())
    }

    /// Build from config: the knowledge base comes from
    /// `knowledge_base_path` when set, otherwise the builtin one.
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        let kb = match config.knowledge_base_path.as_deref() {
            Some(path) => KnowledgeBase::load(path)?,
            None => KnowledgeBase::builtin(),
        };
        Self::new(Arc::new(kb), config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let analysis_id = Uuid::new_v4();
        let _span = info_span!("analyze", %analysis_id).entered();

        let notes = request.notes();
        let features = PatientFeatures::from_raw(&request.patient_data, self.config.scoring.missing_values);

        let (text_scoring, structured_scoring) = rayon::join(
            || self.text.score(notes),
            || self.structured.score(&features),
        );

        let fused_results = fuse(&text_scoring.diseases, &structured_scoring.predictions);
        let knowledge = self.retriever.retrieve_ranked(&fused_results, DEFAULT_KNOWLEDGE_DEPTH);
        let recommendations = recommend::generate(&fused_results, &knowledge);
        let insights = self
            .insights
            .enabled()
            .then(|| self.insights.generate(notes, &fused_results));
        let confidence_score = overall_confidence(fused_results.first().map(|f| f.fused_score));

        info!(
            text_hits = text_scoring.diseases.len(),
            structured_hits = structured_scoring.predictions.len(),
            fused = fused_results.len(),
            top = fused_results.first().map(|f| f.disease_id.as_str()).unwrap_or("none"),
            confidence_score,
            "Analysis complete"
        );

        AnalysisResult {
            analysis_id,
            generated_at: Utc::now(),
            engine: LOCAL_ENGINE.to_string(),
            text_scoring,
            structured_scoring,
            fused_results,
            knowledge,
            recommendations,
            insights,
            confidence_score,
        }
    }
}

/// Build an analyzer from `config` and run `request`, turning any
/// construction error (unreadable or malformed knowledge base) into an
/// explicit failure rather than a partial result.
pub fn analyze_with_config(config: AnalysisConfig, request: &AnalysisRequest) -> AnalysisOutcome {
    match Analyzer::from_config(config) {
        Ok(analyzer) => analyzer.analyze(request).into(),
        Err(e) => AnalysisFailure::new(e).into(),
    }
}
