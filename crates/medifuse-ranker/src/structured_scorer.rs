//! Structured patient-data scorer.
//! Evaluates the fixed risk rule table for every profile that has one,
//! in knowledge-base order.

use std::sync::Arc;

use medifuse_common::confidence::{clamp_score, passes_inclusion, ConfidenceBucket};
use medifuse_common::entities::{Evidence, ScoredDisease, StructuredScoring};
use medifuse_common::patient::PatientFeatures;
use medifuse_common::{MedifuseError, Result};
use medifuse_kb::KnowledgeBase;
use tracing::debug;

use crate::risk_rules::{table_for, DiseaseRiskTable, RISK_TABLES};

pub struct StructuredScorer {
    kb: Arc<KnowledgeBase>,
}

impl StructuredScorer {
    /// Fails when a rule table names a disease the knowledge base lacks.
    pub fn new(kb: Arc<KnowledgeBase>) -> Result<Self> {
        if let Some(missing) = RISK_TABLES.iter().find(|t| !kb.contains(t.disease_id)) {
            return Err(MedifuseError::KnowledgeBase(format!(
                "risk rules reference unknown disease '{}'",
                missing.disease_id
            )));
        }
        Ok(Self { kb })
    }

    pub fn score(&self, features: &PatientFeatures) -> StructuredScoring {
        let mut predictions: Vec<ScoredDisease> = self
            .kb
            .profiles()
            .iter()
            .filter_map(|p| table_for(&p.id).map(|t| (p, t)))
            .filter_map(|(p, table)| {
                let (score, evidence) = evaluate_table(table, features);
                passes_inclusion(score).then(|| ScoredDisease {
                    disease_id: p.id.clone(),
                    disease_name: p.name.clone(),
                    score,
                    confidence: ConfidenceBucket::from_score(score),
                    evidence,
                })
            })
            .collect();

        predictions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let risk_score = predictions.first().map(|d| d.score).unwrap_or(0.0);
        debug!(predicted = predictions.len(), risk_score, "Structured scoring complete");

        StructuredScoring {
            predictions,
            risk_score,
            features: features.clone(),
        }
    }
}

fn evaluate_table(table: &DiseaseRiskTable, features: &PatientFeatures) -> (f64, Vec<Evidence>) {
    let mut raw = 0.0;
    let mut evidence = Vec::new();
    for rule in table.rules {
        if let Some((weight, factor)) = rule.evaluate(features) {
            raw += weight;
            evidence.push(Evidence::Factor(factor));
        }
    }
    (clamp_score(raw), evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medifuse_common::entities::{FactorValue, ImpactLevel};
    use medifuse_common::patient::{Gender, SmokingStatus};
    use medifuse_common::MissingValuePolicy;
    use medifuse_kb::DiseaseProfile;

    fn scorer() -> StructuredScorer {
        StructuredScorer::new(Arc::new(KnowledgeBase::builtin())).unwrap()
    }

    fn zero() -> PatientFeatures {
        PatientFeatures::defaults(MissingValuePolicy::Zero)
    }

    fn find<'a>(out: &'a StructuredScoring, id: &str) -> Option<&'a ScoredDisease> {
        out.predictions.iter().find(|d| d.disease_id == id)
    }

    #[test]
    fn test_high_risk_cardiac_patient_clamped() {
        let mut p = zero();
        p.age = 70;
        p.cholesterol = 250.0;
        p.ldl = 170.0;
        p.hdl = 35.0;
        p.gender = Gender::Male;

        let out = scorer().score(&p);
        let cv = find(&out, "cardiovascular").unwrap();
        assert!((cv.score - 1.0).abs() < 1e-9);
        assert_eq!(cv.confidence, ConfidenceBucket::High);
        assert_eq!(cv.evidence.len(), 5);
        assert_eq!(out.predictions[0].disease_id, "cardiovascular");
        assert!((out.risk_score - cv.score).abs() < 1e-9);
    }

    #[test]
    fn test_diabetes_bands() {
        let mut p = zero();
        p.blood_glucose = 130.0;
        p.bmi = 27.0;
        let out = scorer().score(&p);
        let dm = find(&out, "diabetes").unwrap();
        assert!((dm.score - 0.55).abs() < 1e-9);
        match &dm.evidence[0] {
            Evidence::Factor(f) => {
                assert_eq!(f.factor, "High Blood Glucose");
                assert_eq!(f.value, FactorValue::Number(130.0));
                assert_eq!(f.impact, ImpactLevel::High);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }

    #[test]
    fn test_current_smoker_respiratory() {
        let mut p = zero();
        p.smoking = SmokingStatus::Current;
        p.age = 61;
        let out = scorer().score(&p);
        let resp = find(&out, "respiratory").unwrap();
        assert!((resp.score - 0.5).abs() < 1e-9);
        assert_eq!(resp.confidence, ConfidenceBucket::Medium);
    }

    #[test]
    fn test_zero_record_flags_only_low_hdl() {
        // Literal zeros: HDL 0 sits under the 40 cut-off.
        let out = scorer().score(&zero());
        assert_eq!(out.predictions.len(), 1);
        let cv = &out.predictions[0];
        assert_eq!(cv.disease_id, "cardiovascular");
        assert!((cv.score - 0.15).abs() < 1e-9);
        assert_eq!(cv.confidence, ConfidenceBucket::Low);
        assert_eq!(cv.evidence.len(), 1);
        match &cv.evidence[0] {
            Evidence::Factor(f) => {
                assert_eq!(f.factor, "Low HDL");
                assert_eq!(f.value, FactorValue::Number(0.0));
                assert_eq!(f.impact, ImpactLevel::Medium);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
        assert!((out.risk_score - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_defaults_stay_at_or_below_threshold() {
        // Neutral stand-ins land exactly on 0.1 for two diseases, which is excluded.
        let out = scorer().score(&PatientFeatures::defaults(MissingValuePolicy::Neutral));
        assert!(out.predictions.is_empty());
    }

    #[test]
    fn test_kb_without_rule_disease_is_rejected() {
        let kb = KnowledgeBase::new(vec![DiseaseProfile {
            id: "renal".to_string(),
            name: "Renal Disease".to_string(),
            symptoms: vec!["edema".to_string()],
            risk_factors: vec![],
            lab_indicators: vec![],
            treatments: vec![],
            guidelines: vec![],
            taxonomy: None,
        }])
        .unwrap();
        let err = StructuredScorer::new(Arc::new(kb)).err().unwrap();
        assert!(err.to_string().contains("cardiovascular"));
    }
}
