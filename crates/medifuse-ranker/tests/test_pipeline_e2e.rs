//! End-to-end local analysis over the builtin knowledge base.
//!
//! ```bash
//! cargo test --package medifuse-ranker --test test_pipeline_e2e -- --nocapture
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use medifuse_common::confidence::ConfidenceBucket;
use medifuse_common::entities::{AnalysisRequest, Evidence, RecommendationType, ScorerSource};
use medifuse_common::patient::RawPatientData;
use medifuse_common::{AnalysisConfig, MissingValuePolicy, TextWeighting};
use medifuse_kb::KnowledgeBase;
use medifuse_ranker::pipeline::analyze_with_config;
use medifuse_ranker::Analyzer;
use medifuse_test_utils::pretty_assertions::assert_eq;
use medifuse_test_utils::{assert_close, cardiac_request, empty_request};
use serde_json::json;

fn analyzer() -> Analyzer {
    Analyzer::builtin().expect("builtin analyzer")
}

fn request(patient: serde_json::Value, notes: &str) -> AnalysisRequest {
    let patient: RawPatientData = serde_json::from_value(patient).expect("patient fixture");
    AnalysisRequest::new(patient, notes)
}

#[test]
fn test_cardiac_patient_ranks_cardiovascular_first() {
    let result = analyzer().analyze(&cardiac_request());

    // text: 2 of 7 cardiovascular symptoms, 1 of 6 respiratory
    let text: Vec<(&str, f64)> = result
        .text_scoring
        .diseases
        .iter()
        .map(|d| (d.disease_id.as_str(), d.score))
        .collect();
    assert_eq!(text.len(), 2);
    assert_eq!(text[0].0, "cardiovascular");
    assert_close(text[0].1, 2.0 / 7.0);
    assert_eq!(text[1].0, "respiratory");
    assert_close(text[1].1, 1.0 / 6.0);

    // structured: cardiovascular saturates, respiratory age + male, diabetes age
    let structured = &result.structured_scoring.predictions;
    assert_eq!(structured[0].disease_id, "cardiovascular");
    assert_close(structured[0].score, 1.0);
    assert_eq!(structured[1].disease_id, "respiratory");
    assert_close(structured[1].score, 0.3);
    assert_eq!(structured[2].disease_id, "diabetes");
    assert_close(structured[2].score, 0.2);

    let fused = &result.fused_results;
    let ids: Vec<&str> = fused.iter().map(|f| f.disease_id.as_str()).collect();
    assert_eq!(ids, vec!["cardiovascular", "respiratory", "diabetes"]);
    assert_close(fused[0].fused_score, (2.0 / 7.0 + 1.0) / 2.0);
    assert_close(fused[1].fused_score, (1.0 / 6.0 + 0.3) / 2.0);
    assert_close(fused[2].fused_score, 0.2);
    assert_eq!(fused[0].sources, vec![ScorerSource::Text, ScorerSource::Structured]);
    assert_eq!(fused[2].sources, vec![ScorerSource::Structured]);
    assert_eq!(fused[0].confidence, ConfidenceBucket::Medium);

    // keywords first, then contributing factors
    assert_eq!(fused[0].evidence[0], Evidence::Keyword("chest pain".to_string()));
    assert!(matches!(fused[0].evidence.last(), Some(Evidence::Factor(_))));

    assert_close(result.confidence_score, fused[0].fused_score * 0.9);
}

#[test]
fn test_cardiac_recommendations_and_knowledge() {
    let result = analyzer().analyze(&cardiac_request());

    let knowledge_ids: Vec<&str> = result.knowledge.iter().map(|k| k.disease_id.as_str()).collect();
    assert_eq!(knowledge_ids, vec!["cardiovascular", "respiratory", "diabetes"]);

    let recs = &result.recommendations;
    assert_eq!(recs.len(), 4);
    assert_eq!(recs[0].kind, RecommendationType::Diagnostic);
    assert_eq!(recs[0].content, "Recommend Cardiovascular Disease related examinations");
    assert_eq!(
        recs[0].details,
        vec!["Test blood pressure", "Test cholesterol", "Test LDL", "Test HDL", "Test blood glucose"]
    );
    assert_eq!(recs[3].kind, RecommendationType::Lifestyle);
}

#[test]
fn test_cardiac_insights() {
    let result = analyzer().analyze(&cardiac_request());
    let insights = result.insights.expect("insights enabled by default");

    let l3: Vec<&str> = insights.levels.iter().map(|l| l.l3.as_str()).collect();
    assert_eq!(l3, vec!["Angina", "Respiratory condition", "Diabetes (unspecified)"]);

    // cardiovascular + diabetes + respiratory question sets
    assert_eq!(insights.follow_up_questions.len(), 11);
    let unique: HashSet<&String> = insights.follow_up_questions.iter().collect();
    assert_eq!(unique.len(), insights.follow_up_questions.len());

    assert_eq!(insights.differentials.len(), 2);
    assert_eq!(insights.differentials[0].pair[0], "Stable angina");
    assert_eq!(insights.urgent_guidance[0], "Recommend immediate ECG examination");
    assert_eq!(insights.urgent_guidance.len(), 3);
}

#[test]
fn test_empty_input_is_success_with_empty_differential() {
    let result = analyzer().analyze(&empty_request());

    assert!(result.text_scoring.diseases.is_empty());
    assert_eq!(result.text_scoring.confidence, 0.0);
    // neutral stand-ins reach exactly 0.1, which is not enough
    assert!(result.structured_scoring.predictions.is_empty());
    assert!(result.fused_results.is_empty());
    assert!(result.knowledge.is_empty());
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.recommendations[0].kind, RecommendationType::Lifestyle);
    assert_eq!(result.confidence_score, 0.0);
}

#[test]
fn test_zero_policy_empty_input_flags_low_hdl() {
    let mut config = AnalysisConfig::default();
    config.scoring.missing_values = MissingValuePolicy::Zero;
    let analyzer = Analyzer::new(Arc::new(KnowledgeBase::builtin()), config).unwrap();
    let result = analyzer.analyze(&AnalysisRequest::default());

    assert_eq!(result.structured_scoring.features.age, 0);
    assert_eq!(result.structured_scoring.features.hdl, 0.0);
    assert!(result.text_scoring.diseases.is_empty());

    assert_eq!(result.fused_results.len(), 1);
    let cv = &result.fused_results[0];
    assert_eq!(cv.disease_id, "cardiovascular");
    assert_close(cv.fused_score, 0.15);
    assert_eq!(cv.sources, vec![ScorerSource::Structured]);
    assert_eq!(cv.confidence, ConfidenceBucket::Low);
    assert!(matches!(&cv.evidence[0], Evidence::Factor(f) if f.factor == "Low HDL"));
}

#[test]
fn test_diabetic_patient_from_loose_json() {
    let req = request(
        json!({ "age": "50", "bloodGlucose": "140", "bmi": 32.5, "gender": "Female" }),
        "Polyuria and polydipsia for weeks, some blurred vision",
    );
    let result = analyzer().analyze(&req);

    let top = result.top().unwrap();
    assert_eq!(top.disease_id, "diabetes");
    // text 3/6, structured 0.4 + 0.2 + 0.25
    assert_close(top.fused_score, (0.5 + 0.85) / 2.0);
    assert_eq!(top.confidence, ConfidenceBucket::Medium);
    assert_eq!(result.insights.unwrap().levels[0].l3, "Type 2 diabetes");
}

#[test]
fn test_risk_factor_weighting_is_configurable() {
    let notes = "persistent cough with sputum, long history of smoking";
    let req = request(json!({}), notes);

    let default_result = analyzer().analyze(&req);
    let resp = default_result
        .fused_results
        .iter()
        .find(|f| f.disease_id == "respiratory")
        .unwrap();
    assert_close(resp.fused_score, 2.0 / 6.0 + 0.5 / 4.0);

    let mut config = AnalysisConfig::default();
    config.scoring.text_weighting = TextWeighting::SymptomsOnly;
    let symptoms_only = Analyzer::new(Arc::new(KnowledgeBase::builtin()), config).unwrap();
    let resp = symptoms_only
        .analyze(&req)
        .fused_results
        .into_iter()
        .find(|f| f.disease_id == "respiratory")
        .unwrap();
    assert_close(resp.fused_score, 2.0 / 6.0);
}

#[test]
fn test_output_invariants_hold_for_assorted_inputs() {
    let analyzer = analyzer();
    let inputs = vec![
        cardiac_request(),
        empty_request(),
        request(json!({ "age": 80, "smokeStatus": "current", "gender": "male" }), "cough wheezing dyspnea"),
        request(
            json!({ "age": 67, "cholesterol": 260, "bloodGlucose": 150, "bmi": 35 }),
            "chest pain, fatigue, dizziness, headache, nausea, edema, cough, polyuria, weakness",
        ),
        request(json!({ "age": -4, "hdl": "n/a" }), "   "),
    ];

    for req in &inputs {
        let result = analyzer.analyze(req);
        let fused = &result.fused_results;

        assert!(fused.len() <= 5);
        assert!(fused.windows(2).all(|w| w[0].fused_score >= w[1].fused_score));
        let ids: HashSet<&str> = fused.iter().map(|f| f.disease_id.as_str()).collect();
        assert_eq!(ids.len(), fused.len());

        let all_scores = result
            .text_scoring
            .diseases
            .iter()
            .map(|d| d.score)
            .chain(result.structured_scoring.predictions.iter().map(|d| d.score))
            .chain(fused.iter().map(|f| f.fused_score));
        for s in all_scores {
            assert!((0.0..=1.0).contains(&s), "score {s} out of range");
        }
        for d in result.text_scoring.diseases.iter().chain(&result.structured_scoring.predictions) {
            assert!(d.score > 0.1);
        }

        assert!(result.confidence_score <= 0.95);
        assert!(result.recommendations.iter().any(|r| r.kind == RecommendationType::Lifestyle));
    }
}

#[test]
fn test_many_symptoms_truncated_to_five() {
    let req = request(
        json!({ "age": 70, "cholesterol": 250, "bloodGlucose": 150, "smokeStatus": "current" }),
        "chest pain, cough, polyuria, nausea, headache, edema, flank pain, vomiting, seizure",
    );
    let result = analyzer().analyze(&req);
    assert_eq!(result.fused_results.len(), 5);
    assert!(result.text_scoring.diseases.len() + result.structured_scoring.predictions.len() > 5);
}

#[test]
fn test_result_wire_shape() {
    let result = analyzer().analyze(&cardiac_request());
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["engine"], "local");
    assert_eq!(value["recommendations"][0]["type"], "diagnostic");
    assert_eq!(value["fused_results"][0]["sources"], json!(["text", "structured"]));
    assert_eq!(value["fused_results"][0]["evidence"][0], "chest pain");
    assert!(value["fused_results"][0]["evidence"][2]["factor"].is_string());
}

#[test]
fn test_custom_knowledge_base_from_yaml() {
    let mut profiles = KnowledgeBase::builtin().profiles().to_vec();
    profiles.truncate(3);
    profiles[2].symptoms.push("night sweats".to_string());
    let yaml = KnowledgeBase::new(profiles).unwrap().to_yaml_string().unwrap();

    let path = std::env::temp_dir().join(format!("medifuse-kb-{}.yaml", uuid::Uuid::new_v4()));
    std::fs::write(&path, yaml).unwrap();

    let config = AnalysisConfig {
        knowledge_base_path: Some(path.to_string_lossy().into_owned()),
        ..AnalysisConfig::default()
    };
    let outcome = analyze_with_config(config, &request(json!({}), "night sweats and cough"));
    let _ = std::fs::remove_file(&path);

    assert!(!outcome.is_failure());
    assert_eq!(outcome.fused_results()[0].disease_id, "respiratory");
    assert_close(outcome.fused_results()[0].fused_score, 2.0 / 7.0);
}

#[test]
fn test_knowledge_base_missing_rule_disease_is_failure() {
    let mut profiles = KnowledgeBase::builtin().profiles().to_vec();
    profiles.retain(|p| p.id != "diabetes");
    let yaml = KnowledgeBase::new(profiles).unwrap().to_yaml_string().unwrap();

    let path = std::env::temp_dir().join(format!("medifuse-kb-{}.yaml", uuid::Uuid::new_v4()));
    std::fs::write(&path, yaml).unwrap();

    let config = AnalysisConfig {
        knowledge_base_path: Some(path.to_string_lossy().into_owned()),
        ..AnalysisConfig::default()
    };
    let outcome = analyze_with_config(config, &cardiac_request());
    let _ = std::fs::remove_file(&path);

    assert!(outcome.is_failure());
    assert_eq!(outcome.confidence_score(), 0.0);
    let body = serde_json::to_value(&outcome).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Analysis failed:"));
}
