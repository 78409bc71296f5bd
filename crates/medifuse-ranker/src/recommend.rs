//! Recommendation generation from the top-ranked disease.

use medifuse_common::entities::{FusedDisease, KnowledgeSummary, Priority, Recommendation, RecommendationType};

pub const LIFESTYLE_ADVICE: [&str; 4] = [
    "Healthy diet",
    "Regular exercise",
    "Quit smoking and limit alcohol",
    "Regular check-ups",
];

/// Diagnostic, treatment and management items for the top fused disease
/// (when knowledge about it was retrieved), then generic lifestyle advice.
/// Output order is fixed; it is not re-sorted by priority.
pub fn generate(fused: &[FusedDisease], knowledge: &[KnowledgeSummary]) -> Vec<Recommendation> {
    let mut out = Vec::with_capacity(4);

    let top_knowledge = fused
        .first()
        .and_then(|top| knowledge.iter().find(|k| k.disease_id == top.disease_id));

    if let Some(k) = top_knowledge {
        out.push(Recommendation {
            kind: RecommendationType::Diagnostic,
            priority: Priority::High,
            content: format!("Recommend {} related examinations", k.disease_name),
            details: k.lab_indicators.iter().map(|lab| format!("Test {lab}")).collect(),
        });
        out.push(Recommendation {
            kind: RecommendationType::Treatment,
            priority: Priority::Medium,
            content: format!("Consider {} treatment options", k.disease_name),
            details: k.treatments.clone(),
        });
        out.push(Recommendation {
            kind: RecommendationType::Management,
            priority: Priority::Medium,
            content: format!("{} management guidelines", k.disease_name),
            details: k.guidelines.clone(),
        });
    }

    out.push(Recommendation {
        kind: RecommendationType::Lifestyle,
        priority: Priority::Low,
        content: "Recommend lifestyle improvements".to_string(),
        details: LIFESTYLE_ADVICE.iter().map(|s| s.to_string()).collect(),
    });

    out
}
