//! Clinical insights layered over the fused ranking: taxonomy placement,
//! follow-up questions, look-alike differentials and urgent cardiac work-up.

use std::sync::Arc;

use medifuse_common::entities::{ClinicalInsights, Differential, FusedDisease, TaxonomyLevel};
use medifuse_common::InsightConfig;
use medifuse_kb::taxonomy::unknown_level;
use medifuse_kb::KnowledgeBase;

/// Number of ranked diseases that receive a taxonomy placement.
pub const TAXONOMY_DEPTH: usize = 3;

/// Phrases looked for in the notes when choosing questions and differentials.
pub const CUE_VOCABULARY: &[&str] = &[
    "chest pain",
    "chest tightness",
    "palpitations",
    "shortness of breath",
    "excessive thirst",
    "frequent urination",
    "increased hunger",
    "diplopia",
    "double vision",
    "ptosis",
    "weakness",
    "numbness",
    "tingling",
    "back pain",
    "leg pain",
    "sciatica",
    "cough",
    "wheezing",
];

struct FollowUpRule {
    disease_ids: &'static [&'static str],
    cues: &'static [&'static str],
    questions: &'static [&'static str],
}

const FOLLOW_UP_RULES: &[FollowUpRule] = &[
    FollowUpRule {
        disease_ids: &["cardiovascular"],
        cues: &["chest pain", "chest tightness", "palpitations"],
        questions: &[
            "Chest pain is exertional and relieved by rest?",
            "Any radiation to left arm, jaw, or back?",
            "Associated diaphoresis or nausea?",
            "Duration and frequency of episodes?",
        ],
    },
    FollowUpRule {
        disease_ids: &["diabetes"],
        cues: &["excessive thirst", "frequent urination", "increased hunger"],
        questions: &[
            "Recent HbA1c and fasting glucose values?",
            "Unintentional weight change?",
            "Polyuria/nocturia severity and onset?",
            "Any neuropathy or visual blurring?",
        ],
    },
    FollowUpRule {
        disease_ids: &[],
        cues: &["diplopia", "double vision", "ptosis"],
        questions: &[
            "Do symptoms fluctuate with fatigue (suggesting myasthenia)?",
            "Any pupillary involvement or headache (for 3rd nerve palsy)?",
            "Onset abrupt vs progressive?",
        ],
    },
    FollowUpRule {
        disease_ids: &["neurological"],
        cues: &["weakness", "numbness", "tingling"],
        questions: &[
            "Symmetry and distribution of weakness/numbness?",
            "Back pain or radicular features?",
            "Bowel/bladder involvement?",
        ],
    },
    FollowUpRule {
        disease_ids: &["respiratory"],
        cues: &["cough", "wheezing"],
        questions: &[
            "Duration of cough and any sputum production?",
            "Any fever or recent respiratory infection?",
            "Smoking or occupational exposure history?",
        ],
    },
];

struct DifferentialRule {
    cues: &'static [&'static str],
    pairs: &'static [([&'static str; 2], [&'static str; 2])],
}

const DIFFERENTIAL_RULES: &[DifferentialRule] = &[
    DifferentialRule {
        cues: &["chest pain", "chest tightness", "shortness of breath"],
        pairs: &[
            (
                ["Stable angina", "Gastroesophageal reflux"],
                [
                    "Exertional chest pain relieved by rest favors angina",
                    "Burning postprandial pain lying down favors reflux",
                ],
            ),
            (
                ["Acute coronary syndrome", "Musculoskeletal chest pain"],
                [
                    "Pressure-like pain with diaphoresis suggests ACS",
                    "Reproducible chest wall tenderness suggests musculoskeletal",
                ],
            ),
        ],
    },
    DifferentialRule {
        cues: &["back pain", "leg pain", "sciatica"],
        pairs: &[(
            ["Lumbar canal stenosis", "Sciatica"],
            [
                "Pain relieved by sitting suggests canal stenosis",
                "Sitting worsens discomfort suggests sciatica",
            ],
        )],
    },
    DifferentialRule {
        cues: &["diplopia", "ptosis", "double vision"],
        pairs: &[(
            ["Myasthenia gravis", "Cranial nerve palsy"],
            [
                "Fatigable ptosis/ophthalmoparesis favors MG",
                "Fixed pupil or severe headache suggests nerve palsy",
            ],
        )],
    },
];

/// Cues that call for same-visit cardiac work-up.
const ACUTE_CARDIAC_CUES: &[&str] = &["chest pain", "chest tightness", "palpitations"];

pub const ACUTE_CARDIAC_GUIDANCE: &[&str] = &[
    "Recommend immediate ECG examination",
    "Consider cardiac marker testing",
    "Evaluate need for emergency treatment",
];

/// Cue phrases present in already lower-cased notes, in vocabulary order.
pub fn detect_cues(notes_lower: &str) -> Vec<&'static str> {
    CUE_VOCABULARY
        .iter()
        .copied()
        .filter(|cue| notes_lower.contains(cue))
        .collect()
}

pub struct InsightEngine {
    kb: Arc<KnowledgeBase>,
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new(kb: Arc<KnowledgeBase>, config: InsightConfig) -> Self {
        Self { kb, config }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn generate(&self, notes: &str, fused: &[FusedDisease]) -> ClinicalInsights {
        let notes_lower = notes.to_lowercase();
        let cues = detect_cues(&notes_lower);

        ClinicalInsights {
            levels: self.levels(&notes_lower, fused),
            follow_up_questions: self.follow_up_questions(&cues, fused),
            differentials: self.differentials(&cues),
            urgent_guidance: urgent_guidance(&cues),
        }
    }

    fn levels(&self, notes_lower: &str, fused: &[FusedDisease]) -> Vec<TaxonomyLevel> {
        fused
            .iter()
            .take(TAXONOMY_DEPTH)
            .map(|f| {
                self.kb
                    .get(&f.disease_id)
                    .and_then(|p| p.taxonomy.as_ref())
                    .map(|t| t.level(&f.disease_name, notes_lower))
                    .unwrap_or_else(|| unknown_level(&f.disease_name))
            })
            .collect()
    }

    fn follow_up_questions(&self, cues: &[&str], fused: &[FusedDisease]) -> Vec<String> {
        let mut questions: Vec<String> = Vec::new();
        let triggered = FOLLOW_UP_RULES.iter().filter(|rule| {
            fused.iter().any(|f| rule.disease_ids.contains(&f.disease_id.as_str()))
                || rule.cues.iter().any(|c| cues.contains(c))
        });
        for rule in triggered {
            for q in rule.questions {
                if !questions.iter().any(|existing| existing == q) {
                    questions.push(q.to_string());
                }
            }
        }
        questions.truncate(self.config.max_follow_up_questions);
        questions
    }

    fn differentials(&self, cues: &[&str]) -> Vec<Differential> {
        DIFFERENTIAL_RULES
            .iter()
            .filter(|rule| rule.cues.iter().any(|c| cues.contains(c)))
            .flat_map(|rule| rule.pairs.iter())
            .take(self.config.max_differentials)
            .map(|(pair, points)| Differential {
                pair: [pair[0].to_string(), pair[1].to_string()],
                distinguishing_points: points.iter().map(|p| p.to_string()).collect(),
            })
            .collect()
    }
}

fn urgent_guidance(cues: &[&str]) -> Vec<String> {
    if ACUTE_CARDIAC_CUES.iter().any(|c| cues.contains(c)) {
        ACUTE_CARDIAC_GUIDANCE.iter().map(|g| g.to_string()).collect()
    } else {
        Vec::new()
    }
}
