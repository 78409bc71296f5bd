//! Clinical-text scorer.
//!
//! score(d) = Σ 1/|symptoms(d)| over symptoms present in the notes
//!          + Σ 0.5/|risk_factors(d)| over risk factors present
//!            (only with `TextWeighting::SymptomsAndRiskFactors`)
//!
//! Matching is case-insensitive substring presence, one Aho-Corasick
//! automaton per profile so every keyword is tested in a single pass.

use aho_corasick::{AhoCorasick, MatchKind};
use medifuse_common::confidence::{clamp_score, passes_inclusion, ConfidenceBucket};
use medifuse_common::entities::{Evidence, ScoredDisease, TextFeatures, TextScoring};
use medifuse_common::{MedifuseError, Result, TextWeighting};
use medifuse_kb::KnowledgeBase;
use regex::Regex;
use tracing::debug;

/// Relative weight of the whole risk-factor list against the symptom list.
pub const RISK_FACTOR_WEIGHT: f64 = 0.5;

struct ProfileMatcher {
    disease_id: String,
    disease_name: String,
    /// Patterns: symptoms first, then risk factors.
    automaton: AhoCorasick,
    keywords: Vec<String>,
    symptom_count: usize,
}

impl ProfileMatcher {
    fn risk_factor_count(&self) -> usize {
        self.keywords.len() - self.symptom_count
    }
}

struct FeaturePatterns {
    symptoms: Regex,
    history: Regex,
    medication: Regex,
}

pub struct TextScorer {
    matchers: Vec<ProfileMatcher>,
    weighting: TextWeighting,
    features: FeaturePatterns,
}

impl TextScorer {
    pub fn new(kb: &KnowledgeBase, weighting: TextWeighting) -> Result<Self> {
        let mut matchers = Vec::with_capacity(kb.len());
        for profile in kb.profiles() {
            let keywords: Vec<String> = profile
                .symptoms
                .iter()
                .chain(&profile.risk_factors)
                .cloned()
                .collect();
            let patterns: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

            // Standard semantics so overlapping keywords ("chest pain" inside
            // "chest pain radiating") are all reported.
            let automaton = AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&patterns)
                .map_err(|e| MedifuseError::KnowledgeBase(format!(
                    "cannot build keyword matcher for '{}': {e}",
                    profile.id
                )))?;

            matchers.push(ProfileMatcher {
                disease_id: profile.id.clone(),
                disease_name: profile.name.clone(),
                automaton,
                keywords,
                symptom_count: profile.symptoms.len(),
            });
        }

        Ok(Self {
            matchers,
            weighting,
            features: FeaturePatterns::compile()?,
        })
    }

    pub fn weighting(&self) -> TextWeighting {
        self.weighting
    }

    /// Score free-text notes against every profile.
    /// Blank notes yield an empty, zero-confidence result.
    pub fn score(&self, text: &str) -> TextScoring {
        if text.trim().is_empty() {
            return TextScoring::empty();
        }

        let lower = text.to_lowercase();
        let mut diseases: Vec<ScoredDisease> = self
            .matchers
            .iter()
            .filter_map(|m| self.score_profile(m, &lower))
            .collect();

        diseases.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let confidence = diseases.first().map(|d| d.score).unwrap_or(0.0);
        debug!(detected = diseases.len(), confidence, "Text scoring complete");

        TextScoring {
            diseases,
            confidence,
            text_features: Some(self.features.extract(text)),
        }
    }

    fn score_profile(&self, m: &ProfileMatcher, lower: &str) -> Option<ScoredDisease> {
        let mut matched = vec![false; m.keywords.len()];
        for hit in m.automaton.find_overlapping_iter(lower) {
            matched[hit.pattern().as_usize()] = true;
        }

        let use_risk_factors = self.weighting == TextWeighting::SymptomsAndRiskFactors;
        let per_symptom = 1.0 / m.symptom_count as f64;
        let per_risk = if m.risk_factor_count() > 0 {
            RISK_FACTOR_WEIGHT / m.risk_factor_count() as f64
        } else {
            0.0
        };

        let mut raw = 0.0;
        let mut evidence = Vec::new();
        for (i, keyword) in m.keywords.iter().enumerate() {
            if !matched[i] {
                continue;
            }
            if i < m.symptom_count {
                raw += per_symptom;
            } else if use_risk_factors {
                raw += per_risk;
            } else {
                continue;
            }
            evidence.push(Evidence::Keyword(keyword.clone()));
        }

        let score = clamp_score(raw);
        if !passes_inclusion(score) {
            return None;
        }

        Some(ScoredDisease {
            disease_id: m.disease_id.clone(),
            disease_name: m.disease_name.clone(),
            score,
            confidence: ConfidenceBucket::from_score(score),
            evidence,
        })
    }
}

impl FeaturePatterns {
    fn compile() -> Result<Self> {
        let re = |pattern: &str| {
            Regex::new(pattern).map_err(|e| MedifuseError::Config(format!("bad text feature pattern: {e}")))
        };
        Ok(Self {
            symptoms: re(r"(?i)symptoms|manifestation|discomfort")?,
            history: re(r"(?i)history|previous|past")?,
            medication: re(r"(?i)medication|treatment|drug")?,
        })
    }

    fn extract(&self, text: &str) -> TextFeatures {
        TextFeatures {
            length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            has_symptoms: self.symptoms.is_match(text),
            has_history: self.history.is_match(text),
            has_medication: self.medication.is_match(text),
        }
    }
}
