//! Late fusion of the two scorer outputs.
//!
//! Text entries are inserted first. A structured entry for the same disease
//! is merged as the arithmetic mean of the two scores; otherwise it is
//! added as-is. The result is sorted by fused score (stable, so ties keep
//! insertion order) and truncated to [`MAX_FUSED_RESULTS`].

use std::collections::HashMap;

use medifuse_common::confidence::ConfidenceBucket;
use medifuse_common::entities::{Evidence, FusedDisease, ScoredDisease, ScorerSource};
use tracing::debug;

pub const MAX_FUSED_RESULTS: usize = 5;

struct Entry {
    disease_id: String,
    disease_name: String,
    text_score: Option<f64>,
    structured_score: Option<f64>,
    sources: Vec<ScorerSource>,
    evidence: Vec<Evidence>,
}

impl Entry {
    fn new(d: &ScoredDisease) -> Self {
        Self {
            disease_id: d.disease_id.clone(),
            disease_name: d.disease_name.clone(),
            text_score: None,
            structured_score: None,
            sources: Vec::new(),
            evidence: Vec::new(),
        }
    }

    fn absorb(&mut self, d: &ScoredDisease, source: ScorerSource) {
        let slot = match source {
            ScorerSource::Text => &mut self.text_score,
            ScorerSource::Structured => &mut self.structured_score,
        };
        // A scorer reports a disease at most once; keep the first if not.
        if slot.is_some() {
            debug!(disease_id = %d.disease_id, ?source, "Duplicate scorer entry ignored");
            return;
        }
        *slot = Some(d.score);
        self.sources.push(source);
        self.evidence.extend(d.evidence.iter().cloned());
    }

    fn fused_score(&self) -> f64 {
        match (self.text_score, self.structured_score) {
            (Some(t), Some(s)) => (t + s) / 2.0,
            (Some(t), None) => t,
            (None, Some(s)) => s,
            (None, None) => 0.0,
        }
    }

    fn into_fused(self) -> FusedDisease {
        let fused_score = self.fused_score();
        FusedDisease {
            disease_id: self.disease_id,
            disease_name: self.disease_name,
            fused_score,
            confidence: ConfidenceBucket::from_score(fused_score),
            sources: self.sources,
            evidence: self.evidence,
        }
    }
}

/// Merge text and structured results into the ranked differential.
pub fn fuse(text: &[ScoredDisease], structured: &[ScoredDisease]) -> Vec<FusedDisease> {
    let mut entries: Vec<Entry> = Vec::with_capacity(text.len() + structured.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    let inputs = text
        .iter()
        .map(|d| (d, ScorerSource::Text))
        .chain(structured.iter().map(|d| (d, ScorerSource::Structured)));

    for (d, source) in inputs {
        let i = *index.entry(d.disease_id.clone()).or_insert_with(|| {
            entries.push(Entry::new(d));
            entries.len() - 1
        });
        entries[i].absorb(d, source);
    }

    let mut fused: Vec<FusedDisease> = entries.into_iter().map(Entry::into_fused).collect();
    fused.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused.truncate(MAX_FUSED_RESULTS);
    fused
}
