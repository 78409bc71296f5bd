//! Knowledge retrieval for ranked diseases.
//! Pure lookup; unknown ids are skipped, never an error.

use std::sync::Arc;

use medifuse_common::entities::{FusedDisease, KnowledgeSummary};
use tracing::debug;

use crate::knowledge_base::KnowledgeBase;

/// How many top-ranked diseases get reference knowledge attached.
pub const DEFAULT_KNOWLEDGE_DEPTH: usize = 3;

pub struct KnowledgeRetriever {
    kb: Arc<KnowledgeBase>,
}

impl KnowledgeRetriever {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Summaries for `ids`, in input order, skipping ids not in the base.
    pub fn retrieve<S: AsRef<str>>(&self, ids: &[S]) -> Vec<KnowledgeSummary> {
        ids.iter()
            .filter_map(|id| {
                let id = id.as_ref();
                let found = self.kb.get(id);
                if found.is_none() {
                    debug!(disease_id = id, "No knowledge on record, skipping");
                }
                found
            })
            .map(|p| p.summary(None))
            .collect()
    }

    /// Summaries for the top `depth` fused diseases, each tagged with its
    /// fused score as relevance.
    pub fn retrieve_ranked(&self, fused: &[FusedDisease], depth: usize) -> Vec<KnowledgeSummary> {
        fused
            .iter()
            .take(depth)
            .filter_map(|f| self.kb.get(&f.disease_id).map(|p| p.summary(Some(f.fused_score))))
            .collect()
    }
}
