//! medifuse-kb — Disease knowledge base, taxonomy, and knowledge retrieval.

pub mod knowledge_base;
pub mod builtin;
pub mod taxonomy;
pub mod retriever;

pub use knowledge_base::{DiseaseProfile, KnowledgeBase};
pub use retriever::KnowledgeRetriever;
pub use taxonomy::{L3Rule, Taxonomy};
