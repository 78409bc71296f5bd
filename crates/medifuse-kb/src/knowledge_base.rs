//! Static disease knowledge base.
//!
//! Profiles are held as an explicit ordered list: the order is the
//! disease-check order for both scorers, which in turn decides tie-breaking
//! in the fused ranking. The base is validated once at construction and
//! never mutated afterwards; share it through `Arc`.

use std::collections::HashMap;
use std::path::Path;

use medifuse_common::entities::KnowledgeSummary;
use medifuse_common::{MedifuseError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseProfile {
    pub id: String,
    pub name: String,
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub lab_indicators: Vec<String>,
    #[serde(default)]
    pub treatments: Vec<String>,
    #[serde(default)]
    pub guidelines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<Taxonomy>,
}

impl DiseaseProfile {
    /// Reference summary for retrieval, optionally tagged with the fused
    /// score that made it relevant.
    pub fn summary(&self, relevance_score: Option<f64>) -> KnowledgeSummary {
        KnowledgeSummary {
            disease_id: self.id.clone(),
            disease_name: self.name.clone(),
            symptoms: self.symptoms.clone(),
            risk_factors: self.risk_factors.clone(),
            lab_indicators: self.lab_indicators.clone(),
            treatments: self.treatments.clone(),
            guidelines: self.guidelines.clone(),
            relevance_score,
        }
    }
}

/// On-disk layout of a knowledge base file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KnowledgeBaseFile {
    diseases: Vec<DiseaseProfile>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    profiles: Vec<DiseaseProfile>,
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Build a knowledge base, rejecting malformed profile sets.
    pub fn new(profiles: Vec<DiseaseProfile>) -> Result<Self> {
        validate(&profiles)?;
        Ok(Self::indexed(profiles))
    }

    /// The six builtin disease categories.
    pub fn builtin() -> Self {
        Self::indexed(crate::builtin::profiles())
    }

    fn indexed(profiles: Vec<DiseaseProfile>) -> Self {
        let index = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { profiles, index }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: KnowledgeBaseFile = serde_yaml::from_str(content)?;
        Self::new(file.diseases)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: KnowledgeBaseFile = serde_json::from_str(content)?;
        Self::new(file.diseases)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let kb = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            other => {
                return Err(MedifuseError::Config(format!(
                    "Unsupported knowledge base format {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };
        info!(path = %path.display(), diseases = kb.len(), "Knowledge base loaded");
        Ok(kb)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        let file = KnowledgeBaseFile { diseases: self.profiles.clone() };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn get(&self, id: &str) -> Option<&DiseaseProfile> {
        self.index.get(id).map(|&i| &self.profiles[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Profiles in disease-check order.
    pub fn profiles(&self) -> &[DiseaseProfile] {
        &self.profiles
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate(profiles: &[DiseaseProfile]) -> Result<()> {
    if profiles.is_empty() {
        return Err(MedifuseError::KnowledgeBase("no disease profiles".to_string()));
    }
    let mut seen = HashMap::new();
    for (i, p) in profiles.iter().enumerate() {
        if p.id.trim().is_empty() {
            return Err(MedifuseError::KnowledgeBase(format!("profile #{i} has an empty id")));
        }
        if p.name.trim().is_empty() {
            return Err(MedifuseError::KnowledgeBase(format!("profile '{}' has an empty name", p.id)));
        }
        if p.symptoms.is_empty() {
            return Err(MedifuseError::KnowledgeBase(format!("profile '{}' lists no symptoms", p.id)));
        }
        if p.symptoms.iter().chain(&p.risk_factors).any(|k| k.trim().is_empty()) {
            return Err(MedifuseError::KnowledgeBase(format!("profile '{}' contains an empty keyword", p.id)));
        }
        if let Some(prev) = seen.insert(p.id.as_str(), i) {
            return Err(MedifuseError::KnowledgeBase(format!(
                "duplicate disease id '{}' (profiles #{prev} and #{i})",
                p.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(id: &str) -> DiseaseProfile {
        DiseaseProfile {
            id: id.to_string(),
            name: format!("{id} disease"),
            symptoms: vec!["cough".to_string()],
            risk_factors: vec![],
            lab_indicators: vec![],
            treatments: vec![],
            guidelines: vec![],
            taxonomy: None,
        }
    }

    #[test]
    fn test_builtin_is_valid_and_ordered() {
        let kb = KnowledgeBase::builtin();
        assert!(validate(kb.profiles()).is_ok());
        let ids: Vec<&str> = kb.ids().collect();
        assert_eq!(
            ids,
            vec!["cardiovascular", "diabetes", "respiratory", "digestive", "neurological", "renal"]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = KnowledgeBase::new(vec![profile("a"), profile("a")]).unwrap_err();
        assert!(err.to_string().contains("duplicate disease id 'a'"));
    }

    #[test]
    fn test_empty_symptoms_rejected() {
        let mut p = profile("a");
        p.symptoms.clear();
        assert!(KnowledgeBase::new(vec![p]).is_err());
    }

    #[test]
    fn test_empty_kb_rejected() {
        assert!(KnowledgeBase::new(vec![]).is_err());
    }

    #[test]
    fn test_lookup_by_id() {
        let kb = KnowledgeBase::new(vec![profile("a"), profile("b")]).unwrap();
        assert_eq!(kb.get("b").map(|p| p.name.as_str()), Some("b disease"));
        assert!(kb.get("zzz").is_none());
        assert!(kb.contains("a"));
    }

    #[test]
    fn test_yaml_with_missing_optional_lists() {
        let yaml = r#"
diseases:
  - id: gout
    name: Gout
    symptoms: [joint pain, swelling]
    taxonomy:
      l1: Rheumatology
      l2: Crystal arthropathy
      default_l3: Gout
"#;
        let kb = KnowledgeBase::from_yaml_str(yaml).unwrap();
        let gout = kb.get("gout").unwrap();
        assert!(gout.treatments.is_empty());
        assert_eq!(gout.taxonomy.as_ref().unwrap().l1, "Rheumatology");
    }

    #[test]
    fn test_builtin_survives_yaml_export() {
        let kb = KnowledgeBase::builtin();
        let yaml = kb.to_yaml_string().unwrap();
        let reloaded = KnowledgeBase::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded.profiles(), kb.profiles());
    }
}
