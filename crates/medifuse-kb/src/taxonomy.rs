//! Three-level disease taxonomy (organ system / subgroup / specific label).

use medifuse_common::entities::TaxonomyLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L3Rule {
    pub if_symptoms_any: Vec<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub l1: String,
    pub l2: String,
    #[serde(default)]
    pub l3_rules: Vec<L3Rule>,
    pub default_l3: String,
}

impl Taxonomy {
    /// First rule with any keyword present in `notes_lower` wins.
    /// `notes_lower` must already be lower-cased.
    pub fn l3_label(&self, notes_lower: &str) -> &str {
        self.l3_rules
            .iter()
            .find(|rule| {
                rule.if_symptoms_any
                    .iter()
                    .any(|k| notes_lower.contains(&k.to_lowercase()))
            })
            .map(|rule| rule.label.as_str())
            .unwrap_or(&self.default_l3)
    }

    pub fn level(&self, disease_name: &str, notes_lower: &str) -> TaxonomyLevel {
        TaxonomyLevel {
            disease: disease_name.to_string(),
            l1: self.l1.clone(),
            l2: self.l2.clone(),
            l3: self.l3_label(notes_lower).to_string(),
        }
    }
}

/// Placement for a disease with no taxonomy on record.
pub fn unknown_level(disease_name: &str) -> TaxonomyLevel {
    TaxonomyLevel {
        disease: disease_name.to_string(),
        l1: "Unknown".to_string(),
        l2: "Unknown".to_string(),
        l3: disease_name.to_string(),
    }
}
