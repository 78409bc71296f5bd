//! Structured risk rule table.
//!
//! Each disease has an ordered list of rules. A ladder rule contributes the
//! weight of the first band whose threshold is strictly crossed, so bands are
//! listed strictest first. Contributions are summed and clamped to 1.0.

use medifuse_common::entities::{ContributingFactor, FactorValue, ImpactLevel};
use medifuse_common::entities::ImpactLevel::{High, Low, Medium};
use medifuse_common::patient::{Gender, PatientFeatures, SmokingStatus};

/// Numeric patient feature a ladder reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Age,
    BloodGlucose,
    Cholesterol,
    Hdl,
    Ldl,
    Bmi,
}

impl Feature {
    pub fn read(&self, f: &PatientFeatures) -> f64 {
        match self {
            Feature::Age          => f.age as f64,
            Feature::BloodGlucose => f.blood_glucose,
            Feature::Cholesterol  => f.cholesterol,
            Feature::Hdl          => f.hdl,
            Feature::Ldl          => f.ldl,
            Feature::Bmi          => f.bmi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub threshold: f64,
    pub weight: f64,
    pub impact: ImpactLevel,
}

impl Band {
    fn crossed(&self, value: f64, direction: Direction) -> bool {
        match direction {
            Direction::Above => value > self.threshold,
            Direction::Below => value < self.threshold,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RiskRule {
    Ladder {
        label: &'static str,
        feature: Feature,
        direction: Direction,
        bands: &'static [Band],
    },
    GenderIs {
        label: &'static str,
        gender: Gender,
        weight: f64,
        impact: ImpactLevel,
    },
    Smoking {
        label: &'static str,
        bands: &'static [(SmokingStatus, f64, ImpactLevel)],
    },
}

impl RiskRule {
    /// Weight contributed by this rule and the factor that explains it,
    /// or `None` when the patient does not trigger the rule.
    pub fn evaluate(&self, f: &PatientFeatures) -> Option<(f64, ContributingFactor)> {
        match *self {
            RiskRule::Ladder { label, feature, direction, bands } => {
                let value = feature.read(f);
                bands
                    .iter()
                    .find(|b| b.crossed(value, direction))
                    .map(|b| (b.weight, factor(label, FactorValue::Number(value), b.impact)))
            }
            RiskRule::GenderIs { label, gender, weight, impact } => (f.gender == gender)
                .then(|| (weight, factor(label, FactorValue::Text(gender.as_str().to_string()), impact))),
            RiskRule::Smoking { label, bands } => bands
                .iter()
                .find(|(status, _, _)| *status == f.smoking)
                .map(|(status, weight, impact)| {
                    (*weight, factor(label, FactorValue::Text(status.as_str().to_string()), *impact))
                }),
        }
    }

    /// Largest weight this rule can ever contribute.
    pub fn max_weight(&self) -> f64 {
        match self {
            RiskRule::Ladder { bands, .. } => bands.iter().map(|b| b.weight).fold(0.0, f64::max),
            RiskRule::GenderIs { weight, .. } => *weight,
            RiskRule::Smoking { bands, .. } => bands.iter().map(|(_, w, _)| *w).fold(0.0, f64::max),
        }
    }
}

fn factor(label: &str, value: FactorValue, impact: ImpactLevel) -> ContributingFactor {
    ContributingFactor { factor: label.to_string(), value, impact }
}

#[derive(Debug, Clone, Copy)]
pub struct DiseaseRiskTable {
    pub disease_id: &'static str,
    pub rules: &'static [RiskRule],
}

const fn band(threshold: f64, weight: f64, impact: ImpactLevel) -> Band {
    Band { threshold, weight, impact }
}

pub static RISK_TABLES: &[DiseaseRiskTable] = &[
    DiseaseRiskTable {
        disease_id: "cardiovascular",
        rules: &[
            RiskRule::Ladder {
                label: "Age",
                feature: Feature::Age,
                direction: Direction::Above,
                bands: &[band(65.0, 0.30, High), band(50.0, 0.20, Medium), band(35.0, 0.10, Low)],
            },
            RiskRule::Ladder {
                label: "High Cholesterol",
                feature: Feature::Cholesterol,
                direction: Direction::Above,
                bands: &[band(240.0, 0.25, High), band(200.0, 0.15, Medium)],
            },
            RiskRule::Ladder {
                label: "High LDL",
                feature: Feature::Ldl,
                direction: Direction::Above,
                bands: &[band(160.0, 0.20, High), band(130.0, 0.10, Medium)],
            },
            RiskRule::Ladder {
                label: "Low HDL",
                feature: Feature::Hdl,
                direction: Direction::Below,
                bands: &[band(40.0, 0.15, Medium)],
            },
            RiskRule::GenderIs { label: "Male Gender", gender: Gender::Male, weight: 0.10, impact: Low },
        ],
    },
    DiseaseRiskTable {
        disease_id: "diabetes",
        rules: &[
            RiskRule::Ladder {
                label: "High Blood Glucose",
                feature: Feature::BloodGlucose,
                direction: Direction::Above,
                bands: &[band(126.0, 0.40, High), band(100.0, 0.20, Medium)],
            },
            RiskRule::Ladder {
                label: "Age",
                feature: Feature::Age,
                direction: Direction::Above,
                bands: &[band(45.0, 0.20, Medium)],
            },
            RiskRule::Ladder {
                label: "High BMI",
                feature: Feature::Bmi,
                direction: Direction::Above,
                bands: &[band(30.0, 0.25, High), band(25.0, 0.15, Medium)],
            },
        ],
    },
    DiseaseRiskTable {
        disease_id: "respiratory",
        rules: &[
            RiskRule::Ladder {
                label: "Age",
                feature: Feature::Age,
                direction: Direction::Above,
                bands: &[band(60.0, 0.20, Medium), band(40.0, 0.10, Low)],
            },
            RiskRule::GenderIs { label: "Male Gender", gender: Gender::Male, weight: 0.10, impact: Low },
            RiskRule::Smoking {
                label: "Smoking",
                bands: &[(SmokingStatus::Current, 0.30, High), (SmokingStatus::Former, 0.10, Low)],
            },
        ],
    },
];

pub fn table_for(disease_id: &str) -> Option<&'static DiseaseRiskTable> {
    RISK_TABLES.iter().find(|t| t.disease_id == disease_id)
}
