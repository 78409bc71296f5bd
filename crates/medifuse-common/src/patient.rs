//! Patient input normalisation.
//!
//! Raw patient records arrive from forms and remote callers with loose typing
//! (numbers as strings, mixed-case categories, absent fields). They are
//! normalised once per request into [`PatientFeatures`]; nothing here is
//! ever fatal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis_config::MissingValuePolicy;

/// Patient fields exactly as supplied by the caller. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPatientData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, alias = "bloodGlucose", skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdl: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ldl: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<Value>,
    #[serde(default, alias = "smokeStatus", skip_serializing_if = "Option::is_none")]
    pub smoke_status: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male    => "male",
            Gender::Female  => "female",
            Gender::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Current,
    Former,
    Never,
    Unknown,
}

impl SmokingStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "current" | "smoker" | "current smoker" | "yes" => SmokingStatus::Current,
            "former" | "ex-smoker" | "former smoker" | "quit" => SmokingStatus::Former,
            "never" | "non-smoker" | "nonsmoker" | "no" => SmokingStatus::Never,
            _ => SmokingStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingStatus::Current => "current",
            SmokingStatus::Former  => "former",
            SmokingStatus::Never   => "never",
            SmokingStatus::Unknown => "unknown",
        }
    }
}

// Clinically neutral stand-ins for absent measurements.
pub const NEUTRAL_AGE: i32 = 45;
pub const NEUTRAL_BLOOD_GLUCOSE: f64 = 100.0;
pub const NEUTRAL_CHOLESTEROL: f64 = 200.0;
pub const NEUTRAL_HDL: f64 = 50.0;
pub const NEUTRAL_LDL: f64 = 120.0;
pub const NEUTRAL_BMI: f64 = 25.0;

/// Normalised numeric/categorical record consumed by the structured scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    pub age: i32,
    pub gender: Gender,
    pub blood_glucose: f64,
    pub cholesterol: f64,
    pub hdl: f64,
    pub ldl: f64,
    pub bmi: f64,
    pub smoking: SmokingStatus,
}

impl PatientFeatures {
    /// Normalise a raw record. Missing, unparsable, and non-positive
    /// measurements are replaced according to `policy`.
    pub fn from_raw(raw: &RawPatientData, policy: MissingValuePolicy) -> Self {
        let defaults = Self::defaults(policy);

        let age = raw
            .age
            .as_ref()
            .and_then(parse_measurement)
            .map(|a| a.trunc() as i32)
            .filter(|a| *a > 0)
            .unwrap_or(defaults.age);

        let gender = match raw.gender.as_ref() {
            Some(Value::String(s)) => Gender::parse(s),
            _ => Gender::Unknown,
        };

        let smoking = match raw.smoke_status.as_ref() {
            Some(Value::String(s)) => SmokingStatus::parse(s),
            Some(Value::Bool(true)) => SmokingStatus::Current,
            Some(Value::Bool(false)) => SmokingStatus::Never,
            _ => SmokingStatus::Unknown,
        };

        let measure = |field: &Option<Value>, fallback: f64| {
            field.as_ref().and_then(parse_measurement).unwrap_or(fallback)
        };

        Self {
            age,
            gender,
            blood_glucose: measure(&raw.blood_glucose, defaults.blood_glucose),
            cholesterol: measure(&raw.cholesterol, defaults.cholesterol),
            hdl: measure(&raw.hdl, defaults.hdl),
            ldl: measure(&raw.ldl, defaults.ldl),
            bmi: measure(&raw.bmi, defaults.bmi),
            smoking,
        }
    }

    /// The record an empty input normalises to under `policy`.
    pub fn defaults(policy: MissingValuePolicy) -> Self {
        match policy {
            MissingValuePolicy::Neutral => Self {
                age: NEUTRAL_AGE,
                gender: Gender::Unknown,
                blood_glucose: NEUTRAL_BLOOD_GLUCOSE,
                cholesterol: NEUTRAL_CHOLESTEROL,
                hdl: NEUTRAL_HDL,
                ldl: NEUTRAL_LDL,
                bmi: NEUTRAL_BMI,
                smoking: SmokingStatus::Unknown,
            },
            MissingValuePolicy::Zero => Self {
                age: 0,
                gender: Gender::Unknown,
                blood_glucose: 0.0,
                cholesterol: 0.0,
                hdl: 0.0,
                ldl: 0.0,
                bmi: 0.0,
                smoking: SmokingStatus::Unknown,
            },
        }
    }
}

/// Accept JSON numbers and numeric strings; reject anything non-finite or
/// non-positive (no physiological measurement here is zero or negative).
fn parse_measurement(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (n.is_finite() && n > 0.0).then_some(n)
}
