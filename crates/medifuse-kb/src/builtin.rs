//! Builtin disease profiles.
//! Order matters: it is the disease-check order used by both scorers.

use crate::knowledge_base::DiseaseProfile;
use crate::taxonomy::{L3Rule, Taxonomy};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rule(keywords: &[&str], label: &str) -> L3Rule {
    L3Rule { if_symptoms_any: strings(keywords), label: label.to_string() }
}

pub fn profiles() -> Vec<DiseaseProfile> {
    vec![
        cardiovascular(),
        diabetes(),
        respiratory(),
        digestive(),
        neurological(),
        renal(),
    ]
}

fn cardiovascular() -> DiseaseProfile {
    DiseaseProfile {
        id: "cardiovascular".to_string(),
        name: "Cardiovascular Disease".to_string(),
        symptoms: strings(&[
            "chest pain", "chest tightness", "palpitations", "shortness of breath",
            "difficulty breathing", "dizziness", "fatigue",
        ]),
        risk_factors: strings(&[
            "hypertension", "diabetes", "hyperlipidemia", "smoking", "obesity", "family history",
        ]),
        lab_indicators: strings(&["blood pressure", "cholesterol", "LDL", "HDL", "blood glucose"]),
        treatments: strings(&[
            "antihypertensive drugs", "lipid-lowering drugs", "anticoagulants", "lifestyle interventions",
        ]),
        guidelines: strings(&[
            "Monitor blood pressure and heart rate regularly",
            "Control blood lipid levels",
            "Quit smoking and limit alcohol",
            "Moderate exercise",
            "Low-salt, low-fat diet",
        ]),
        taxonomy: Some(Taxonomy {
            l1: "Cardiovascular".to_string(),
            l2: "Coronary/Cardiac".to_string(),
            l3_rules: vec![
                rule(&["chest pain", "chest tightness", "angina"], "Angina"),
                rule(&["shortness of breath", "palpitations"], "Arrhythmia"),
            ],
            default_l3: "Cardiac condition".to_string(),
        }),
    }
}

fn diabetes() -> DiseaseProfile {
    DiseaseProfile {
        id: "diabetes".to_string(),
        name: "Diabetes".to_string(),
        symptoms: strings(&[
            "polydipsia", "polyuria", "polyphagia", "weight loss", "blurred vision", "fatigue",
        ]),
        risk_factors: strings(&["obesity", "family history", "hypertension", "lack of exercise"]),
        lab_indicators: strings(&["blood glucose", "HbA1c", "insulin", "C-peptide"]),
        treatments: strings(&["insulin", "metformin", "dietary control", "exercise therapy"]),
        guidelines: strings(&[
            "Monitor blood glucose regularly",
            "Control HbA1c < 7%",
            "Healthy diet",
            "Regular exercise",
            "Foot care",
        ]),
        taxonomy: Some(Taxonomy {
            l1: "Endocrine".to_string(),
            l2: "Diabetes".to_string(),
            l3_rules: vec![rule(
                &["excessive thirst", "frequent urination", "increased hunger", "polydipsia", "polyuria"],
                "Type 2 diabetes",
            )],
            default_l3: "Diabetes (unspecified)".to_string(),
        }),
    }
}

fn respiratory() -> DiseaseProfile {
    DiseaseProfile {
        id: "respiratory".to_string(),
        name: "Respiratory Disease".to_string(),
        symptoms: strings(&[
            "cough", "sputum", "wheezing", "dyspnea", "difficulty breathing", "chest pain",
        ]),
        risk_factors: strings(&[
            "smoking", "environmental pollution", "occupational exposure", "allergy history",
        ]),
        lab_indicators: strings(&["blood oxygen", "pulmonary function", "inflammatory markers"]),
        treatments: strings(&[
            "bronchodilators", "anti-inflammatory drugs", "oxygen therapy", "smoking cessation",
        ]),
        guidelines: strings(&[
            "Quit smoking",
            "Avoid environmental pollution",
            "Regular pulmonary function tests",
            "Prevent infections",
            "Appropriate exercise",
        ]),
        taxonomy: Some(Taxonomy {
            l1: "Pulmonology".to_string(),
            l2: "Airway/Parenchymal".to_string(),
            l3_rules: vec![
                rule(&["wheezing", "asthma"], "Obstructive airway disease"),
                rule(&["sputum", "fever", "pneumonia"], "Lower respiratory infection"),
            ],
            default_l3: "Respiratory condition".to_string(),
        }),
    }
}

fn digestive() -> DiseaseProfile {
    DiseaseProfile {
        id: "digestive".to_string(),
        name: "Digestive Disease".to_string(),
        symptoms: strings(&[
            "abdominal pain", "diarrhea", "constipation", "nausea", "vomiting",
            "stomach pain", "heartburn", "bloating",
        ]),
        risk_factors: strings(&[
            "alcohol use", "nsaid use", "helicobacter pylori", "family history",
        ]),
        lab_indicators: strings(&[
            "liver function", "stool occult blood", "H. pylori breath test", "abdominal ultrasound",
        ]),
        treatments: strings(&[
            "proton pump inhibitors", "antiemetics", "dietary modification", "H. pylori eradication therapy",
        ]),
        guidelines: strings(&[
            "Eat small regular meals",
            "Limit alcohol and NSAID use",
            "Maintain hydration",
            "Seek endoscopy for alarm symptoms",
        ]),
        taxonomy: Some(Taxonomy {
            l1: "Gastroenterology".to_string(),
            l2: "Upper/Lower GI".to_string(),
            l3_rules: vec![
                rule(&["heartburn", "stomach pain", "gastric ulcer", "gastritis"], "Acid-peptic disorder"),
                rule(&["diarrhea", "constipation", "bloating"], "Functional bowel disorder"),
            ],
            default_l3: "Digestive disorder".to_string(),
        }),
    }
}

fn neurological() -> DiseaseProfile {
    DiseaseProfile {
        id: "neurological".to_string(),
        name: "Neurological Disorder".to_string(),
        symptoms: strings(&[
            "headache", "dizziness", "vertigo", "altered consciousness", "seizure",
            "hemiplegia", "aphasia", "numbness", "weakness",
        ]),
        risk_factors: strings(&[
            "hypertension", "atrial fibrillation", "head injury", "smoking",
        ]),
        lab_indicators: strings(&[
            "head CT", "brain MRI", "electroencephalogram", "nerve conduction study",
        ]),
        treatments: strings(&[
            "antiplatelet therapy", "antiepileptic drugs", "rehabilitation therapy", "analgesics",
        ]),
        guidelines: strings(&[
            "Urgent assessment for sudden focal deficits",
            "Control blood pressure",
            "Keep a symptom diary",
            "Avoid driving after seizures",
        ]),
        taxonomy: Some(Taxonomy {
            l1: "Neurology".to_string(),
            l2: "Neuromuscular/CNS".to_string(),
            l3_rules: vec![
                rule(&["weakness", "numbness", "tingling"], "Peripheral neuropathy"),
                rule(&["seizure", "epilepsy"], "Epilepsy"),
            ],
            default_l3: "Neurological disorder".to_string(),
        }),
    }
}

fn renal() -> DiseaseProfile {
    DiseaseProfile {
        id: "renal".to_string(),
        name: "Renal Disease".to_string(),
        symptoms: strings(&[
            "edema", "proteinuria", "hematuria", "flank pain", "decreased urine output",
            "foamy urine", "kidney stones",
        ]),
        risk_factors: strings(&["diabetes", "hypertension", "nephrotoxic drugs", "family history"]),
        lab_indicators: strings(&["serum creatinine", "eGFR", "urinalysis", "urine albumin"]),
        treatments: strings(&[
            "ACE inhibitors", "diuretics", "dietary protein restriction", "dialysis",
        ]),
        guidelines: strings(&[
            "Monitor kidney function regularly",
            "Control blood pressure and blood glucose",
            "Avoid nephrotoxic drugs",
            "Limit salt intake",
        ]),
        taxonomy: Some(Taxonomy {
            l1: "Nephrology".to_string(),
            l2: "Kidney disease".to_string(),
            l3_rules: vec![
                rule(&["flank pain", "kidney stones"], "Nephrolithiasis"),
                rule(&["proteinuria", "foamy urine", "edema"], "Glomerular disease"),
            ],
            default_l3: "Kidney disorder".to_string(),
        }),
    }
}
