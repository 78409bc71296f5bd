#[cfg(test)]
mod tests {
    use super::super::*;
    use medifuse_common::{MissingValuePolicy, TextWeighting};

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.base_url, "http://localhost:8000");
        assert!(config.routing.fallback_to_local);
        assert_eq!(config.analysis.scoring.text_weighting, TextWeighting::SymptomsAndRiskFactors);
        assert_eq!(config.analysis.scoring.missing_values, MissingValuePolicy::Neutral);
        assert!(config.analysis.insights.enabled);
    }

    #[test]
    fn test_example_file_parses() {
        let example = include_str!("../../../../medifuse.example.toml");
        let config = Config::from_toml_str(example).unwrap();
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.analysis.insights.max_follow_up_questions, 12);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml_str(
            r#"
            [analysis.scoring]
            text_weighting = "symptoms_only"
            missing_values = "zero"

            [remote]
            enabled = true
            base_url = "http://analysis.internal:9000"

            [routing]
            fallback_to_local = false
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.scoring.text_weighting, TextWeighting::SymptomsOnly);
        assert_eq!(config.analysis.scoring.missing_values, MissingValuePolicy::Zero);
        assert!(config.remote.enabled);
        assert_eq!(config.remote.timeout_secs, 10);
        assert!(!config.routing.fallback_to_local);
        assert!(!config.routing.check_health);
    }

    #[test]
    fn test_unknown_weighting_rejected() {
        let err = Config::from_toml_str("[analysis.scoring]\ntext_weighting = \"loud\"\n");
        assert!(err.is_err());
    }
}
