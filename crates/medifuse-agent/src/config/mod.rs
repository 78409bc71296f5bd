//! Configuration loading for medifuse.
//! Reads medifuse.toml from the current directory or path in MEDIFUSE_CONFIG env var.

use medifuse_common::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url()     -> String { "http://localhost:8000".to_string() }
fn default_timeout_secs() -> u64    { 10 }

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "bool_true")]
    pub fallback_to_local: bool,
    #[serde(default)]
    pub check_health: bool,
}

fn bool_true() -> bool { true }

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { fallback_to_local: true, check_health: false }
    }
}

mod tests;

impl Config {
    /// Load configuration from medifuse.toml.
    /// Checks MEDIFUSE_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MEDIFUSE_CONFIG")
            .unwrap_or_else(|_| "medifuse.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy medifuse.example.toml to medifuse.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
