use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyzer::MAX_SCORE;
use crate::error::PipeLensError;
use crate::history::DEFAULT_FREQUENT_WARNINGS;

/// Configuration file structure for PipeLens.
///
/// Lets a project pin its output preferences and quality gate instead of
/// repeating them on every invocation. Files are looked up in the current
/// directory unless a path is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,

    /// Analysis parameters
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnalysisConfig {
    /// How many of the most common warnings to report across a run
    #[serde(default = "default_frequent_warnings_limit")]
    pub frequent_warnings_limit: usize,

    /// Fail the run when any pipeline scores below this value
    pub fail_under: Option<u8>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frequent_warnings_limit: default_frequent_warnings_limit(),
            fail_under: None,
        }
    }
}

fn default_frequent_warnings_limit() -> usize {
    DEFAULT_FREQUENT_WARNINGS
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./pipelens.toml
    /// 3. ./pipelens.json
    /// 4. ./pipelens.yaml
    /// 5. ./pipelens.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "pipelens.toml",
            "pipelens.json",
            "pipelens.yaml",
            "pipelens.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let config: Self = match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .ok()
                    .or_else(|| serde_json::from_str(&contents).ok())
                    .or_else(|| serde_yaml::from_str(&contents).ok())
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), PipeLensError> {
        match self.analysis.fail_under {
            Some(threshold) if threshold > MAX_SCORE => Err(PipeLensError::Config(format!(
                "fail-under must be between 0 and {MAX_SCORE}, got {threshold}"
            ))),
            _ => Ok(()),
        }
    }
}
