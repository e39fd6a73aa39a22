//! Configuration structures and types for fake-tokens
//!
//! This module provides type-safe configuration management with serde support.

use crate::tokens::{DEFAULT_MAX_ATTEMPTS, TokenFormat};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Current configuration schema version
pub const CONFIG_VERSION: &str = "1.0";

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokensConfig {
    /// Schema version (required)
    #[serde(default)]
    pub version: String,

    /// Defaults for the command line (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Generator tuning (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            defaults: None,
            generator: None,
        }
    }
}

/// Command line defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsConfig {
    /// Token type used when `--type` is not given
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenFormat>,

    /// Number of tokens used when `--count` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Total length for github_fine_grained tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_grained_length: Option<usize>,

    /// Output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,
}

/// Generator tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Collision retries per token before giving up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

/// How generated tokens are written to stdout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One token per line
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Fully resolved settings, every default applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token_type: TokenFormat,
    pub count: usize,
    pub fine_grained_length: usize,
    pub output: OutputFormat,
    pub max_attempts: u32,
}

impl TokensConfig {
    /// Apply built-in defaults to every field left unset
    pub fn settings(&self) -> Settings {
        let defaults = self.defaults.clone().unwrap_or_default();
        let generator = self.generator.clone().unwrap_or_default();

        Settings {
            token_type: defaults.token_type.unwrap_or(TokenFormat::GithubClassic),
            count: defaults.count.unwrap_or(1),
            fine_grained_length: defaults
                .fine_grained_length
                .unwrap_or(TokenFormat::DEFAULT_FINE_GRAINED_LENGTH),
            output: defaults.output.unwrap_or_default(),
            max_attempts: generator.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = TokensConfig::default().settings();

        assert_eq!(settings.token_type, TokenFormat::GithubClassic);
        assert_eq!(settings.count, 1);
        assert_eq!(settings.fine_grained_length, 93);
        assert_eq!(settings.output, OutputFormat::Text);
        assert_eq!(settings.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
version: "1.0"
defaults:
  type: aws_access_key
  count: 3
  fineGrainedLength: 40
  output: json
generator:
  maxAttempts: 10
"#;
        let config: TokensConfig = serde_yaml::from_str(yaml).unwrap();
        let settings = config.settings();

        assert_eq!(settings.token_type, TokenFormat::AwsAccessKey);
        assert_eq!(settings.count, 3);
        assert_eq!(settings.fine_grained_length, 40);
        assert_eq!(settings.output, OutputFormat::Json);
        assert_eq!(settings.max_attempts, 10);
    }

    #[test]
    fn test_parse_yaml_unknown_type_fails() {
        let yaml = "version: \"1.0\"\ndefaults:\n  type: bitbucket\n";
        assert!(serde_yaml::from_str::<TokensConfig>(yaml).is_err());
    }

    #[test]
    fn test_serialize_skips_unset_sections() {
        let yaml = serde_yaml::to_string(&TokensConfig::default()).unwrap();
        assert!(yaml.contains("version"));
        assert!(!yaml.contains("defaults"));
        assert!(!yaml.contains("generator"));
    }
}
