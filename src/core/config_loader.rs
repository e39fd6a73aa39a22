//! Configuration file loader for fake-tokens
//!
//! This module provides configuration loading, validation, and merging capabilities.

use super::config::*;
use crate::core::error::{Result, TokenError};
use crate::tokens::TokenFormat;
use log::debug;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".fake-tokens.yaml";

/// Largest count accepted without a warning
const LARGE_COUNT_THRESHOLD: usize = 100_000;

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Directory searched for a project config file
    pub project_path: PathBuf,

    /// Explicit config file; replaces the project file and must exist
    pub config_file: Option<PathBuf>,

    /// CLI arguments (highest priority)
    pub cli_args: Option<TokensConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,

    /// Validation warnings
    pub warnings: Vec<ConfigValidationWarning>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "defaults.count")
    pub field: String,

    /// Error message
    pub message: String,

    /// Expected type/value
    pub expected: Option<String>,

    /// Actual type/value
    pub actual: Option<String>,
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    /// Field path
    pub field: String,

    /// Warning message
    pub message: String,

    /// Suggestion
    pub suggestion: Option<String>,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables (FAKE_TOKENS_*)
    /// 3. Explicit config file, or project config (./.fake-tokens.yaml)
    /// 4. Global config (~/.fake-tokens.yaml)
    /// 5. Default values
    pub fn load(options: ConfigLoadOptions) -> Result<TokensConfig> {
        let mut configs: Vec<TokensConfig> = Vec::new();

        // 5. Default values (lowest priority)
        configs.push(TokensConfig::default());

        // 4. Global config
        if let Some(global_config) = Self::load_global_config(&options.env)? {
            configs.push(global_config);
        }

        // 3. Explicit or project config
        let file_config = match &options.config_file {
            Some(path) => Some(Self::load_required_config(path)?),
            None => Self::load_project_config(&options.project_path)?,
        };
        if let Some(file_config) = file_config {
            configs.push(file_config);
        }

        // 2. Environment variables
        if let Some(env_config) = Self::load_env_config(&options.env)? {
            configs.push(env_config);
        }

        // 1. CLI arguments (highest priority)
        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        Ok(Self::merge_configs(configs))
    }

    /// Build the environment map from raw OS variables
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn env_from_os<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Load global configuration from $HOME/.fake-tokens.yaml
    fn load_global_config(env: &HashMap<String, String>) -> Result<Option<TokensConfig>> {
        match env.get("HOME") {
            Some(home) => Self::load_config_file(&PathBuf::from(home).join(CONFIG_FILENAME)),
            None => Ok(None),
        }
    }

    /// Load project configuration from ./.fake-tokens.yaml
    fn load_project_config(project_path: &Path) -> Result<Option<TokensConfig>> {
        Self::load_config_file(&project_path.join(CONFIG_FILENAME))
    }

    /// Load a config file the user named explicitly
    fn load_required_config(file_path: &Path) -> Result<TokensConfig> {
        Self::load_config_file(file_path)?.ok_or_else(|| {
            TokenError::ConfigError(format!(
                "Config file not found: {}",
                file_path.display()
            ))
        })
    }

    /// Load configuration from YAML file
    fn load_config_file(file_path: &Path) -> Result<Option<TokensConfig>> {
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path)
            .map_err(|e| TokenError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: TokensConfig = serde_yaml::from_str(&content).map_err(|e| {
            TokenError::ConfigError(format!(
                "Failed to parse YAML config {}: {}",
                file_path.display(),
                e
            ))
        })?;

        debug!("loaded config from {}", file_path.display());
        Ok(Some(config))
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Result<Option<TokensConfig>> {
        let mut defaults = DefaultsConfig::default();
        let mut has_changes = false;

        // FAKE_TOKENS_TYPE -> defaults.type
        if let Some(token_type) = env.get("FAKE_TOKENS_TYPE") {
            let format: TokenFormat = token_type.parse().map_err(|e| {
                TokenError::ConfigError(format!("FAKE_TOKENS_TYPE: {}", e))
            })?;
            defaults.token_type = Some(format);
            has_changes = true;
        }

        // FAKE_TOKENS_COUNT -> defaults.count
        if let Some(count) = env.get("FAKE_TOKENS_COUNT") {
            defaults.count = Some(Self::parse_number("FAKE_TOKENS_COUNT", count)?);
            has_changes = true;
        }

        // FAKE_TOKENS_LENGTH -> defaults.fineGrainedLength
        if let Some(length) = env.get("FAKE_TOKENS_LENGTH") {
            defaults.fine_grained_length = Some(Self::parse_number("FAKE_TOKENS_LENGTH", length)?);
            has_changes = true;
        }

        // FAKE_TOKENS_OUTPUT -> defaults.output
        if let Some(output) = env.get("FAKE_TOKENS_OUTPUT") {
            let mode = match output.trim().to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                other => {
                    return Err(TokenError::ConfigError(format!(
                        "FAKE_TOKENS_OUTPUT: expected 'text' or 'json', got '{}'",
                        other
                    )));
                }
            };
            defaults.output = Some(mode);
            has_changes = true;
        }

        if !has_changes {
            return Ok(None);
        }

        Ok(Some(TokensConfig {
            version: String::new(),
            defaults: Some(defaults),
            generator: None,
        }))
    }

    fn parse_number(name: &str, value: &str) -> Result<usize> {
        value.trim().parse().map_err(|_| {
            TokenError::ConfigError(format!(
                "{}: expected a non-negative integer, got '{}'",
                name, value
            ))
        })
    }

    /// Merge multiple configurations with priority
    fn merge_configs(configs: Vec<TokensConfig>) -> TokensConfig {
        let mut result = TokensConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target, field by field
    fn merge_into(target: &mut TokensConfig, source: TokensConfig) {
        if !source.version.is_empty() {
            target.version = source.version;
        }

        if let Some(source_defaults) = source.defaults {
            let target_defaults = target.defaults.get_or_insert_with(DefaultsConfig::default);

            if source_defaults.token_type.is_some() {
                target_defaults.token_type = source_defaults.token_type;
            }
            if source_defaults.count.is_some() {
                target_defaults.count = source_defaults.count;
            }
            if source_defaults.fine_grained_length.is_some() {
                target_defaults.fine_grained_length = source_defaults.fine_grained_length;
            }
            if source_defaults.output.is_some() {
                target_defaults.output = source_defaults.output;
            }
        }

        if let Some(source_generator) = source.generator {
            let target_generator = target
                .generator
                .get_or_insert_with(GeneratorConfig::default);

            if source_generator.max_attempts.is_some() {
                target_generator.max_attempts = source_generator.max_attempts;
            }
        }
    }

    /// Validate configuration
    pub fn validate(config: &TokensConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Check version (required)
        if config.version.is_empty() {
            errors.push(ConfigValidationError {
                field: "version".to_string(),
                message: "Version is required".to_string(),
                expected: Some(format!("string (e.g., \"{}\")", CONFIG_VERSION)),
                actual: Some("empty".to_string()),
            });
        } else if config.version != CONFIG_VERSION {
            warnings.push(ConfigValidationWarning {
                field: "version".to_string(),
                message: format!("Unknown version: {}", config.version),
                suggestion: Some(format!(
                    "Currently supported version is \"{}\" only",
                    CONFIG_VERSION
                )),
            });
        }

        // 2. Validate defaults
        if let Some(defaults) = &config.defaults {
            let token_type = defaults.token_type.unwrap_or(TokenFormat::GithubClassic);
            Self::validate_defaults(defaults, token_type, &mut errors, &mut warnings);
        }

        // 3. Validate generator settings
        if let Some(generator) = &config.generator {
            Self::validate_generator(generator, &mut errors);
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn validate_defaults(
        defaults: &DefaultsConfig,
        token_type: TokenFormat,
        errors: &mut Vec<ConfigValidationError>,
        warnings: &mut Vec<ConfigValidationWarning>,
    ) {
        match defaults.count {
            Some(0) => warnings.push(ConfigValidationWarning {
                field: "defaults.count".to_string(),
                message: "count is 0, nothing will be generated".to_string(),
                suggestion: Some("Set count to 1 or more".to_string()),
            }),
            Some(count) if count > LARGE_COUNT_THRESHOLD => {
                warnings.push(ConfigValidationWarning {
                    field: "defaults.count".to_string(),
                    message: format!("Large count: {}", count),
                    suggestion: Some("Generate in smaller batches".to_string()),
                })
            }
            _ => {}
        }

        // fineGrainedLength only shapes github_fine_grained tokens
        if let Some(length) = defaults.fine_grained_length {
            let minimum = TokenFormat::GithubFineGrained.min_total_length();
            let maximum = TokenFormat::MAX_TOTAL_LENGTH;
            if token_type != TokenFormat::GithubFineGrained {
                warnings.push(ConfigValidationWarning {
                    field: "defaults.fineGrainedLength".to_string(),
                    message: format!("fineGrainedLength is ignored for {} tokens", token_type),
                    suggestion: Some("Remove it or set type to github_fine_grained".to_string()),
                });
            } else if length < minimum || length > maximum {
                errors.push(ConfigValidationError {
                    field: "defaults.fineGrainedLength".to_string(),
                    message: format!(
                        "fineGrainedLength must be between {} and {}",
                        minimum, maximum
                    ),
                    expected: Some(format!("{}..={}", minimum, maximum)),
                    actual: Some(length.to_string()),
                });
            }
        }
    }

    fn validate_generator(generator: &GeneratorConfig, errors: &mut Vec<ConfigValidationError>) {
        if generator.max_attempts == Some(0) {
            errors.push(ConfigValidationError {
                field: "generator.maxAttempts".to_string(),
                message: "maxAttempts must be at least 1".to_string(),
                expected: Some("positive integer".to_string()),
                actual: Some("0".to_string()),
            });
        }
    }

    /// Format validation result as human-readable string
    pub fn format_validation_result(result: &ConfigValidationResult) -> String {
        let mut lines = Vec::new();

        if result.valid {
            lines.push("✅ Configuration validation succeeded".to_string());
        } else {
            lines.push("❌ Configuration has errors".to_string());
        }

        if !result.errors.is_empty() {
            lines.push("\n🔴 Errors:".to_string());
            for error in &result.errors {
                lines.push(format!("  - [{}] {}", error.field, error.message));
                if let (Some(expected), Some(actual)) = (&error.expected, &error.actual) {
                    lines.push(format!("    Expected: {}", expected));
                    lines.push(format!("    Actual: {}", actual));
                }
            }
        }

        if !result.warnings.is_empty() {
            lines.push("\n🟡 Warnings:".to_string());
            for warning in &result.warnings {
                lines.push(format!("  - [{}] {}", warning.field, warning.message));
                if let Some(suggestion) = &warning.suggestion {
                    lines.push(format!("    Suggestion: {}", suggestion));
                }
            }
        }

        lines.join("\n")
    }
}
