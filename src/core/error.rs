//! Error handling for token generation
//!
//! A single caller-facing failure kind (`InvalidArgument`) plus the two
//! ambient failures a complete tool can hit: an exhausted collision budget
//! and an unreadable configuration.

use thiserror::Error;

/// Main error type for token generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument { argument: String, message: String },

    #[error("[{format}] no unique token after {attempts} attempts")]
    UniquenessExhausted { format: String, attempts: u32 },

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl TokenError {
    /// Unrecognized format discriminator
    pub fn unknown_format(name: &str) -> Self {
        Self::InvalidArgument {
            argument: "token_type".to_string(),
            message: format!(
                "unknown token type '{}' (expected one of: github_classic, github_fine_grained, gitlab, npm, aws_access_key, aws_secret_key)",
                name
            ),
        }
    }

    /// `total_length` below the minimum a format accepts
    pub fn length_too_short(total_length: usize, minimum: usize) -> Self {
        Self::InvalidArgument {
            argument: "total_length".to_string(),
            message: format!(
                "token length must be at least {} (got {})",
                minimum, total_length
            ),
        }
    }

    /// `total_length` above the maximum a format accepts
    pub fn length_too_long(total_length: usize, maximum: usize) -> Self {
        Self::InvalidArgument {
            argument: "total_length".to_string(),
            message: format!(
                "token length must be at most {} (got {})",
                maximum, total_length
            ),
        }
    }

    /// Check if this error is recoverable by changing the input
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UniquenessExhausted { .. })
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidArgument { .. } => vec![
                "Run with --list-types to see supported token types",
                "Fine-grained GitHub tokens need a total length between 21 and 4096",
            ],
            Self::UniquenessExhausted { .. } => vec![
                "Clear the generator history before generating more tokens",
                "Raise generator.maxAttempts in the configuration file",
            ],
            Self::ConfigError(_) => vec![
                "Check .fake-tokens.yaml for syntax errors",
                "Check FAKE_TOKENS_* environment variables",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::UniquenessExhausted { .. } => "UNIQUENESS_EXHAUSTED",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, TokenError>;
