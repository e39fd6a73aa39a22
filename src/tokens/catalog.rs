//! Format catalog
//!
//! Fixed table of the vendor token grammars this crate can imitate. Each
//! format is a prefix, a body length policy and an alphabet for the body.

use crate::core::error::{Result, TokenError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Set of characters eligible for body positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    name: &'static str,
    chars: &'static [u8],
    regex_class: &'static str,
}

impl Alphabet {
    /// Letters (upper and lower) and digits
    pub const ALPHANUMERIC: Alphabet = Alphabet {
        name: "alphanumeric",
        chars: b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
        regex_class: "A-Za-z0-9",
    };

    /// Letters, digits, underscore and hyphen
    pub const NPM: Alphabet = Alphabet {
        name: "alphanumeric, '_' and '-'",
        chars: b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-",
        regex_class: r"A-Za-z0-9_\-",
    };

    /// Uppercase letters and digits
    pub const UPPERCASE_ALPHANUMERIC: Alphabet = Alphabet {
        name: "uppercase alphanumeric",
        chars: b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
        regex_class: "A-Z0-9",
    };

    /// Letters, digits, '+' and '/' (base64 without padding)
    pub const BASE64: Alphabet = Alphabet {
        name: "base64",
        chars: b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+/",
        regex_class: r"A-Za-z0-9+/",
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.chars.contains(&(c as u8))
    }

    /// Character class body usable inside `[...]` in a regex
    pub fn regex_class(&self) -> &'static str {
        self.regex_class
    }
}

/// How the body length of a format is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPolicy {
    /// Body is always exactly this long
    Fixed(usize),
    /// Body is `total_length - prefix.len()`, where the caller may pick
    /// `total_length` as long as the body keeps at least `min_body` characters
    Total { default_total: usize, min_body: usize },
}

/// Supported token formats
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TokenFormat {
    GithubClassic,
    GithubFineGrained,
    Gitlab,
    Npm,
    AwsAccessKey,
    AwsSecretKey,
}

impl TokenFormat {
    pub const ALL: [TokenFormat; 6] = [
        TokenFormat::GithubClassic,
        TokenFormat::GithubFineGrained,
        TokenFormat::Gitlab,
        TokenFormat::Npm,
        TokenFormat::AwsAccessKey,
        TokenFormat::AwsSecretKey,
    ];

    /// Default total length of a fine-grained GitHub token
    pub const DEFAULT_FINE_GRAINED_LENGTH: usize = 93;

    /// Largest total length accepted for variable-length formats
    pub const MAX_TOTAL_LENGTH: usize = 4096;

    /// Format discriminator as used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenFormat::GithubClassic => "github_classic",
            TokenFormat::GithubFineGrained => "github_fine_grained",
            TokenFormat::Gitlab => "gitlab",
            TokenFormat::Npm => "npm",
            TokenFormat::AwsAccessKey => "aws_access_key",
            TokenFormat::AwsSecretKey => "aws_secret_key",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            TokenFormat::GithubClassic => "ghp_",
            TokenFormat::GithubFineGrained => "github_pat_",
            TokenFormat::Gitlab => "glpat-",
            TokenFormat::Npm => "npm_",
            TokenFormat::AwsAccessKey => "AKIA",
            TokenFormat::AwsSecretKey => "",
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        match self {
            TokenFormat::GithubClassic | TokenFormat::GithubFineGrained | TokenFormat::Gitlab => {
                Alphabet::ALPHANUMERIC
            }
            TokenFormat::Npm => Alphabet::NPM,
            TokenFormat::AwsAccessKey => Alphabet::UPPERCASE_ALPHANUMERIC,
            TokenFormat::AwsSecretKey => Alphabet::BASE64,
        }
    }

    pub fn length_policy(&self) -> LengthPolicy {
        match self {
            TokenFormat::GithubClassic => LengthPolicy::Fixed(36),
            TokenFormat::GithubFineGrained => LengthPolicy::Total {
                default_total: Self::DEFAULT_FINE_GRAINED_LENGTH,
                min_body: 10,
            },
            TokenFormat::Gitlab => LengthPolicy::Fixed(20),
            TokenFormat::Npm => LengthPolicy::Fixed(36),
            TokenFormat::AwsAccessKey => LengthPolicy::Fixed(16),
            TokenFormat::AwsSecretKey => LengthPolicy::Fixed(40),
        }
    }

    /// Human-readable description for `--list-types`
    pub fn description(&self) -> &'static str {
        match self {
            TokenFormat::GithubClassic => "GitHub classic personal access token",
            TokenFormat::GithubFineGrained => "GitHub fine-grained personal access token",
            TokenFormat::Gitlab => "GitLab personal access token",
            TokenFormat::Npm => "npm access token",
            TokenFormat::AwsAccessKey => "AWS access key ID",
            TokenFormat::AwsSecretKey => "AWS secret access key",
        }
    }

    /// Smallest total length this format accepts
    pub fn min_total_length(&self) -> usize {
        match self.length_policy() {
            LengthPolicy::Fixed(body) => self.prefix().len() + body,
            LengthPolicy::Total { min_body, .. } => self.prefix().len() + min_body,
        }
    }

    /// Resolve the exact shape of a token of this format
    ///
    /// `total_length` only applies to formats with a [`LengthPolicy::Total`]
    /// policy and is ignored by fixed-length formats.
    ///
    /// # Examples
    ///
    /// ```
    /// use fake_tokens::tokens::TokenFormat;
    ///
    /// let shape = TokenFormat::GithubFineGrained.shape(None).unwrap();
    /// assert_eq!(shape.body_length, 82);
    /// assert!(TokenFormat::GithubFineGrained.shape(Some(20)).is_err());
    /// assert!(TokenFormat::GithubFineGrained.shape(Some(usize::MAX)).is_err());
    /// ```
    pub fn shape(&self, total_length: Option<usize>) -> Result<TokenShape> {
        let prefix = self.prefix();
        let body_length = match self.length_policy() {
            LengthPolicy::Fixed(body) => body,
            LengthPolicy::Total {
                default_total,
                min_body,
            } => {
                let total = total_length.unwrap_or(default_total);
                let minimum = prefix.len() + min_body;
                if total < minimum {
                    return Err(TokenError::length_too_short(total, minimum));
                }
                if total > Self::MAX_TOTAL_LENGTH {
                    return Err(TokenError::length_too_long(total, Self::MAX_TOTAL_LENGTH));
                }
                total - prefix.len()
            }
        };

        Ok(TokenShape {
            format: *self,
            prefix,
            body_length,
            alphabet: self.alphabet(),
        })
    }
}

impl fmt::Display for TokenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenFormat {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        TokenFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| TokenError::unknown_format(s))
    }
}

/// A format resolved to a concrete prefix, body length and alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenShape {
    pub format: TokenFormat,
    pub prefix: &'static str,
    pub body_length: usize,
    pub alphabet: Alphabet,
}

impl TokenShape {
    pub fn total_length(&self) -> usize {
        self.prefix.len() + self.body_length
    }

    /// Whether `token` has exactly this prefix, length and body alphabet
    pub fn conforms(&self, token: &str) -> bool {
        token.len() == self.total_length()
            && token
                .strip_prefix(self.prefix)
                .is_some_and(|body| body.chars().all(|c| self.alphabet.contains(c)))
    }
}
