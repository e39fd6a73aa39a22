//! Placeholder credential generator
//!
//! Builds strings shaped like GitHub, GitLab, npm and AWS credentials for
//! tests, documentation and fixtures. None of them authenticate anywhere.

pub mod core;
pub mod security;
pub mod tokens;
pub mod validation;

pub use crate::core::*;
pub use security::mask_token;
pub use tokens::{GenerateOptions, TokenFormat, TokenGenerator};
pub use validation::FormatValidator;
