//! Token generator
//!
//! Draws token bodies from a cryptographically secure random source and keeps
//! a history of everything it handed out, so one generator never returns the
//! same token twice while uniqueness is enforced.

use super::catalog::{TokenFormat, TokenShape};
use super::history::TokenHistory;
use crate::core::error::{Result, TokenError};
use crate::security::mask_token;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{CryptoRng, Rng, SeedableRng};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Collision retries allowed per token before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Most batch slots reserved upfront; larger batches grow as they go
const MAX_BATCH_PREALLOCATION: usize = 1024;

/// Options for a single generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Total token length, only honoured by `github_fine_grained`
    pub total_length: Option<usize>,
    /// Reject tokens already in the history and record accepted ones
    pub ensure_unique: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            total_length: None,
            ensure_unique: true,
        }
    }
}

impl GenerateOptions {
    pub fn with_total_length(mut self, total_length: usize) -> Self {
        self.total_length = Some(total_length);
        self
    }

    /// Skip the history entirely: no collision check, nothing recorded
    pub fn allow_duplicates(mut self) -> Self {
        self.ensure_unique = false;
        self
    }
}

struct GeneratorState<R> {
    rng: R,
    history: TokenHistory,
}

impl<R: CryptoRng> GeneratorState<R> {
    fn sample(&mut self, shape: &TokenShape) -> String {
        let alphabet = shape.alphabet.as_bytes();
        let mut token = String::with_capacity(shape.total_length());
        token.push_str(shape.prefix);
        token.extend((0..shape.body_length).map(|_| {
            let idx = self.rng.random_range(0..alphabet.len());
            alphabet[idx] as char
        }));
        token
    }

    fn next_token(
        &mut self,
        shape: &TokenShape,
        ensure_unique: bool,
        max_attempts: u32,
    ) -> Result<String> {
        if !ensure_unique {
            return Ok(self.sample(shape));
        }

        for attempt in 1..=max_attempts {
            let token = self.sample(shape);
            if !self.history.contains(&token) {
                self.history.insert(token.clone());
                return Ok(token);
            }
            warn!(
                "[{}] collision on attempt {}/{}, resampling",
                shape.format, attempt, max_attempts
            );
        }

        Err(TokenError::UniquenessExhausted {
            format: shape.format.to_string(),
            attempts: max_attempts,
        })
    }
}

/// Generator of placeholder tokens
///
/// The random source must be a [`CryptoRng`]; the default is rand's
/// ChaCha-based [`StdRng`] seeded from the operating system. History and
/// random source sit behind one mutex, so a generator can be shared between
/// threads through an `Arc` without weakening the uniqueness guarantee.
///
/// # Examples
///
/// ```
/// use fake_tokens::tokens::{GenerateOptions, TokenFormat, TokenGenerator};
///
/// let generator = TokenGenerator::new();
/// let token = generator
///     .generate(TokenFormat::Gitlab, &GenerateOptions::default())
///     .unwrap();
///
/// assert!(token.starts_with("glpat-"));
/// assert_eq!(token.len(), 26);
/// assert_eq!(generator.history_size(), 1);
/// ```
pub struct TokenGenerator<R = StdRng> {
    state: Mutex<GeneratorState<R>>,
    max_attempts: u32,
}

impl TokenGenerator<StdRng> {
    /// Creates a generator with an OS-seeded [`StdRng`] and empty history
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for TokenGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CryptoRng> TokenGenerator<R> {
    /// Creates a generator drawing from the given random source
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                rng,
                history: TokenHistory::new(),
            }),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the per-token collision retry cap (at least 1)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Generates one token of `format`
    ///
    /// With `ensure_unique` the token is checked against and then added to
    /// the history. Fails with `InvalidArgument` for a fine-grained
    /// `total_length` below 21.
    pub fn generate(&self, format: TokenFormat, options: &GenerateOptions) -> Result<String> {
        let shape = format.shape(options.total_length)?;
        let token = self
            .lock()
            .next_token(&shape, options.ensure_unique, self.max_attempts)?;

        debug!("[{}] generated {}", format, mask_token(&token));
        Ok(token)
    }

    /// Generates `count` unique tokens of the named type with its defaults
    ///
    /// The type name is parsed before anything is generated, so an unknown
    /// name fails with `InvalidArgument` and leaves the history untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use fake_tokens::tokens::TokenGenerator;
    ///
    /// let generator = TokenGenerator::new();
    /// let keys = generator.generate_batch(3, "aws_access_key").unwrap();
    ///
    /// assert_eq!(keys.len(), 3);
    /// assert!(keys.iter().all(|k| k.starts_with("AKIA") && k.len() == 20));
    /// assert!(generator.generate_batch(1, "bitbucket").is_err());
    /// ```
    pub fn generate_batch(&self, count: usize, token_type: &str) -> Result<Vec<String>> {
        let format: TokenFormat = token_type.parse()?;
        self.generate_batch_with(count, format, &GenerateOptions::default())
    }

    /// Generates `count` tokens of `format`, in generation order
    ///
    /// All-or-nothing: if any token fails, the tokens this call already
    /// recorded are removed from the history again.
    pub fn generate_batch_with(
        &self,
        count: usize,
        format: TokenFormat,
        options: &GenerateOptions,
    ) -> Result<Vec<String>> {
        let shape = format.shape(options.total_length)?;
        let mut state = self.lock();
        let mut tokens = Vec::with_capacity(count.min(MAX_BATCH_PREALLOCATION));

        for _ in 0..count {
            match state.next_token(&shape, options.ensure_unique, self.max_attempts) {
                Ok(token) => tokens.push(token),
                Err(e) => {
                    if options.ensure_unique {
                        for token in &tokens {
                            state.history.remove(token);
                        }
                    }
                    return Err(e);
                }
            }
        }

        debug!(
            "[{}] generated batch of {} (history size {})",
            format,
            tokens.len(),
            state.history.len()
        );
        Ok(tokens)
    }

    /// Forgets every token generated so far
    pub fn clear_history(&self) {
        self.lock().history.clear();
    }

    pub fn history_size(&self) -> usize {
        self.lock().history.len()
    }

    fn lock(&self) -> MutexGuard<'_, GeneratorState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
