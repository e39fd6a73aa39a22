//! Per-generator record of emitted tokens

use std::collections::HashSet;

/// Set of tokens a generator has already handed out
#[derive(Debug, Default, Clone)]
pub struct TokenHistory {
    tokens: HashSet<String>,
}

impl TokenHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Returns `false` if the token was already recorded
    pub fn insert(&mut self, token: String) -> bool {
        self.tokens.insert(token)
    }

    pub fn remove(&mut self, token: &str) -> bool {
        self.tokens.remove(token)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
