pub mod catalog;
pub mod generator;
pub mod history;

pub use catalog::{Alphabet, LengthPolicy, TokenFormat, TokenShape};
pub use generator::{DEFAULT_MAX_ATTEMPTS, GenerateOptions, TokenGenerator};
pub use history::TokenHistory;
