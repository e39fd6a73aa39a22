pub mod format_validator;

pub use format_validator::{FormatCheck, FormatValidator, FormatViolation};
