//! Error types shared by the mentor crates

use thiserror::Error;

/// Errors raised by the skill-state engine and its callers
#[derive(Debug, Error)]
pub enum MentorError {
    /// A feedback action string that is not `correct`, `confusion` or `struggle`
    #[error("invalid skill action '{0}' (expected correct, confusion or struggle)")]
    InvalidAction(String),

    /// A required request field was absent or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The topic/sentiment vocabulary failed validation
    #[error("vocabulary error: {0}")]
    Vocabulary(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, MentorError>;
