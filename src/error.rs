use thiserror::Error;

/// Errors surfaced at the calculator boundary.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Unknown zodiac sign: {0}")]
    UnknownSign(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to (de)serialize cache entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
