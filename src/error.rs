use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed swap payload: {0}")]
    MalformedPayload(String),

    #[error("Event source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Narrative service rate-limited: {0}")]
    RateLimited(String),

    #[error("Narrative service error: {0}")]
    Service(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
