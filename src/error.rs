//! Error types for Lekse.

use thiserror::Error;

/// Library-level error type for Lekse operations.
#[derive(Error, Debug)]
pub enum LekseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Invalid or missing API key: {0}")]
    Auth(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Permission denied by provider: {0}")]
    PermissionDenied(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Notes store error: {0}")]
    Notes(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown provider error: {0}")]
    Unknown(String),
}

impl LekseError {
    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            LekseError::Validation(_) | LekseError::InvalidInput(_) => 400,
            LekseError::Auth(_) => 401,
            LekseError::PermissionDenied(_) => 403,
            LekseError::TranscriptUnavailable(_) => 404,
            LekseError::RateLimited(_) => 429,
            LekseError::ProviderUnavailable(_) => 502,
            _ => 500,
        }
    }
}

/// Result type alias for Lekse operations.
pub type Result<T> = std::result::Result<T, LekseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(LekseError::Validation("missing videoId".into()).status_code(), 400);
        assert_eq!(LekseError::Auth("bad key".into()).status_code(), 401);
        assert_eq!(LekseError::PermissionDenied("no access".into()).status_code(), 403);
        assert_eq!(LekseError::TranscriptUnavailable("no captions".into()).status_code(), 404);
        assert_eq!(LekseError::RateLimited("quota".into()).status_code(), 429);
        assert_eq!(LekseError::ProviderUnavailable("down".into()).status_code(), 502);
        assert_eq!(LekseError::VectorStore("oops".into()).status_code(), 500);
    }
}
