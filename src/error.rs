//! Error types for Svar.

use thiserror::Error;

/// Library-level error type for Svar operations.
#[derive(Error, Debug)]
pub enum SvarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Vector index provisioning failed: {0}")]
    IndexProvisioning(String),

    #[error("Partial upsert: {written} of {attempted} vectors written")]
    PartialUpsert { written: usize, attempted: usize },

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

impl SvarError {
    /// Whether a fresh attempt at the failed step could reasonably succeed.
    ///
    /// Fatal kinds (missing captions, backend misconfiguration, bad input)
    /// are surfaced immediately instead of being retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            SvarError::TranscriptUnavailable(_)
                | SvarError::IndexProvisioning(_)
                | SvarError::Config(_)
                | SvarError::InvalidInput(_)
        )
    }
}

/// Result type alias for Svar operations.
pub type Result<T> = std::result::Result<T, SvarError>;
