//! Error types for gas-api

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Credentials missing, expired or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested project, version or deployment does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Fs(#[from] gas_fs::Error),
}
