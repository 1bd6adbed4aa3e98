//! Error types for OAuth building blocks

/// Errors from scope parsing, URL building, and token file handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown OAuth 2.0 scope: {0}")]
    UnknownScope(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("token parse error: {0}")]
    CredentialParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
