use crate::provider::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Policy file not found: {0}")]
    PolicyNotFound(String),

    #[error("Signature file not found: {0}")]
    SignaturesNotFound(String),

    #[error("Failed to read file: {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Content unavailable for {path}: {reason}")]
    ContentUnavailable { path: String, reason: String },

    #[error("Repository access failed: {0}")]
    RepositoryAccess(#[from] ProviderError),

    #[error("Regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to write results: {path}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AuditError>;
