//! Error types for blob store operations.

use std::fmt;

/// Result type for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during blob store operations.
#[derive(Debug)]
pub enum BlobError {
    /// Invalid URI format or scheme.
    InvalidUri { uri: String, reason: String },

    /// I/O error from the local filesystem backend.
    Io { source: std::io::Error },

    /// Transport, authentication or service error talking to the store.
    Network { source: anyhow::Error },

    /// Presigned URL generation error.
    Presign { reason: String },

    /// Backend not supported.
    UnsupportedBackend { scheme: String },

    /// Missing or invalid backend configuration.
    Config { reason: String },
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobError::InvalidUri { uri, reason } => {
                write!(f, "invalid URI '{}': {}", uri, reason)
            }
            BlobError::Io { source } => write!(f, "I/O error: {}", source),
            BlobError::Network { source } => write!(f, "network error: {:#}", source),
            BlobError::Presign { reason } => {
                write!(f, "presigned URL generation error: {}", reason)
            }
            BlobError::UnsupportedBackend { scheme } => {
                write!(f, "unsupported backend: {}", scheme)
            }
            BlobError::Config { reason } => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for BlobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobError::Io { source } => Some(source),
            BlobError::Network { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlobError {
    fn from(err: std::io::Error) -> Self {
        BlobError::Io { source: err }
    }
}

impl From<anyhow::Error> for BlobError {
    fn from(err: anyhow::Error) -> Self {
        BlobError::Network { source: err }
    }
}
