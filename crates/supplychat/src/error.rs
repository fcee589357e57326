//! Error types for the backend client and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the assistant backend.
///
/// Every variant is recovered by the session as a generic error message; none
/// of them ends the session.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("{endpoint} returned HTML instead of JSON (HTTP {status}): {preview}")]
    Html {
        endpoint: String,
        status: u16,
        preview: String,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Endpoint the failed request was addressed to, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ClientError::Transport { endpoint, .. }
            | ClientError::Status { endpoint, .. }
            | ClientError::Html { endpoint, .. }
            | ClientError::Decode { endpoint, .. } => Some(endpoint),
            ClientError::Build(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
