//! Reference-service error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reference service error (status {status_code}) for {url}")]
    Status {
        status_code: u16,
        url: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid postal code '{0}': expected 8 digits")]
    InvalidPostalCode(String),
}

impl LookupError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::Http(_) => true,
            LookupError::Status { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;
