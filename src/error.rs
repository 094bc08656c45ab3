//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

pub type TransferResult<T> = Result<T, TransferError>;

/// Failure of a single transfer task. Any one of these aborts the job it belongs to.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {status} - {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transfer worker exited without reporting: {0}")]
    Worker(String),
}

impl TransferError {
    pub(crate) fn request(url: &str, source: reqwest::Error) -> Self {
        TransferError::Request {
            url: url.to_string(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to walk export folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write export archive: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::TransferError;

    #[test]
    fn status_error_message_includes_code_and_body() {
        let err = TransferError::Status {
            url: "http://host/a.ply".to_string(),
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request to http://host/a.ply failed: 503 - busy"
        );
    }
}
