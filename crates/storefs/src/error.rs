// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for storage operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The sanitized path has no usable container / file-name-with-extension split
    #[error("Malformed storage path: {path:?}")]
    PathFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(String),
}

impl Error {
    pub fn path_format<S: Into<String>>(path: S) -> Self {
        Error::PathFormat { path: path.into() }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }
}

/// Failures reported by a [`crate::TransportClient`]
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("S3 error: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("Request for {key} failed with HTTP status {status}")]
    Status { key: String, status: u16 },

    #[error("Session error: {0}")]
    Session(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Map a response status for `key` to success or an error
    pub fn check_status(key: &str, status: u16) -> std::result::Result<(), TransportError> {
        match status {
            200..=299 => Ok(()),
            404 => Err(TransportError::NotFound { key: key.to_string() }),
            _ => Err(TransportError::Status {
                key: key.to_string(),
                status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(TransportError::check_status("a.png", 200).is_ok());
        assert!(TransportError::check_status("a.png", 204).is_ok());
        assert!(matches!(
            TransportError::check_status("a.png", 404),
            Err(TransportError::NotFound { key }) if key == "a.png"
        ));
        assert!(matches!(
            TransportError::check_status("a.png", 503),
            Err(TransportError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn test_display() {
        let err = Error::path_format("dir/");
        assert_eq!(err.to_string(), "Malformed storage path: \"dir/\"");

        let err = Error::from(TransportError::Other("s3 problem".into()));
        assert_eq!(err.to_string(), "Transport error: s3 problem");
    }
}
