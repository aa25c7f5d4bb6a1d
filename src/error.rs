//! Error types for price_watch

use std::fmt;

/// Unified error type for price_watch operations
#[derive(Debug)]
pub enum WatchError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// HTTP error status code from the pricing API
    HttpStatus(reqwest::StatusCode),
    /// Model record carried a price string that is not a decimal number
    InvalidPrice { model: String, value: String },
    /// Snapshot file could not be read or written
    Snapshot(std::io::Error),
    /// Discord webhook rejected the message
    WebhookStatus(reqwest::StatusCode),
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchError::Network(e) => write!(f, "Network error: {}", e),
            WatchError::Parse(e) => write!(f, "Parse error: {}", e),
            WatchError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            WatchError::InvalidPrice { model, value } => {
                write!(f, "Invalid price {:?} for model {}", value, model)
            }
            WatchError::Snapshot(e) => write!(f, "Snapshot error: {}", e),
            WatchError::WebhookStatus(status) => {
                write!(f, "Discord webhook returned {}", status)
            }
        }
    }
}

impl std::error::Error for WatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WatchError::Network(e) => Some(e),
            WatchError::Parse(e) => Some(e),
            WatchError::HttpStatus(_) => None,
            WatchError::InvalidPrice { .. } => None,
            WatchError::Snapshot(e) => Some(e),
            WatchError::WebhookStatus(_) => None,
        }
    }
}

impl From<reqwest::Error> for WatchError {
    fn from(err: reqwest::Error) -> Self {
        WatchError::Network(err)
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::Parse(err)
    }
}

impl From<std::io::Error> for WatchError {
    fn from(err: std::io::Error) -> Self {
        WatchError::Snapshot(err)
    }
}

/// Result alias for price_watch operations
pub type Result<T> = std::result::Result<T, WatchError>;
