//! Custom error types for the site runtime
//!
//! Every failure inside the stats workflow is recovered before it reaches the
//! page, so most of these errors travel no further than the diagnostic log.

use std::fmt;
use std::time::Duration;

/// Main error type for the site runtime
#[derive(Debug)]
pub enum SiteError {
    /// The statistics API could not be reached
    Transport(reqwest::Error),

    /// The statistics API answered with a non-success status
    Status {
        /// URL of the request that failed
        endpoint: String,
        /// HTTP status code returned
        status: u16,
    },

    /// A response body was not valid JSON
    Decode(serde_json::Error),

    /// The request did not settle before the deadline
    Timeout(Duration),

    /// Error occurred while reading configuration file
    ConfigRead(std::io::Error),

    /// Error occurred while parsing configuration
    ConfigParse(json5::Error),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteError::Transport(e) => {
                write!(f, "Failed to reach statistics API: {e}")
            }
            SiteError::Status { endpoint, status } => {
                write!(f, "Request to {endpoint} failed with status {status}")
            }
            SiteError::Decode(e) => {
                write!(f, "Failed to decode response body: {e}")
            }
            SiteError::Timeout(limit) => {
                write!(f, "Request timed out after {}s", limit.as_secs_f64())
            }
            SiteError::ConfigRead(e) => {
                write!(f, "Failed to read configuration file: {e}")
            }
            SiteError::ConfigParse(e) => {
                write!(f, "Failed to parse configuration: {e}")
            }
            SiteError::Generic(msg) => {
                write!(f, "Error: {msg}")
            }
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteError::Transport(e) => Some(e),
            SiteError::Decode(e) => Some(e),
            SiteError::ConfigRead(e) => Some(e),
            SiteError::ConfigParse(e) => Some(e),
            SiteError::Status { .. } | SiteError::Timeout(_) | SiteError::Generic(_) => None,
        }
    }
}

impl From<reqwest::Error> for SiteError {
    fn from(error: reqwest::Error) -> Self {
        SiteError::Transport(error)
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(error: serde_json::Error) -> Self {
        SiteError::Decode(error)
    }
}

impl From<std::io::Error> for SiteError {
    fn from(error: std::io::Error) -> Self {
        SiteError::ConfigRead(error)
    }
}

impl From<json5::Error> for SiteError {
    fn from(error: json5::Error) -> Self {
        SiteError::ConfigParse(error)
    }
}

impl From<&str> for SiteError {
    fn from(msg: &str) -> Self {
        SiteError::Generic(msg.to_string())
    }
}

impl From<String> for SiteError {
    fn from(msg: String) -> Self {
        SiteError::Generic(msg)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, SiteError>;
