//! Error types for costwatch
//!
//! This module defines the error types used throughout the costwatch crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use costwatch_core::error::{CostwatchError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CostwatchError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for costwatch operations
///
/// Transport and storage faults are kept apart from validation failures so
/// that callers can decide between falling back, surfacing an error state,
/// or rejecting user input before any request is made.
#[derive(Error, Debug)]
pub enum CostwatchError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backing API answered with a non-success status
    #[error("HTTP {status} from {path}: {message}")]
    Transport {
        /// Status code returned by the API
        status: u16,
        /// Request path
        path: String,
        /// Response body or reason phrase
        message: String,
    },

    /// Response body could not be interpreted at all
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A field that has no safe default was absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Invalid date or timestamp
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Period start is after period end
    #[error("Invalid period: {start} is after {end}")]
    InvalidPeriod {
        /// Period start as received
        start: String,
        /// Period end as received
        end: String,
    },

    /// User input rejected before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Object storage fault during listing or retrieval
    #[error("Storage error: {0}")]
    StorageFault(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CostwatchError {
    /// Whether this error came from talking to the backing API
    ///
    /// Network errors, non-2xx statuses and undecodable bodies all count.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Transport { .. } | Self::MalformedPayload(_) | Self::Json(_)
        )
    }
}

/// Convenience type alias for Results in costwatch
///
/// # Example
///
/// ```
/// use costwatch_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CostwatchError>;
