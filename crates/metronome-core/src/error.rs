//! Error types for metronome-core

use thiserror::Error;

/// Result type alias for metronome operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in metronome-core
#[derive(Debug, Error)]
pub enum Error {
    /// A tempo parameter was zero
    #[error("{field} must be a positive integer (got {value})")]
    InvalidTempo {
        /// Name of the offending parameter
        field: &'static str,
        /// The rejected value
        value: u32,
    },

    /// A click could not be written to a temporary file
    #[error("Staging error: {0}")]
    Staging(String),

    /// Signal handler registration failed
    #[error("Signal error: {0}")]
    Signal(String),
}
