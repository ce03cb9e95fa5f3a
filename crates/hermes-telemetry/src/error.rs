//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level filter does not parse.
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected filter.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The log format name is unknown.
    #[error("Unknown log format '{0}', expected 'json', 'pretty' or 'compact'")]
    UnknownFormat(String),
}
