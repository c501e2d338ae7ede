//! Telemetry setup errors.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;

/// Logging could not be set up.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level is not a valid filter directive.
    #[error("invalid log filter '{directive}'")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },

    /// A global subscriber is already installed.
    #[error("global subscriber already installed")]
    AlreadyInitialized(#[from] TryInitError),
}
