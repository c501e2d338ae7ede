//! Observability for the Argus parameter pipeline.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: pipeline counters via the `metrics` facade
//!
//! The pipeline itself only emits `tracing` events and `metrics` counters;
//! applications decide where they go by calling [`init_logging`] and
//! installing a metrics recorder of their choice.

#![doc(html_root_url = "https://docs.rs/argus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};
pub use metrics::{record_extraction, record_rejection, Outcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
