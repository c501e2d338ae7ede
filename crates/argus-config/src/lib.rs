//! Typed configuration for Argus.
//!
//! This crate provides:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//! - Declarative parameter tables per endpoint
//!
//! # Example
//!
//! ```no_run
//! use argus_config::ConfigLoader;
//!
//! # fn main() -> Result<(), argus_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("argus.toml")?
//!     .with_env_prefix("ARGUS")
//!     .with_dotenv()?
//!     .load()?;
//!
//! println!("separator: {}", config.pipeline.default_separator);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [pipeline]
//! default_separator = ","
//! strict_validators = false
//! max_body_size = 1048576
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [[endpoints.create_user.params]]
//! name = "age"
//! type = "int"
//! lookup = "body"
//! default = 0
//! validators = "required|min: 0"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ARGUS__PIPELINE__DEFAULT_SEPARATOR` | `pipeline.default_separator` |
//! | `ARGUS__PIPELINE__STRICT_VALIDATORS` | `pipeline.strict_validators` |
//! | `ARGUS__PIPELINE__MAX_BODY_SIZE` | `pipeline.max_body_size` |
//! | `ARGUS__LOGGING__ENABLED` | `logging.enabled` |
//! | `ARGUS__LOGGING__LEVEL` | `logging.level` |
//! | `ARGUS__LOGGING__FORMAT` | `logging.format` |
//! | `ARGUS__LOGGING__INCLUDE_LOCATION` | `logging.include_location` |

#![doc(html_root_url = "https://docs.rs/argus-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::ArgusConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{EndpointConfig, LoggingConfig, ParamDecl, PipelineConfig, LOOKUP_NAMES};

// Re-export for convenience in logging sections.
pub use argus_telemetry::LogFormat;
