//! Why a configuration could not be loaded.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configuration source was unusable or produced an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("{} does not exist", path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// A file exists but could not be read.
    #[error("cannot read {}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// Malformed TOML.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither TOML nor JSON.
    #[error("unsupported config format '{format}' (expected toml or json)")]
    UnsupportedFormat {
        /// Extension or format name given.
        format: String,
    },

    /// A setting is out of range or refers to something unknown.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted path of the setting.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable holds an unparsable value.
    #[error("environment variable {var}: {reason}")]
    Env {
        /// Variable name.
        var: String,
        /// Expected shape.
        reason: String,
    },

    /// A `.env` file is present but malformed.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env(var: &str, reason: &str) -> Self {
        Self::Env {
            var: var.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigError::NotFound {
            path: "/etc/argus/argus.toml".into(),
        };
        assert_eq!(err.to_string(), "/etc/argus/argus.toml does not exist");

        let err = ConfigError::invalid("pipeline.default_separator", "must not be empty");
        assert_eq!(
            err.to_string(),
            "pipeline.default_separator: must not be empty"
        );

        let err = ConfigError::env("ARGUS__PIPELINE__MAX_BODY_SIZE", "expected integer");
        assert_eq!(
            err.to_string(),
            "environment variable ARGUS__PIPELINE__MAX_BODY_SIZE: expected integer"
        );
    }

    #[test]
    fn test_toml_source_converts() {
        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        assert!(matches!(ConfigError::from(parse), ConfigError::Toml(_)));
    }
}
