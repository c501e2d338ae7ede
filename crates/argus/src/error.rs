//! Declaration-time errors.

use argus_validate::SpecError;
use thiserror::Error;

/// A parameter declaration that cannot be compiled into a pipeline.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// The configuration names no such endpoint.
    #[error("unknown endpoint '{endpoint}'")]
    UnknownEndpoint {
        /// Requested endpoint name.
        endpoint: String,
    },

    /// The lookup name matches no built-in strategy.
    #[error("unknown lookup '{lookup}' for parameter '{param}'")]
    UnknownLookup {
        /// Parameter name.
        param: String,
        /// Offending lookup name.
        lookup: String,
    },

    /// The default value does not convert to the declared type.
    #[error("invalid default for parameter '{param}': {reason}")]
    InvalidDefault {
        /// Parameter name.
        param: String,
        /// Conversion failure.
        reason: String,
    },

    /// The validator clause string is invalid.
    #[error("invalid validators for parameter '{param}': {source}")]
    Validators {
        /// Parameter name.
        param: String,
        /// Parse or build failure.
        #[source]
        source: SpecError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DeclarationError::UnknownLookup {
            param: "age".into(),
            lookup: "cookie".into(),
        };
        assert_eq!(err.to_string(), "unknown lookup 'cookie' for parameter 'age'");

        let err = DeclarationError::Validators {
            param: "age".into(),
            source: SpecError::UnknownValidator {
                name: "positive".into(),
            },
        };
        assert!(err.to_string().starts_with("invalid validators for parameter 'age'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
