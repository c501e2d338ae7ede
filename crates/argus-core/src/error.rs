//! Error types for the parameter pipeline.
//!
//! [`ParamError`] is the single failure type a pipeline call returns. It keeps
//! parameter rejections apart from whatever the wrapped handler itself
//! returns.
//!
//! | Variant | Status | Code |
//! |---|---|---|
//! | `Conversion` | 400 | `INVALID_PARAMETER` |
//! | `Validation` | 422 | `VALIDATION_FAILED` |
//! | `Extraction` | from [`ExtractionError`] | from [`ExtractionError`] |
//! | `Lookup` | 500 | `LOOKUP_FAILED` |

use http::StatusCode;
use thiserror::Error;

use crate::ExtractionError;

/// Result type alias using [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// A raw value is not well-formed for the target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ConversionError {
    key: String,
    reason: String,
}

impl ConversionError {
    /// Creates a conversion error for `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// The key that was being converted.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Why the value was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A configured validator rejected the converted arguments.
///
/// The message is already rendered with the parameter's verbose name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    code: String,
    key: String,
    message: String,
}

impl ValidationFailure {
    /// Creates a validation failure.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Machine-readable validator code (e.g. `required`).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Argument key that failed.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rendered, human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure of one pipeline call.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A raw value could not be converted to the declared type.
    #[error("type conversion failed for {label}: {source}")]
    Conversion {
        /// Source key of the parameter.
        field: String,
        /// Verbose name of the parameter.
        label: String,
        /// Underlying conversion error.
        #[source]
        source: ConversionError,
    },

    /// A validator rejected the converted value.
    #[error("{failure}")]
    Validation {
        /// Output key of the parameter.
        field: String,
        /// The rendered failure.
        #[source]
        failure: ValidationFailure,
    },

    /// Raw request data could not be read.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A custom lookup strategy failed.
    #[error("lookup failed for {field}: {source}")]
    Lookup {
        /// Source key of the parameter.
        field: String,
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },
}

impl ParamError {
    /// Creates a conversion error.
    #[must_use]
    pub fn conversion(
        field: impl Into<String>,
        label: impl Into<String>,
        source: ConversionError,
    ) -> Self {
        Self::Conversion {
            field: field.into(),
            label: label.into(),
            source,
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, failure: ValidationFailure) -> Self {
        Self::Validation {
            field: field.into(),
            failure,
        }
    }

    /// Creates a lookup error.
    #[must_use]
    pub fn lookup(field: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Lookup {
            field: field.into(),
            source: source.into(),
        }
    }

    /// Returns the parameter key involved, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Conversion { field, .. }
            | Self::Validation { field, .. }
            | Self::Lookup { field, .. } => Some(field),
            Self::Extraction(_) => None,
        }
    }

    /// Returns the validator code for validation failures.
    #[must_use]
    pub fn validator_code(&self) -> Option<&str> {
        match self {
            Self::Validation { failure, .. } => Some(failure.code()),
            _ => None,
        }
    }

    /// Returns true for conversion failures.
    #[must_use]
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Returns true for validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conversion { .. } => StatusCode::BAD_REQUEST,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Extraction(err) => err.status_code(),
            Self::Lookup { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Conversion { .. } => "INVALID_PARAMETER",
            Self::Validation { .. } => "VALIDATION_FAILED",
            Self::Extraction(err) => err.error_code(),
            Self::Lookup { .. } => "LOOKUP_FAILED",
        }
    }
}
