//! Failures reading raw request data.
//!
//! These happen before any conversion: a body that is not a JSON object, a
//! payload over its limit, or a broken multipart stream.

use http::StatusCode;
use thiserror::Error;

/// Raw request data could not be read.
///
/// ```rust
/// use argus_core::ExtractionError;
/// use http::StatusCode;
///
/// let err = ExtractionError::malformed_body("expected value at line 1");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.error_code(), "MALFORMED_BODY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The body is not in the expected shape.
    #[error("malformed request body: {detail}")]
    MalformedBody {
        /// Parser message.
        detail: String,
    },

    /// The body, or one multipart field, exceeds its limit.
    #[error("payload of {actual} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// Limit in bytes.
        limit: usize,
        /// Observed size in bytes.
        actual: usize,
    },

    /// The Content-Type cannot be used to read the body.
    #[error("unsupported content type: {detail}")]
    UnsupportedMediaType {
        /// What is wrong with the header.
        detail: String,
    },

    /// A multipart form has more fields than allowed.
    #[error("multipart form has more than {limit} fields")]
    TooManyFields {
        /// Field limit.
        limit: usize,
    },
}

impl ExtractionError {
    /// The body could not be parsed.
    #[must_use]
    pub fn malformed_body(detail: impl Into<String>) -> Self {
        Self::MalformedBody {
            detail: detail.into(),
        }
    }

    /// The payload is larger than `limit`.
    #[must_use]
    pub fn payload_too_large(limit: usize, actual: usize) -> Self {
        Self::PayloadTooLarge { limit, actual }
    }

    /// The Content-Type is missing or unusable.
    #[must_use]
    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            detail: detail.into(),
        }
    }

    /// The multipart form exceeds `limit` fields.
    #[must_use]
    pub fn too_many_fields(limit: usize) -> Self {
        Self::TooManyFields { limit }
    }

    /// HTTP status for this failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody { .. } | Self::TooManyFields { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Envelope code for this failure.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedBody { .. } => "MALFORMED_BODY",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            Self::TooManyFields { .. } => "TOO_MANY_FIELDS",
        }
    }
}
