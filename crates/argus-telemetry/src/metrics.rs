//! Pipeline counters, recorded through the `metrics` facade.
//!
//! No exporter is installed here; counters go to whatever recorder the
//! application has set up and are dropped otherwise.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `argus_param_extractions_total` | Counter | `endpoint`, `outcome` | Pipeline calls |
//! | `argus_param_rejections_total` | Counter | `kind`, `code` | Rejected parameters |

use metrics::{counter, describe_counter};

/// Counter of pipeline calls.
pub const EXTRACTIONS_TOTAL: &str = "argus_param_extractions_total";

/// Counter of rejected parameters.
pub const REJECTIONS_TOTAL: &str = "argus_param_rejections_total";

/// Outcome label of a pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every parameter was accepted.
    Accepted,
    /// A parameter was rejected.
    Rejected,
}

impl Outcome {
    /// Label value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Registers descriptions for the pipeline counters.
pub fn describe_metrics() {
    describe_counter!(EXTRACTIONS_TOTAL, "Total parameter pipeline calls by outcome");
    describe_counter!(REJECTIONS_TOTAL, "Total rejected parameters by kind and code");
}

/// Records one pipeline call.
pub fn record_extraction(endpoint: &str, outcome: Outcome) {
    counter!(
        EXTRACTIONS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Records one rejected parameter.
///
/// `kind` is the failure class (`conversion`, `validation`, ...); `code` the
/// validator or error code.
pub fn record_rejection(kind: &str, code: &str) {
    counter!(
        REJECTIONS_TOTAL,
        "kind" => kind.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Accepted.as_str(), "accepted");
        assert_eq!(Outcome::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_record_functions_dont_panic() {
        // No recorder is installed, so these are no-ops.
        describe_metrics();
        record_extraction("create_user", Outcome::Accepted);
        record_rejection("validation", "required");
    }
}
