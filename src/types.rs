/// Serializable error envelope for JSON error output.
use serde::Serialize;

use crate::errors::RunError;

/// Structured error written to stderr when JSON output was requested.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `RunError`.
    #[must_use]
    pub fn from_run_error(err: &RunError) -> Self {
        let code = match err {
            RunError::Query(_) => "query_error",
            RunError::Topology(_) => "topology_error",
            RunError::Render(_) => "render_error",
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::TopologyError;

    #[test]
    fn test_envelope_names_offender() {
        let err = RunError::from(TopologyError::OrphanParent {
            id: "part1".to_owned(),
            parent: "diskZ".to_owned(),
        });
        let output = ErrorOutput::from_run_error(&err);
        assert!(!output.ok);
        assert_eq!(output.error.code, "topology_error");
        assert!(output.error.message.contains("diskZ"));
    }
}
