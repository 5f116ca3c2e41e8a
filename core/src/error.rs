use std::{error::Error, fmt, result};

pub type Result<T, E = OrchestrationError> = result::Result<T, E>;

/// Error taxonomy for the orchestration layer. Variants correspond to the
/// rows of the error table in the design doc: each carries enough context
/// for the HTTP layer to pick a status code without re-deriving it from the
/// message text.
#[derive(Debug)]
pub enum OrchestrationError {
    Validation(String),
    NotFound(String),
    Duplicate(String),
    Template(TemplateErrorKind),
    AgentTimeout(String),
    AgentRetryableFailure(String),
    AgentFatalFailure(String),
    JobFailed(String),
    LocalCommitFailure(String),
    PartialSyncFailure {
        succeeded: usize,
        failed: usize,
        detail: String,
    },
    Internal(String),
    DbError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateErrorKind {
    DecodeError(String),
    MissingPlaceholder(String),
}

impl Error for OrchestrationError {}

impl fmt::Display for OrchestrationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrchestrationError::Validation(s) => write!(f, "validation error: {s}"),
            OrchestrationError::NotFound(s) => write!(f, "not found: {s}"),
            OrchestrationError::Duplicate(s) => write!(f, "duplicate: {s}"),
            OrchestrationError::Template(TemplateErrorKind::DecodeError(s)) => {
                write!(f, "template decode error: {s}")
            }
            OrchestrationError::Template(TemplateErrorKind::MissingPlaceholder(s)) => {
                write!(f, "template missing placeholder: {s}")
            }
            OrchestrationError::AgentTimeout(s) => write!(f, "agent timed out: {s}"),
            OrchestrationError::AgentRetryableFailure(s) => {
                write!(f, "agent retryable failure: {s}")
            }
            OrchestrationError::AgentFatalFailure(s) => write!(f, "agent fatal failure: {s}"),
            OrchestrationError::JobFailed(s) => write!(f, "job failed: {s}"),
            OrchestrationError::LocalCommitFailure(s) => {
                write!(f, "local commit failed after agent success: {s}")
            }
            OrchestrationError::PartialSyncFailure {
                succeeded,
                failed,
                detail,
            } => write!(
                f,
                "sync partially failed: {succeeded} succeeded, {failed} failed ({detail})"
            ),
            OrchestrationError::Internal(s) => write!(f, "internal error: {s}"),
            OrchestrationError::DbError(s) => write!(f, "database error: {s}"),
        }
    }
}

impl From<diesel::result::Error> for OrchestrationError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => OrchestrationError::NotFound(e.to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => OrchestrationError::Duplicate(e.to_string()),
            other => OrchestrationError::DbError(other.to_string()),
        }
    }
}

impl From<diesel::result::ConnectionError> for OrchestrationError {
    fn from(e: diesel::result::ConnectionError) -> Self {
        OrchestrationError::DbError(e.to_string())
    }
}

impl From<diesel_async::pooled_connection::bb8::RunError> for OrchestrationError {
    fn from(e: diesel_async::pooled_connection::bb8::RunError) -> Self {
        OrchestrationError::DbError(e.to_string())
    }
}

impl From<serde_json::Error> for OrchestrationError {
    fn from(e: serde_json::Error) -> Self {
        OrchestrationError::Internal(format!("serde error: {e}"))
    }
}

impl From<hex::FromHexError> for OrchestrationError {
    fn from(e: hex::FromHexError) -> Self {
        OrchestrationError::Template(TemplateErrorKind::DecodeError(e.to_string()))
    }
}

impl From<std::io::Error> for OrchestrationError {
    fn from(e: std::io::Error) -> Self {
        OrchestrationError::Internal(format!("io error: {e}"))
    }
}

/// Pure classification of an Agent-reported error message into retryable vs
/// fatal, per the transport's retry policy. Stable across runs: a pure
/// function of the message text alone.
pub fn is_retryable_message(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    let fatal_markers = [
        "permission denied",
        "unauthorised",
        "unauthorized",
        "unknown os type",
        "invalid action",
        "authentication failed",
    ];
    if fatal_markers.iter().any(|m| lower.contains(m)) {
        return false;
    }
    let retryable_markers = [
        "json parse",
        "parse error",
        "empty output",
        "connection refused",
        "timeout",
        "deadline exceeded",
        "network unreachable",
        "temporary failure",
    ];
    if retryable_markers.iter().any(|m| lower.contains(m)) {
        return true;
    }
    // Anything unrecognised defaults to retryable per the transport's policy.
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_markers_are_not_retryable() {
        assert!(!is_retryable_message("Permission denied for user"));
        assert!(!is_retryable_message("Authentication failed"));
        assert!(!is_retryable_message("invalid action requested"));
    }

    #[test]
    fn known_retryable_markers_are_retryable() {
        assert!(is_retryable_message("Connection refused by host"));
        assert!(is_retryable_message("request timeout after 30s"));
        assert!(is_retryable_message("empty output received"));
    }

    #[test]
    fn unrecognised_defaults_to_retryable() {
        assert!(is_retryable_message("some never before seen error"));
    }

    #[test]
    fn classification_is_stable() {
        let msg = "Connection refused";
        assert_eq!(is_retryable_message(msg), is_retryable_message(msg));
    }
}
