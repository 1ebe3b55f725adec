//! Crate-level error taxonomy.
//!
//! Every fallible operation in this crate returns [`Error`]. The variants map
//! onto where a failure originated:
//!
//! - [`Error::Validation`] — malformed call arguments, detected locally before
//!   any network traffic.
//! - [`Error::Transport`] — connection, DNS, or timeout failures surfaced from
//!   the HTTP client verbatim.
//! - [`Error::Api`] — an HTTP response with status >= 400, normalized from the
//!   body shape (see [`crate::response`]).
//! - [`Error::UnexpectedResponse`] — a 2xx response whose body violates the
//!   API contract (e.g. a missing `job_id` after submission).
//! - [`Error::TerminalStatus`] / [`Error::PollTimeout`] — produced by the
//!   status poller, never by one-shot calls.
//!
//! Error messages are stable, human-readable strings suitable directly for
//! display. Machine handling should match on the variant (or [`Error::code`])
//! rather than on message text.

use std::time::Duration;

use thiserror::Error;

use crate::types::JobStatus;

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// Machine-readable code attached to an [`Error::Api`].
///
/// Defaults to the HTTP status; when the response body carries a non-string
/// `error` field, that value is used instead (legacy cluster releases encode
/// application error codes this way).
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCode {
    /// The HTTP status code of the failed response.
    Status(u16),
    /// An application-defined code taken from the response body's `error` field.
    Value(serde_json::Value),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Value(serde_json::Value::String(s)) => write!(f, "{s}"),
            Self::Value(other) => write!(f, "{other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Crate error
// ---------------------------------------------------------------------------

/// Errors produced by the GridSlice client.
///
/// Nothing in this crate retries automatically and nothing is logged on the
/// caller's behalf; every failure is returned to the immediate caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The call arguments were malformed. Raised before any network traffic.
    #[error("{message}")]
    Validation {
        /// Description of the argument problem.
        message: String,
    },

    /// A transport-level failure (connection refused, DNS, timeout).
    ///
    /// The underlying error message is surfaced unchanged.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The cluster answered with an HTTP status >= 400.
    #[error("{message}")]
    Api {
        /// Human-readable message derived from the response body.
        message: String,
        /// Machine-readable code; defaults to the HTTP status.
        code: ErrorCode,
    },

    /// A 2xx response whose body does not match the API contract.
    #[error("{message}")]
    UnexpectedResponse {
        /// Description of the contract violation.
        message: String,
    },

    /// The job reached a fatal terminal status while waiting for a different
    /// target status.
    #[error("Job has status: \"{status}\" which is terminal so status: \"{target}\" is not possible. job_id: {job_id}")]
    TerminalStatus {
        /// Identifier of the polled job.
        job_id: String,
        /// The fatal terminal status that was observed.
        status: JobStatus,
        /// The status the caller was waiting for.
        target: JobStatus,
    },

    /// The wait-for-status budget was exhausted before the target was reached.
    #[error("Timeout of {}ms exceeded while waiting for job {job_id} to reach status \"{target}\"", .waited.as_millis())]
    PollTimeout {
        /// Identifier of the polled job.
        job_id: String,
        /// The status the caller was waiting for.
        target: JobStatus,
        /// Wall-clock time spent polling before giving up.
        waited: Duration,
    },
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::UnexpectedResponse`] with the given message.
    pub(crate) fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// The machine-readable code of an API error, if this is one.
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Legacy-compatible alias for [`Error::code`].
    ///
    /// Older callers read the code from an `error` field; both accessors
    /// always return the same value.
    pub fn error_code(&self) -> Option<&ErrorCode> {
        self.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_status_message_is_stable() {
        let err = Error::TerminalStatus {
            job_id: "j-1".to_string(),
            status: JobStatus::Failed,
            target: JobStatus::Running,
        };
        assert_eq!(
            err.to_string(),
            "Job has status: \"failed\" which is terminal so status: \"running\" is not possible. job_id: j-1"
        );
    }

    #[test]
    fn code_and_legacy_alias_agree() {
        let err = Error::Api {
            message: "boom".to_string(),
            code: ErrorCode::Status(500),
        };
        assert_eq!(err.code(), err.error_code());
        assert_eq!(err.code(), Some(&ErrorCode::Status(500)));
    }

    #[test]
    fn error_code_display_unwraps_strings() {
        assert_eq!(ErrorCode::Status(404).to_string(), "404");
        assert_eq!(
            ErrorCode::Value(serde_json::json!("slice_failure")).to_string(),
            "slice_failure"
        );
        assert_eq!(ErrorCode::Value(serde_json::json!(42)).to_string(), "42");
    }
}
