//! Error handling for WallKit
//!
//! Provides the error types for all layers of the application:
//! - Validation errors (user supplied geometry and planner parameters)
//! - Remote errors (persistence service calls)
//! - Session errors (orchestrator preconditions)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Validation error type
///
/// Raised before any state is mutated when user input does not satisfy
/// the invariants of the data model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Input text could not be parsed as a number
    #[error("{field} must be a number, got '{input}'")]
    NotANumber {
        /// The field being parsed.
        field: String,
        /// The raw input.
        input: String,
    },

    /// Value is NaN or infinite
    #[error("{field} must be finite")]
    NotFinite {
        /// The offending field.
        field: String,
    },

    /// Dimension is zero or negative
    #[error("{field} must be greater than zero, got {value}")]
    NonPositive {
        /// The offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// Overlap fraction outside the accepted range
    #[error("Overlap must be between 0% and 50%, got {}%", .value * 100.0)]
    OverlapOutOfRange {
        /// The rejected overlap fraction.
        value: f64,
    },

    /// Robot is so narrow relative to the wall that the sweep has too many rows
    #[error("Robot width {robot_width} needs more than {limit} sweep rows")]
    TooManyRows {
        /// The requested robot width.
        robot_width: f64,
        /// The row limit.
        limit: usize,
    },
}

impl ValidationError {
    /// Creates a `NonPositive` error for the named field.
    pub fn non_positive(field: impl Into<String>, value: f64) -> Self {
        Self::NonPositive {
            field: field.into(),
            value,
        }
    }
}

/// Remote persistence error type
///
/// Every failed call to the persistence collaborator is surfaced as exactly
/// one of these. Nothing is retried automatically.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The service answered with a non-success status
    #[error("{message}")]
    Status {
        /// HTTP-style status code.
        status: u16,
        /// Human readable message.
        message: String,
    },

    /// The requested record does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Record kind, e.g. "Wall".
        entity: &'static str,
        /// The requested id.
        id: u64,
    },

    /// The request never produced a response
    #[error("Request failed: {reason}")]
    Transport {
        /// The transport failure.
        reason: String,
    },

    /// The response body could not be decoded
    #[error("Invalid response: {reason}")]
    Decode {
        /// The decoding failure.
        reason: String,
    },
}

impl RemoteError {
    /// Builds the failure for a non-success response.
    ///
    /// Prefers the `detail` field of a structured error body and falls back
    /// to a generic status-line message.
    pub fn from_response(status: u16, reason: &str, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(text)) if text.is_empty() => None,
                Some(serde_json::Value::String(text)) => Some(text.clone()),
                Some(serde_json::Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            });

        let message = detail
            .unwrap_or_else(|| format!("Request failed with status {}: {}", status, reason));
        Self::Status { status, message }
    }

    /// The status code, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

/// Session error type
///
/// Failures raised by the orchestrator that owns the current wall,
/// obstacles and trajectory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The operation needs a wall and none has been created
    #[error("Please create a wall first")]
    NoWall,

    /// Invalid user input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Main error type for WallKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote error
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Session(SessionError::Validation(_))
        )
    }

    /// Check if this is a remote error
    pub fn is_remote_error(&self) -> bool {
        matches!(
            self,
            Error::Remote(_) | Error::Session(SessionError::Remote(_))
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::non_positive("Wall width", -1.0);
        assert_eq!(err.to_string(), "Wall width must be greater than zero, got -1");

        let err = ValidationError::OverlapOutOfRange { value: 0.75 };
        assert_eq!(err.to_string(), "Overlap must be between 0% and 50%, got 75%");
    }

    #[test]
    fn test_remote_error_prefers_detail() {
        let err = RemoteError::from_response(404, "Not Found", r#"{"detail":"Wall not found"}"#);
        assert_eq!(err.to_string(), "Wall not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_remote_error_falls_back_to_status_line() {
        let err = RemoteError::from_response(502, "Bad Gateway", "<html>oops</html>");
        assert_eq!(
            err.to_string(),
            "Request failed with status 502: Bad Gateway"
        );

        let err = RemoteError::from_response(500, "Internal Server Error", "{}");
        assert_eq!(
            err.to_string(),
            "Request failed with status 500: Internal Server Error"
        );
    }

    #[test]
    fn test_empty_detail_falls_back_to_status_line() {
        let err = RemoteError::from_response(400, "Bad Request", r#"{"detail":""}"#);
        assert_eq!(
            err.to_string(),
            "Request failed with status 400: Bad Request"
        );
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        let err = RemoteError::from_response(
            422,
            "Unprocessable Entity",
            r#"{"detail":[{"msg":"field required"}]}"#,
        );
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ValidationError::OverlapOutOfRange { value: 1.0 }.into();
        assert!(err.is_validation_error());
        assert!(!err.is_remote_error());

        let err: Error = SessionError::Remote(RemoteError::Transport {
            reason: "connection refused".to_string(),
        })
        .into();
        assert!(err.is_remote_error());
    }
}
