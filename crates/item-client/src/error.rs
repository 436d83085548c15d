//! Error types for the item client.

use thiserror::Error;

/// Failure derived from an HTTP error status (4xx or 5xx).
///
/// These are the only failures the response classifier produces on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedFailure {
    /// Server returned 401 Unauthorized.
    #[error("{message}")]
    Unauthorized {
        /// Error body text, or the canned message when the body was empty.
        message: String,
    },

    /// Server returned any other 4xx/5xx status.
    #[error("unexpected status code {status} : {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Error body text, or the canned message when the body was empty.
        message: String,
    },
}

impl ClassifiedFailure {
    /// HTTP status code that produced this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::UnexpectedStatus { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message } | Self::UnexpectedStatus { message, .. } => message,
        }
    }
}

/// Errors from classifying a single response.
///
/// `E` is the body read error of the underlying transport. It only surfaces
/// when reading a success body fails; error bodies never produce it.
#[derive(Error, Debug)]
pub enum ClassifyError<E> {
    /// Response carried an error status.
    #[error(transparent)]
    Status(#[from] ClassifiedFailure),

    /// Reading the success body failed.
    #[error("Body read failed: {0}")]
    Body(#[source] E),
}

/// Errors that can occur when using the item client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server answered with an error status.
    #[error(transparent)]
    Status(#[from] ClassifiedFailure),

    /// Transport failure (connection, timeout, body stream), passed through unchanged.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    pub fn failure(&self) -> Option<&ClassifiedFailure> {
        match self {
            Self::Status(failure) => Some(failure),
            Self::Request(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status(ClassifiedFailure::Unauthorized { .. }))
    }
}

impl From<ClassifyError<reqwest::Error>> for ClientError {
    fn from(error: ClassifyError<reqwest::Error>) -> Self {
        match error {
            ClassifyError::Status(failure) => Self::Status(failure),
            ClassifyError::Body(e) => Self::Request(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let failure =
            ClassifiedFailure::UnexpectedStatus { status: 503, message: "maintenance".to_string() };

        assert_eq!(failure.to_string(), "unexpected status code 503 : maintenance");
        assert_eq!(failure.status(), 503);
        assert_eq!(failure.message(), "maintenance");
    }

    #[test]
    fn test_unauthorized_display_is_message() {
        let failure = ClassifiedFailure::Unauthorized { message: "token expired".to_string() };

        assert_eq!(failure.to_string(), "token expired");
        assert_eq!(failure.status(), 401);
    }

    #[test]
    fn test_client_error_accessors() {
        let err = ClientError::from(ClassifiedFailure::Unauthorized { message: "no".to_string() });
        assert!(err.is_unauthorized());
        assert_eq!(err.failure().map(ClassifiedFailure::status), Some(401));

        let err = ClientError::from(ClassifiedFailure::UnexpectedStatus {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(!err.is_unauthorized());
        assert_eq!(err.to_string(), "unexpected status code 500 : boom");
    }
}
