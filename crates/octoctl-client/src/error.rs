//! Error types for the OctoPrint client

use thiserror::Error;

/// Errors that can occur when using the OctoPrint client
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response was received (connection refused, DNS failure, timeout, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status other than the one the operation expects
    #[error("Error: {status} - {body}")]
    Request {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response body is not JSON or lacks the expected field
    #[error("failed to read {operation} response: {reason}")]
    ResponseParse {
        /// Client operation that issued the request
        operation: &'static str,
        /// What was wrong with the body
        reason: String,
    },

    /// Arguments rejected before any request was sent
    #[error("invalid argument: {0}")]
    Validation(String),
}

impl ClientError {
    pub(crate) fn parse(operation: &'static str, reason: impl ToString) -> Self {
        ClientError::ResponseParse {
            operation,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing(operation: &'static str, path: &str) -> Self {
        ClientError::ResponseParse {
            operation,
            reason: format!("field '{path}' is missing or null"),
        }
    }

    /// Status code of the rejected request, if a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_message() {
        let err = ClientError::Request {
            status: 409,
            body: "Printer is not operational".to_string(),
        };
        assert_eq!(err.to_string(), "Error: 409 - Printer is not operational");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_parse_error_names_operation() {
        let err = ClientError::missing("get_bed_temp", "bed.actual");
        assert_eq!(
            err.to_string(),
            "failed to read get_bed_temp response: field 'bed.actual' is missing or null"
        );
        assert_eq!(err.status(), None);
    }
}
