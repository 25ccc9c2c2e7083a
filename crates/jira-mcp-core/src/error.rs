//! Error types for jira-mcp.

use thiserror::Error;

/// Main error type for tracker operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// Credentials were rejected (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials lack permission (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an unexpected client error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API returned a 5xx response
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map an HTTP status code and response body to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            500..=599 => Error::ServerError { status, message },
            _ => Error::Api { status, message },
        }
    }
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            Error::from_status(401, "no".into()),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            Error::from_status(403, "no".into()),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            Error::from_status(404, "missing".into()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from_status(502, "bad gateway".into()),
            Error::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            Error::from_status(400, "bad".into()),
            Error::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_display() {
        let err = Error::from_status(404, "Issue does not exist".into());
        assert_eq!(err.to_string(), "Not found: Issue does not exist");

        let err = Error::Api {
            status: 400,
            message: "bad jql".into(),
        };
        assert_eq!(err.to_string(), "API error: 400 - bad jql");
    }
}
