//! Error types for the Digesto client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Digesto client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Missing, expired or rejected credentials (HTTP 401)
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session storage failed
    #[error("Session storage error: {0}")]
    SessionStore(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 401 {
            return Self::Unauthorized(message);
        }
        Self::ApiError { status, message }
    }

    /// HTTP status behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if the session must be discarded
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status >= 500)
    }

    /// Message shown to the user when an operation fails
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => "Your session has expired. Please log in again.".to_string(),
            Self::ApiError { status: 403, .. } => {
                "You do not have permission to perform this action.".to_string()
            }
            Self::ApiError { status: 404, .. } => "The requested record was not found.".to_string(),
            Self::ApiError {
                status: 409,
                message,
            } => format!("Conflict: {}", message),
            Self::ApiError { status, .. } if *status >= 500 => {
                "The server is unavailable. Please try again later.".to_string()
            }
            Self::ApiError { message, .. } => message.clone(),
            Self::RequestFailed(e) if e.is_connect() || e.is_timeout() => {
                "Could not connect to the server.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_becomes_unauthorized() {
        let err = ClientError::api_error(401, "token expired");
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ClientError::api_error(403, "denied").user_message(),
            "You do not have permission to perform this action."
        );
        assert_eq!(
            ClientError::api_error(409, "number already exists").user_message(),
            "Conflict: number already exists"
        );
        assert_eq!(
            ClientError::api_error(503, "down").user_message(),
            "The server is unavailable. Please try again later."
        );
        assert_eq!(
            ClientError::api_error(422, "title too long").user_message(),
            "title too long"
        );
        assert!(ClientError::api_error(404, "").is_not_found());
        assert!(ClientError::api_error(500, "").is_server_error());
    }
}
