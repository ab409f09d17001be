//! Error handling
//!
//! Typed errors for talking to the notes service and for validating the
//! add form before anything is sent.

use thiserror::Error;

/// Errors that can occur while talking to the notes service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Base URL could not be used to build endpoints
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request never produced a response (DNS, connect, TLS, reset...)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Collection name or document id has no URL path form
    #[error("'{segment}' cannot be used as a collection name or document id")]
    InvalidPathSegment { segment: String },

    /// Response body was not the expected JSON
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Check if the request failed before a response arrived
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    /// HTTP status of the response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidBaseUrl { .. } => {
                Some("Set a valid server address with: vault config set base_url http://host:port")
            }
            ApiError::Transport { .. } => {
                Some("Check that the notes server is running and reachable.")
            }
            ApiError::Status { status, .. } if *status == 404 => {
                Some("The collection or document may not exist, or documents_route may be wrong.")
            }
            _ => None,
        }
    }
}

/// Local validation failures for the add form
///
/// These are detected before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a collection first")]
    NoCollection,

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Content cannot be empty")]
    EmptyContent,
}

/// Result type for notes service operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            url: "http://localhost:8080/documents/notes".to_string(),
            status: 500,
            body: "boom".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("/documents/notes"));
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_not_found_has_suggestion() {
        let err = ApiError::Status {
            url: "http://localhost:8080/get/notes".to_string(),
            status: 404,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().is_some());

        let err = ApiError::Status {
            url: "http://localhost:8080/get/notes".to_string(),
            status: 500,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_invalid_base_url_display() {
        let err = ApiError::InvalidBaseUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::NoCollection.to_string(),
            "Select a collection first"
        );
        assert_eq!(ValidationError::EmptyTitle.to_string(), "Title cannot be empty");
        assert_eq!(
            ValidationError::EmptyContent.to_string(),
            "Content cannot be empty"
        );
    }
}
