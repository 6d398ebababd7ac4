//! Error taxonomy for booking API calls.
//!
//! A dead remote and an empty calendar are different answers. Each failure
//! mode gets its own variant; the agent layer turns them into text for the
//! LLM, which decides how to phrase the problem to the user.

use thiserror::Error;

/// A failed call to the booking API.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("booking API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-200 status.
    #[error("booking API returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    /// The body was not the JSON shape the API documents.
    #[error("malformed booking API response: {0}")]
    MalformedResponse(String),

    /// The caller's query can never succeed (e.g. empty id lists).
    #[error("invalid availability query: {0}")]
    InvalidQuery(String),
}

impl BookingError {
    /// Status code for `RemoteStatus` errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            BookingError::RemoteStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_display() {
        let err = BookingError::RemoteStatus {
            status: 503,
            body: "maintenance".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("maintenance"));
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_malformed_display() {
        let err = BookingError::MalformedResponse("missing field `data`".to_string());
        assert!(err.to_string().contains("missing field `data`"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_invalid_query_display() {
        let err = BookingError::InvalidQuery("services must not be empty".to_string());
        assert!(err.to_string().contains("services must not be empty"));
    }
}
