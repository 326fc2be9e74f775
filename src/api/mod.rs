//! Backend access for the dashboard.
//!
//! [`Backend`] is the seam between the dashboard core and the network:
//! [`http::HttpBackend`] talks to a live InfraControl server over `ureq`,
//! tests substitute an in-memory implementation.

pub mod commands;
pub mod http;

use serde::Serialize;
use thiserror::Error;

use crate::model::StatusSnapshot;

pub use commands::{
    CommandClient, CommandOutcome, DomainCommand, NETWORK_ERROR_MESSAGE, Refresh, UserCommand,
};
pub use http::HttpBackend;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, reset.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}: {message}")]
    Http { status: u16, message: String },
    /// The body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Mutation requests
// ---------------------------------------------------------------------------

/// HTTP verbs used by mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single JSON mutation against the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationRequest {
    pub method: Method,
    /// Path relative to the backend base URL, e.g. `/api/domains`.
    pub path: &'static str,
    pub body: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Everything the dashboard needs from the InfraControl server.
pub trait Backend: Send + Sync {
    /// `GET /api/status`.
    fn fetch_status(&self) -> Result<StatusSnapshot, FetchError>;

    /// Send one mutation. `Ok` means the backend answered 2xx.
    fn send(&self, request: &MutationRequest) -> Result<(), FetchError>;
}

/// Pull a human-readable message out of a JSON error body.
///
/// Looks at `message` first, then `error`. Returns `None` for non-JSON
/// bodies or bodies without either key.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
        .filter(|msg| !msg.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_key() {
        assert_eq!(
            error_message(r#"{"message": "domain exists", "error": "x"}"#),
            Some("domain exists".to_string())
        );
        assert_eq!(
            error_message(r#"{"error": "bad request"}"#),
            Some("bad request".to_string())
        );
    }

    #[test]
    fn error_message_ignores_garbage() {
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(r#"{"status": "fail"}"#), None);
        assert_eq!(error_message(r#"{"message": ""}"#), None);
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Method::Delete).unwrap(), "\"DELETE\"");
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
