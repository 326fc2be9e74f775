//! Domain and user mutations.
//!
//! Each operation is a single JSON request. On success the client asks its
//! [`Refresh`] target for exactly one status refresh; on failure it returns a
//! [`CommandOutcome`] carrying a message fit for display. There are no
//! retries: a retried create may duplicate state on the backend.

use serde::Serialize;
use serde_json::json;

use super::{Backend, FetchError, Method, MutationRequest};

const DOMAINS_PATH: &str = "/api/domains";
const USERS_PATH: &str = "/api/users";

/// Message shown when the backend could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Mutations of the backend's `domains` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainCommand {
    Create { domain: String },
    Rename { old_name: String, new_name: String },
    Delete { domain: String },
}

impl DomainCommand {
    pub fn request(&self) -> MutationRequest {
        let (method, body) = match self {
            Self::Create { domain } => (Method::Post, json!({ "domain": domain })),
            Self::Rename { old_name, new_name } => (
                Method::Put,
                json!({ "old_name": old_name, "new_name": new_name }),
            ),
            Self::Delete { domain } => (Method::Delete, json!({ "domain": domain })),
        };
        MutationRequest {
            method,
            path: DOMAINS_PATH,
            body,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Create { domain } => format!("create domain {domain}"),
            Self::Rename { old_name, new_name } => {
                format!("rename domain {old_name} -> {new_name}")
            }
            Self::Delete { domain } => format!("delete domain {domain}"),
        }
    }
}

/// Mutations of the backend's user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Create { username: String, role: String },
    Delete { username: String },
}

impl UserCommand {
    pub fn request(&self) -> MutationRequest {
        let (method, body) = match self {
            Self::Create { username, role } => {
                (Method::Post, json!({ "username": username, "role": role }))
            }
            Self::Delete { username } => (Method::Delete, json!({ "username": username })),
        };
        MutationRequest {
            method,
            path: USERS_PATH,
            body,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Create { username, role } => format!("create user {username} ({role})"),
            Self::Delete { username } => format!("delete user {username}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a mutation as surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl From<&FetchError> for CommandOutcome {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Http { message, .. } => Self::failed(message.clone()),
            FetchError::Network(_) => Self::failed(NETWORK_ERROR_MESSAGE),
            FetchError::Decode(detail) => Self::failed(detail.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Something that can re-poll the status endpoint on demand.
pub trait Refresh {
    fn refresh(&self);
}

/// Issues domain/user mutations and refreshes on success.
pub struct CommandClient<'a> {
    backend: &'a dyn Backend,
    refresher: &'a dyn Refresh,
}

impl<'a> CommandClient<'a> {
    pub fn new(backend: &'a dyn Backend, refresher: &'a dyn Refresh) -> Self {
        Self { backend, refresher }
    }

    /// `POST /api/domains {"domain": ...}`
    pub fn create(&self, domain: &str) -> CommandOutcome {
        self.run_domain(&DomainCommand::Create {
            domain: domain.to_string(),
        })
    }

    /// `PUT /api/domains {"old_name": ..., "new_name": ...}`
    pub fn rename(&self, old_name: &str, new_name: &str) -> CommandOutcome {
        self.run_domain(&DomainCommand::Rename {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
    }

    /// `DELETE /api/domains {"domain": ...}`
    pub fn delete(&self, domain: &str) -> CommandOutcome {
        self.run_domain(&DomainCommand::Delete {
            domain: domain.to_string(),
        })
    }

    pub fn run_domain(&self, command: &DomainCommand) -> CommandOutcome {
        self.execute(&command.request())
    }

    pub fn run_user(&self, command: &UserCommand) -> CommandOutcome {
        self.execute(&command.request())
    }

    fn execute(&self, request: &MutationRequest) -> CommandOutcome {
        match self.backend.send(request) {
            Ok(()) => {
                self.refresher.refresh();
                CommandOutcome::ok()
            }
            Err(err) => CommandOutcome::from(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_shape() {
        let req = DomainCommand::Create {
            domain: "example.com".to_string(),
        }
        .request();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/api/domains");
        assert_eq!(req.body.to_string(), r#"{"domain":"example.com"}"#);
    }

    #[test]
    fn rename_request_shape() {
        let req = DomainCommand::Rename {
            old_name: "a.com".to_string(),
            new_name: "b.com".to_string(),
        }
        .request();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.body["old_name"], "a.com");
        assert_eq!(req.body["new_name"], "b.com");
    }

    #[test]
    fn user_delete_request_shape() {
        let req = UserCommand::Delete {
            username: "ops".to_string(),
        }
        .request();
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "/api/users");
        assert_eq!(req.body.to_string(), r#"{"username":"ops"}"#);
    }

    #[test]
    fn outcome_from_errors() {
        let http = FetchError::Http {
            status: 409,
            message: "already exists".to_string(),
        };
        assert_eq!(
            CommandOutcome::from(&http),
            CommandOutcome::failed("already exists")
        );

        let net = FetchError::Network("connection refused".to_string());
        assert_eq!(
            CommandOutcome::from(&net).message.as_deref(),
            Some(NETWORK_ERROR_MESSAGE)
        );
    }

    #[test]
    fn ok_outcome_omits_message() {
        let json = serde_json::to_string(&CommandOutcome::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
