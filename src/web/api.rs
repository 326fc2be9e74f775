//! JSON handlers for the dashboard shell.
//!
//! Each handler corresponds to a `/ui/*` endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Mutations are forwarded
//! to the backend through the dashboard's command client.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Method, Response};

use crate::api::{CommandOutcome, DomainCommand, UserCommand};
use crate::poller::PollOutcome;
use crate::prefs::Theme;
use crate::state::Dashboard;

use super::{error_response, json_bytes};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VisibilityRequest {
    hidden: bool,
}

/// Body of `/ui/domains`. Which fields are required depends on the method.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DomainRequest {
    domain: Option<String>,
    old_name: Option<String>,
    new_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserRequest {
    username: Option<String>,
    role: Option<String>,
}

#[derive(Serialize)]
struct RefreshResponse {
    success: bool,
    skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct ClearResponse {
    success: bool,
    cleared: usize,
}

#[derive(Serialize)]
struct VisibilityResponse {
    visible: bool,
    polled: bool,
}

#[derive(Serialize)]
struct ThemeResponse {
    theme: Theme,
}

/// Role given to users added without one.
const DEFAULT_USER_ROLE: &str = "Viewer";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_vec(data).context("failed to serialize JSON response")?;
    Ok(json_bytes(200, body))
}

/// 200 on success, 502 when the backend refused or was unreachable.
fn outcome_response(outcome: &CommandOutcome) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_vec(outcome).context("failed to serialize command outcome")?;
    let status = if outcome.success { 200 } else { 502 };
    Ok(json_bytes(status, body))
}

fn parse_body<'a, T: Deserialize<'a> + Default>(body: &'a str) -> Result<T, String> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body).map_err(|e| format!("invalid JSON body: {e}"))
}

/// Trimmed, non-empty value of a required field.
fn required(value: Option<String>, field: &str) -> Result<String, String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing field `{field}`"))
}

fn domain_command(method: &Method, body: &str) -> Result<DomainCommand, String> {
    let req: DomainRequest = parse_body(body)?;
    match method {
        Method::Post => Ok(DomainCommand::Create {
            domain: required(req.domain, "domain")?,
        }),
        Method::Put => Ok(DomainCommand::Rename {
            old_name: required(req.old_name, "old_name")?,
            new_name: required(req.new_name, "new_name")?,
        }),
        Method::Delete => Ok(DomainCommand::Delete {
            domain: required(req.domain, "domain")?,
        }),
        other => Err(format!("unsupported method {other}")),
    }
}

fn user_command(method: &Method, body: &str) -> Result<UserCommand, String> {
    let req: UserRequest = parse_body(body)?;
    match method {
        Method::Post => Ok(UserCommand::Create {
            username: required(req.username, "username")?,
            role: req
                .role
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_ROLE.to_string()),
        }),
        Method::Delete => Ok(UserCommand::Delete {
            username: required(req.username, "username")?,
        }),
        other => Err(format!("unsupported method {other}")),
    }
}

fn is_admin(dashboard: &Dashboard) -> bool {
    dashboard.with_state(|state| state.session.role.is_admin())
}

// ---------------------------------------------------------------------------
// View handlers
// ---------------------------------------------------------------------------

/// `GET /ui/view`: patches plus header state for the next frame.
pub fn get_view(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&dashboard.view())
}

/// `POST /ui/refresh`: poll now.
pub fn post_refresh(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    let resp = match dashboard.poll_now() {
        PollOutcome::Updated { .. } => RefreshResponse {
            success: true,
            skipped: false,
            message: None,
        },
        PollOutcome::Failed { error, .. } => RefreshResponse {
            success: false,
            skipped: false,
            message: Some(error.to_string()),
        },
        PollOutcome::Skipped => RefreshResponse {
            success: false,
            skipped: true,
            message: Some("a status poll is already in flight".to_string()),
        },
    };
    json_response(&resp)
}

/// `POST /ui/alerts/clear`: dismiss the displayed alerts.
pub fn post_clear_alerts(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    let cleared = dashboard.clear_alerts();
    json_response(&ClearResponse {
        success: true,
        cleared,
    })
}

/// `POST /ui/visibility`: `{"hidden": bool}` from the page visibility API.
pub fn post_visibility(dashboard: &Dashboard, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: VisibilityRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(error_response(400, &format!("invalid JSON body: {e}"))),
    };
    let visible = !req.hidden;
    let polled = dashboard.set_visible(visible).is_some();
    json_response(&VisibilityResponse { visible, polled })
}

/// `POST /ui/theme`: flip dark/light and persist.
pub fn post_theme(dashboard: &Dashboard) -> Result<Response<Cursor<Vec<u8>>>> {
    let theme = dashboard.toggle_theme()?;
    json_response(&ThemeResponse { theme })
}

// ---------------------------------------------------------------------------
// Mutation handlers
// ---------------------------------------------------------------------------

/// `POST|PUT|DELETE /ui/domains`: create, rename, delete.
pub fn domains(
    dashboard: &Dashboard,
    method: &Method,
    body: &str,
) -> Result<Response<Cursor<Vec<u8>>>> {
    if !is_admin(dashboard) {
        return Ok(error_response(403, "viewer sessions cannot manage domains"));
    }
    match domain_command(method, body) {
        Ok(command) => outcome_response(&dashboard.run_domain(&command)),
        Err(message) => Ok(error_response(400, &message)),
    }
}

/// `POST|DELETE /ui/users`: add or remove a user.
pub fn users(
    dashboard: &Dashboard,
    method: &Method,
    body: &str,
) -> Result<Response<Cursor<Vec<u8>>>> {
    if !is_admin(dashboard) {
        return Ok(error_response(403, "viewer sessions cannot manage users"));
    }
    match user_command(method, body) {
        Ok(command) => outcome_response(&dashboard.run_user(&command)),
        Err(message) => Ok(error_response(400, &message)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_maps_to_create() {
        let cmd = domain_command(&Method::Post, r#"{"domain":" example.com "}"#).unwrap();
        assert_eq!(
            cmd,
            DomainCommand::Create {
                domain: "example.com".to_string()
            }
        );
    }

    #[test]
    fn put_requires_both_names() {
        let cmd = domain_command(&Method::Put, r#"{"old_name":"a.com","new_name":"b.com"}"#)
            .unwrap();
        assert_eq!(
            cmd,
            DomainCommand::Rename {
                old_name: "a.com".to_string(),
                new_name: "b.com".to_string()
            }
        );

        let err = domain_command(&Method::Put, r#"{"old_name":"a.com"}"#).unwrap_err();
        assert!(err.contains("new_name"));
    }

    #[test]
    fn empty_domain_is_rejected() {
        assert!(domain_command(&Method::Post, r#"{"domain":"   "}"#).is_err());
        assert!(domain_command(&Method::Delete, "").is_err());
    }

    #[test]
    fn user_role_defaults_to_viewer() {
        let cmd = user_command(&Method::Post, r#"{"username":"ops"}"#).unwrap();
        assert_eq!(
            cmd,
            UserCommand::Create {
                username: "ops".to_string(),
                role: "Viewer".to_string()
            }
        );
    }

    #[test]
    fn unsupported_method_is_rejected() {
        assert!(user_command(&Method::Put, r#"{"username":"ops"}"#).is_err());
    }

    #[test]
    fn refresh_response_omits_empty_message() {
        let json = serde_json::to_string(&RefreshResponse {
            success: true,
            skipped: false,
            message: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"success":true,"skipped":false}"#);
    }
}
