//! Embedded dashboard shell for infractl.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page dashboard, which applies view patches by element id
//! - `/ui/*` JSON endpoints that read the view and forward user actions
//!
//! A background thread drives the recurring status poll; requests are
//! handled sequentially on the calling thread.
//!
//! Launched via `infractl serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use colored::Colorize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::poller::PollOutcome;
use crate::state::Dashboard;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard shell on the given address.
///
/// Blocks the current thread. A failing request gets a JSON error response;
/// it never takes the server down.
pub fn serve(dashboard: Arc<Dashboard>, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("infractl dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    let stop = Arc::new(AtomicBool::new(false));
    let poll_thread = spawn_poll_loop(Arc::clone(&dashboard), Arc::clone(&stop));

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for request in server.incoming_requests() {
        handle(&dashboard, request);
    }

    stop.store(true, Ordering::Relaxed);
    let _ = poll_thread.join();
    Ok(())
}

/// Run the recurring poll on its own thread until `stop` is set.
fn spawn_poll_loop(dashboard: Arc<Dashboard>, stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut was_ok = true;
        dashboard.run(&stop, |outcome| match outcome {
            PollOutcome::Updated { .. } => {
                if !was_ok {
                    println!("{} backend reachable again", "✓".green().bold());
                }
                was_ok = true;
            }
            PollOutcome::Failed { error, .. } => {
                if was_ok {
                    eprintln!("{} status poll failed: {}", "✗".red().bold(), error);
                }
                was_ok = false;
            }
            PollOutcome::Skipped => {}
        });
    })
}

fn handle(dashboard: &Dashboard, mut request: tiny_http::Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let body = if matches!(method, Method::Put | Method::Post | Method::Delete) {
        let mut buf = String::new();
        let _ = request.as_reader().read_to_string(&mut buf);
        Some(buf)
    } else {
        None
    };

    let response = match dispatch(dashboard, &method, &url, body.as_deref()) {
        Ok(resp) => resp,
        Err(e) => error_response(500, &format!("{e:#}")),
    };
    let _ = request.respond(response);

    // The shell fetches the view every second; only log actions.
    if !matches!(method, Method::Get) {
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch(
    dashboard: &Dashboard,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let path = url.split('?').next().unwrap_or(url);
    let body = body.unwrap_or("");

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // View
        (&Method::Get, "/ui/view") => api::get_view(dashboard),
        (&Method::Post, "/ui/refresh") => api::post_refresh(dashboard),
        (&Method::Post, "/ui/alerts/clear") => api::post_clear_alerts(dashboard),
        (&Method::Post, "/ui/visibility") => api::post_visibility(dashboard, body),
        (&Method::Post, "/ui/theme") => api::post_theme(dashboard),

        // Mutations
        (&Method::Post | &Method::Put | &Method::Delete, "/ui/domains") => {
            api::domains(dashboard, method, body)
        }
        (&Method::Post | &Method::Delete, "/ui/users") => api::users(dashboard, method, body),

        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let resp = Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_status_code(StatusCode(200));
    with_content_type(resp, "text/html; charset=utf-8")
}

/// `{"error": ...}` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    json_bytes(status, body.into_bytes())
}

/// A JSON body with the given status.
pub(crate) fn json_bytes(status: u16, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let resp = Response::from_data(body).with_status_code(StatusCode(status));
    with_content_type(resp, "application/json; charset=utf-8")
}

fn with_content_type(
    mut resp: Response<Cursor<Vec<u8>>>,
    value: &str,
) -> Response<Cursor<Vec<u8>>> {
    if let Ok(header) = Header::from_bytes("Content-Type", value) {
        resp.add_header(header);
    }
    resp
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::sync::Mutex;

    use super::*;
    use crate::api::{Backend, FetchError, MutationRequest};
    use crate::model::{Alert, Role, StatusSnapshot, Website};
    use crate::state::AppState;

    #[derive(Default)]
    struct FakeBackend {
        snapshot: StatusSnapshot,
        sent: Mutex<Vec<MutationRequest>>,
    }

    impl Backend for FakeBackend {
        fn fetch_status(&self) -> Result<StatusSnapshot, FetchError> {
            Ok(self.snapshot.clone())
        }

        fn send(&self, request: &MutationRequest) -> Result<(), FetchError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    fn dashboard(role: Role) -> (Arc<FakeBackend>, Dashboard) {
        let backend = Arc::new(FakeBackend {
            snapshot: StatusSnapshot {
                websites: Some(vec![Website {
                    domain: "example.com".to_string(),
                    ..Website::default()
                }]),
                alerts: Some(vec![Alert::new("Disk full")]),
                ..StatusSnapshot::default()
            },
            ..FakeBackend::default()
        });
        let mut state = AppState::default();
        state.session.role = role;
        let dash = Dashboard::new(backend.clone(), state);
        (backend, dash)
    }

    fn body_of(resp: Response<Cursor<Vec<u8>>>) -> (u16, serde_json::Value) {
        let status = resp.status_code().0;
        let mut raw = String::new();
        resp.into_reader().read_to_string(&mut raw).unwrap();
        (status, serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null))
    }

    #[test]
    fn index_is_served() {
        let (_, dash) = dashboard(Role::Admin);
        let resp = dispatch(&dash, &Method::Get, "/", None).unwrap();
        assert_eq!(resp.status_code().0, 200);
    }

    #[test]
    fn unknown_route_is_404() {
        let (_, dash) = dashboard(Role::Admin);
        let (status, json) = body_of(dispatch(&dash, &Method::Get, "/nope", None).unwrap());
        assert_eq!(status, 404);
        assert_eq!(json["error"], "not found");
    }

    #[test]
    fn refresh_then_view_carries_patches() {
        let (_, dash) = dashboard(Role::Admin);
        let (_, refreshed) =
            body_of(dispatch(&dash, &Method::Post, "/ui/refresh", Some("")).unwrap());
        assert_eq!(refreshed["success"], true);

        let (status, view) = body_of(dispatch(&dash, &Method::Get, "/ui/view?t=1", None).unwrap());
        assert_eq!(status, 200);
        assert_eq!(view["connection"], "healthy");
        assert_eq!(view["generation"], 1);
        let patches = view["patches"].as_array().unwrap();
        assert!(patches.iter().any(|p| p["target"] == "notification-count"));
    }

    #[test]
    fn clear_alerts_reports_count() {
        let (_, dash) = dashboard(Role::Admin);
        dash.poll_now();
        let (_, json) =
            body_of(dispatch(&dash, &Method::Post, "/ui/alerts/clear", Some("")).unwrap());
        assert_eq!(json["cleared"], 1);
    }

    #[test]
    fn domain_create_is_forwarded() {
        let (backend, dash) = dashboard(Role::Admin);
        let (status, json) = body_of(
            dispatch(
                &dash,
                &Method::Post,
                "/ui/domains",
                Some(r#"{"domain":"new.example.com"}"#),
            )
            .unwrap(),
        );
        assert_eq!(status, 200);
        assert_eq!(json["success"], true);

        let sent = backend.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, serde_json::json!({ "domain": "new.example.com" }));
    }

    #[test]
    fn viewer_cannot_mutate() {
        let (backend, dash) = dashboard(Role::Viewer);
        let (status, _) = body_of(
            dispatch(
                &dash,
                &Method::Delete,
                "/ui/domains",
                Some(r#"{"domain":"example.com"}"#),
            )
            .unwrap(),
        );
        assert_eq!(status, 403);
        assert!(backend.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_400() {
        let (_, dash) = dashboard(Role::Admin);
        let (status, _) =
            body_of(dispatch(&dash, &Method::Put, "/ui/domains", Some("{not json")).unwrap());
        assert_eq!(status, 400);
    }

    #[test]
    fn repeated_views_keep_the_banner_generation() {
        let (_, dash) = dashboard(Role::Admin);
        dash.poll_now();

        // Frames between polls carry the same generation, so the shell does
        // not re-show a banner its timer already hid.
        let (_, first) = body_of(dispatch(&dash, &Method::Get, "/ui/view", None).unwrap());
        let (_, second) = body_of(dispatch(&dash, &Method::Get, "/ui/view", None).unwrap());
        assert_eq!(first["generation"], second["generation"]);
        assert!(
            first["patches"]
                .as_array()
                .unwrap()
                .iter()
                .any(|p| p["target"] == "alert-banner" && p["op"] == "hide_after")
        );

        let hide_branch = frontend::INDEX_HTML
            .split("case 'hide_after':")
            .nth(1)
            .and_then(|rest| rest.split("break;").next())
            .unwrap();
        assert!(hide_branch.contains("el.style.display = 'none'"));
        assert!(!hide_branch.contains("applied.delete"));
    }
}
