//! Integration tests for the polling dashboard and the command client.
//!
//! A recording in-memory backend stands in for the InfraControl server so
//! the tests can script fetch results and inspect every mutation sent.

use std::collections::VecDeque;
use std::sync::{Arc, Barrier, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use infractl::api::{
    Backend, CommandClient, DomainCommand, FetchError, Method, MutationRequest,
    NETWORK_ERROR_MESSAGE, Refresh,
};
use infractl::events::{EventKind, EventLog};
use infractl::model::{Alert, StatusSnapshot, Website};
use infractl::poller::{Connection, PollOutcome, Schedule};
use infractl::prefs::{PrefsStore, Theme};
use infractl::render::PatchOp;
use infractl::state::{AppState, Dashboard};

// ---------------------------------------------------------------------------
// Recording backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingBackend {
    /// Scripted fetch results, consumed front to back. When empty, fetches
    /// return `fallback`.
    script: Mutex<VecDeque<Result<StatusSnapshot, FetchError>>>,
    fallback: StatusSnapshot,
    send_result: Mutex<Option<FetchError>>,
    fetches: Mutex<usize>,
    sent: Mutex<Vec<MutationRequest>>,
}

impl RecordingBackend {
    fn with_script(results: Vec<Result<StatusSnapshot, FetchError>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    fn failing_sends(error: FetchError) -> Self {
        Self {
            send_result: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    fn sent(&self) -> Vec<MutationRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Backend for RecordingBackend {
    fn fetch_status(&self) -> Result<StatusSnapshot, FetchError> {
        *self.fetches.lock().unwrap() += 1;
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn send(&self, request: &MutationRequest) -> Result<(), FetchError> {
        self.sent.lock().unwrap().push(request.clone());
        match self.send_result.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Holds its first fetch open until the test releases it; later fetches
/// return `after`.
struct GatedBackend {
    entered: Barrier,
    release: Barrier,
    after: StatusSnapshot,
    fetches: Mutex<usize>,
}

impl Backend for GatedBackend {
    fn fetch_status(&self) -> Result<StatusSnapshot, FetchError> {
        let first = {
            let mut fetches = self.fetches.lock().unwrap();
            *fetches += 1;
            *fetches == 1
        };
        if first {
            self.entered.wait();
            self.release.wait();
            return Ok(StatusSnapshot::default());
        }
        Ok(self.after.clone())
    }

    fn send(&self, _request: &MutationRequest) -> Result<(), FetchError> {
        Ok(())
    }
}

/// Counts refreshes instead of polling.
#[derive(Default)]
struct CountingRefresh(Mutex<usize>);

impl Refresh for CountingRefresh {
    fn refresh(&self) {
        *self.0.lock().unwrap() += 1;
    }
}

fn snapshot_with_alerts(msgs: &[&str]) -> StatusSnapshot {
    StatusSnapshot {
        alerts: Some(msgs.iter().map(|m| Alert::new(*m)).collect()),
        ..StatusSnapshot::default()
    }
}

fn dashboard(backend: Arc<RecordingBackend>) -> Dashboard {
    Dashboard::new(backend, AppState::default())
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[test]
fn failed_fetch_marks_unhealthy_and_polling_continues() {
    let backend = Arc::new(RecordingBackend::with_script(vec![
        Ok(snapshot_with_alerts(&["a"])),
        Err(FetchError::Network("connection refused".to_string())),
        Ok(snapshot_with_alerts(&["b"])),
    ]));
    let dash = dashboard(backend.clone()).with_schedule(Schedule::new(Duration::from_secs(3)));

    let start = Instant::now();
    assert!(dash.tick(start).is_some_and(|o| o.is_success()));
    assert_eq!(dash.with_state(|s| s.connection), Connection::Healthy);

    // Not due yet.
    assert!(dash.tick(start + Duration::from_secs(1)).is_none());

    let failed = dash.tick(start + Duration::from_secs(3)).unwrap();
    assert!(matches!(failed, PollOutcome::Failed { .. }));
    assert_eq!(dash.with_state(|s| s.connection), Connection::Unhealthy);
    // Last good data stays on screen.
    assert_eq!(
        dash.with_state(|s| s.active_alerts().iter().map(|a| a.msg.clone()).collect::<Vec<_>>()),
        vec!["a".to_string()]
    );

    // Same fixed interval after a failure, no backoff.
    assert!(dash.tick(start + Duration::from_secs(6)).unwrap().is_success());
    assert_eq!(dash.with_state(|s| s.connection), Connection::Healthy);
    assert_eq!(backend.fetch_count(), 3);
}

#[test]
fn decode_and_http_errors_are_failures_too() {
    let backend = Arc::new(RecordingBackend::with_script(vec![
        Err(FetchError::Decode("expected value at line 1".to_string())),
        Err(FetchError::Http {
            status: 500,
            message: "boom".to_string(),
        }),
    ]));
    let dash = dashboard(backend);

    assert!(!dash.poll_now().is_success());
    assert!(!dash.poll_now().is_success());
    let view = dash.view();
    assert_eq!(view.connection, Connection::Unhealthy);
    assert_eq!(view.last_update, "--");
    assert!(view.last_error.unwrap().contains("boom"));
}

#[test]
fn hidden_dashboard_stops_ticking_until_shown() {
    let backend = Arc::new(RecordingBackend::default());
    let dash = dashboard(backend.clone());

    assert!(dash.tick(Instant::now()).is_some());
    assert!(dash.set_visible(false).is_none());

    // Far past the interval, but paused.
    assert!(dash.tick(Instant::now() + Duration::from_secs(60)).is_none());
    assert_eq!(backend.fetch_count(), 1);

    // Shown again: immediate poll, timer restarted.
    assert!(dash.set_visible(true).is_some());
    assert_eq!(backend.fetch_count(), 2);
    assert!(dash.tick(Instant::now()).is_none());
}

#[test]
fn view_reports_relative_time_after_success() {
    let backend = Arc::new(RecordingBackend::default());
    let dash = dashboard(backend);

    assert_eq!(dash.view().last_update, "--");
    dash.poll_now();
    let view = dash.view();
    assert_eq!(view.last_update, "just now");
    assert_eq!(view.connection_label, "Connected");
    assert_eq!(view.generation, 1);
    assert_eq!(view.clock.len(), 8);
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[test]
fn cleared_alerts_stay_hidden_across_polls() {
    let backend = Arc::new(RecordingBackend {
        fallback: snapshot_with_alerts(&["Disk full", "Node down"]),
        ..RecordingBackend::default()
    });
    let dash = dashboard(backend.clone());
    dash.poll_now();

    assert_eq!(dash.clear_alerts(), 2);
    // Clearing refreshes once.
    assert_eq!(backend.fetch_count(), 2);

    let list = dash
        .view()
        .patches
        .into_iter()
        .find(|p| p.target == "notification-list")
        .unwrap();
    match list.op {
        PatchOp::Html { html } => assert!(html.contains("No active alerts")),
        other => panic!("unexpected op {other:?}"),
    }

    // Clearing again changes nothing.
    assert_eq!(dash.clear_alerts(), 0);
}

#[test]
fn dismissals_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::at(dir.path().join("events.jsonl"));
    let backend = Arc::new(RecordingBackend {
        fallback: snapshot_with_alerts(&["x"]),
        ..RecordingBackend::default()
    });
    let dash = dashboard(backend).with_event_log(log.clone());

    dash.poll_now();
    dash.clear_alerts();

    let kinds: Vec<EventKind> = log.read_all().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Poll, EventKind::Dismiss, EventKind::Poll]
    );
}

// ---------------------------------------------------------------------------
// Domain commands
// ---------------------------------------------------------------------------

#[test]
fn create_sends_post_and_refreshes_once() {
    let backend = Arc::new(RecordingBackend::default());
    let dash = dashboard(backend.clone());

    let outcome = dash.commands().create("example.com");
    assert!(outcome.success);

    let sent = backend.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].path, "/api/domains");
    assert_eq!(sent[0].body, serde_json::json!({ "domain": "example.com" }));
    assert_eq!(backend.fetch_count(), 1);
}

#[test]
fn rename_sends_put_with_both_names() {
    let backend = Arc::new(RecordingBackend::default());
    let refresh = CountingRefresh::default();
    let client = CommandClient::new(backend.as_ref(), &refresh);

    assert!(client.rename("a.com", "b.com").success);

    let sent = backend.sent();
    assert_eq!(sent[0].method, Method::Put);
    assert_eq!(
        sent[0].body,
        serde_json::json!({ "old_name": "a.com", "new_name": "b.com" })
    );
    assert_eq!(*refresh.0.lock().unwrap(), 1);
}

#[test]
fn delete_sends_delete() {
    let backend = Arc::new(RecordingBackend::default());
    let refresh = CountingRefresh::default();
    let client = CommandClient::new(backend.as_ref(), &refresh);

    assert!(client.delete("gone.com").success);
    let sent = backend.sent();
    assert_eq!(sent[0].method, Method::Delete);
    assert_eq!(sent[0].body, serde_json::json!({ "domain": "gone.com" }));
}

#[test]
fn backend_rejection_surfaces_message_without_refresh() {
    let backend = Arc::new(RecordingBackend::failing_sends(FetchError::Http {
        status: 400,
        message: "Domain already exists".to_string(),
    }));
    let refresh = CountingRefresh::default();
    let client = CommandClient::new(backend.as_ref(), &refresh);

    let outcome = client.create("dup.com");
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Domain already exists"));
    assert_eq!(*refresh.0.lock().unwrap(), 0);
    // No retries.
    assert_eq!(backend.sent().len(), 1);
}

#[test]
fn network_failure_is_generic() {
    let backend = Arc::new(RecordingBackend::failing_sends(FetchError::Network(
        "connection refused".to_string(),
    )));
    let dash = dashboard(backend.clone());

    let outcome = dash.run_domain(&DomainCommand::Delete {
        domain: "x.com".to_string(),
    });
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some(NETWORK_ERROR_MESSAGE));
    assert_eq!(backend.fetch_count(), 0);
}

#[test]
fn new_domain_shows_up_after_refresh() {
    let after = StatusSnapshot {
        websites: Some(vec![Website {
            domain: "example.com".to_string(),
            ..Website::default()
        }]),
        ..StatusSnapshot::default()
    };
    let backend = Arc::new(RecordingBackend::with_script(vec![
        Ok(StatusSnapshot::default()),
        Ok(after),
    ]));
    let dash = dashboard(backend);
    dash.poll_now();

    assert!(dash.commands().create("example.com").success);
    let has_domain = dash.with_state(|s| {
        s.snapshot
            .as_ref()
            .and_then(|snap| snap.websites.as_ref())
            .is_some_and(|sites| sites.iter().any(|w| w.domain == "example.com"))
    });
    assert!(has_domain);
    assert!(dash.with_state(|s| s.last_success).unwrap() <= Utc::now());
}

#[test]
fn mutation_during_scheduled_poll_still_refreshes() {
    let backend = Arc::new(GatedBackend {
        entered: Barrier::new(2),
        release: Barrier::new(2),
        after: StatusSnapshot {
            websites: Some(vec![Website {
                domain: "late.com".to_string(),
                ..Website::default()
            }]),
            ..StatusSnapshot::default()
        },
        fetches: Mutex::new(0),
    });
    let dash = Arc::new(Dashboard::new(backend.clone(), AppState::default()));

    let scheduled = {
        let dash = Arc::clone(&dash);
        std::thread::spawn(move || dash.poll_now())
    };
    backend.entered.wait();

    let mutation = {
        let dash = Arc::clone(&dash);
        std::thread::spawn(move || dash.commands().create("late.com"))
    };
    std::thread::sleep(Duration::from_millis(50));
    backend.release.wait();

    assert!(scheduled.join().unwrap().is_success());
    assert!(mutation.join().unwrap().success);

    // The refresh waited for the scheduled poll and then fetched again.
    assert_eq!(*backend.fetches.lock().unwrap(), 2);
    assert_eq!(dash.with_state(|s| s.generation), 2);
    let has_domain = dash.with_state(|s| {
        s.snapshot
            .as_ref()
            .and_then(|snap| snap.websites.as_ref())
            .is_some_and(|sites| sites.iter().any(|w| w.domain == "late.com"))
    });
    assert!(has_domain);
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[test]
fn theme_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = PrefsStore::at(dir.path().join("prefs.json"));
    let dash = dashboard(Arc::new(RecordingBackend::default())).with_prefs(store.clone());

    assert_eq!(dash.toggle_theme().unwrap(), Theme::Light);
    assert_eq!(store.load().theme, Theme::Light);
    assert_eq!(dash.view().theme, Theme::Light);

    assert_eq!(dash.toggle_theme().unwrap(), Theme::Dark);
    assert_eq!(store.load().theme, Theme::Dark);
}
