//! Dashboard application state.
//!
//! [`AppState`] gathers what the browser client kept in module globals
//! (dismissed alerts, theme, last update time, connection state) into one
//! value that the poll loop updates and the renderers read. [`Dashboard`]
//! wraps it together with the backend, poller and schedule for use across
//! the poll thread and the shell's request thread.

mod dashboard;

pub use dashboard::{Dashboard, ViewModel};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alerts::{DismissalSet, filter_active};
use crate::api::FetchError;
use crate::config::InfraConfig;
use crate::model::{Alert, Role, StatusSnapshot};
use crate::poller::Connection;
use crate::prefs::Theme;
use crate::render::{self, Patch, ViewContext};

/// Who is looking at the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            username: "Admin".to_string(),
            role: Role::Admin,
        }
    }
}

/// Mutable client state, owned by one [`Dashboard`].
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub dismissed: DismissalSet,
    pub theme: Theme,
    pub session: Session,
    pub cluster_members: Vec<String>,
    pub connection: Connection,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Number of snapshots applied so far.
    pub generation: u64,
    /// Latest good snapshot. Kept across failed polls so the view goes stale
    /// instead of blank.
    pub snapshot: Option<StatusSnapshot>,
}

impl AppState {
    pub fn from_config(config: &InfraConfig, theme: Theme) -> Self {
        Self {
            theme,
            session: Session {
                username: config.session.username.clone(),
                role: config.session.role,
            },
            cluster_members: config.dashboard.cluster_members.clone(),
            ..Self::default()
        }
    }

    /// Record a successful poll.
    pub fn apply_snapshot(&mut self, snapshot: StatusSnapshot, at: DateTime<Utc>) {
        self.snapshot = Some(snapshot);
        self.generation += 1;
        self.connection = Connection::Healthy;
        self.last_success = Some(at);
        self.last_error = None;
    }

    /// Record a failed poll. The previous snapshot stays on display.
    pub fn apply_failure(&mut self, error: &FetchError) {
        self.connection = Connection::Unhealthy;
        self.last_error = Some(error.to_string());
    }

    pub fn view_context(&self) -> ViewContext {
        let cluster_members = if self.cluster_members.is_empty() {
            ViewContext::default().cluster_members
        } else {
            self.cluster_members.clone()
        };
        ViewContext {
            role: self.session.role,
            cluster_members,
        }
    }

    /// Alerts currently shown in the notification list.
    pub fn active_alerts(&self) -> Vec<&Alert> {
        self.snapshot
            .as_ref()
            .and_then(|s| s.alerts.as_deref())
            .map(|alerts| filter_active(alerts, &self.dismissed))
            .unwrap_or_default()
    }

    /// Dismiss everything currently displayed. Returns the number of newly
    /// dismissed messages.
    pub fn clear_alerts(&mut self) -> usize {
        let displayed: Vec<Alert> = self.active_alerts().into_iter().cloned().collect();
        self.dismissed.clear(&displayed)
    }

    /// Patches for the latest snapshot; only session controls before the
    /// first successful poll.
    pub fn render(&self) -> Vec<Patch> {
        let ctx = self.view_context();
        match &self.snapshot {
            Some(snapshot) => render::render_snapshot(snapshot, &self.dismissed, &ctx),
            None => render::render_session(&ctx),
        }
    }
}
