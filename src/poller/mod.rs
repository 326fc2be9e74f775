//! Status polling.
//!
//! [`Poller`] performs one guarded `GET /api/status`: a second poll started
//! while one is still in flight is skipped instead of racing it, unless the
//! caller asks to wait its turn with [`Poller::poll_after_in_flight`].
//! [`Schedule`] decides when the next recurring poll is due; it can be
//! paused while the dashboard is hidden and resumed with an immediate poll.
//!
//! Failures never stop the schedule. The next tick simply tries again on the
//! same fixed interval.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::{Backend, FetchError};
use crate::model::StatusSnapshot;

/// Fixed interval between recurring polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Below this age the last update is shown as "just now".
const JUST_NOW_SECS: i64 = 5;

// ---------------------------------------------------------------------------
// Connection state
// ---------------------------------------------------------------------------

/// Connectivity to the backend as of the last completed poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    /// No poll has completed yet.
    #[default]
    Connecting,
    Healthy,
    Unhealthy,
}

impl Connection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Healthy => "Connected",
            Self::Unhealthy => "Disconnected",
        }
    }
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Result of one poll attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Updated {
        snapshot: StatusSnapshot,
        latency: Duration,
    },
    Failed {
        error: FetchError,
        latency: Duration,
    },
    /// Another poll was already in flight.
    Skipped,
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Single-flight status fetcher.
#[derive(Debug, Default)]
pub struct Poller {
    in_flight: Mutex<bool>,
    idle: Condvar,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        *self.flag()
    }

    /// Fetch one snapshot unless a fetch is already running.
    pub fn poll(&self, backend: &dyn Backend) -> PollOutcome {
        let mut in_flight = self.flag();
        if *in_flight {
            return PollOutcome::Skipped;
        }
        *in_flight = true;
        drop(in_flight);

        self.fetch(backend)
    }

    /// Wait for a running fetch to finish, then fetch again. Never skipped.
    pub fn poll_after_in_flight(&self, backend: &dyn Backend) -> PollOutcome {
        let mut in_flight = self.flag();
        while *in_flight {
            in_flight = self
                .idle
                .wait(in_flight)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *in_flight = true;
        drop(in_flight);

        self.fetch(backend)
    }

    /// Caller has already set the flag; the guard clears it.
    fn fetch(&self, backend: &dyn Backend) -> PollOutcome {
        let _guard = InFlight(self);

        let start = Instant::now();
        let result = backend.fetch_status();
        let latency = start.elapsed();

        match result {
            Ok(snapshot) => PollOutcome::Updated { snapshot, latency },
            Err(error) => PollOutcome::Failed { error, latency },
        }
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag when dropped, including on panic, and wakes
/// callers waiting their turn.
struct InFlight<'a>(&'a Poller);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0.flag() = false;
        self.0.idle.notify_all();
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Recurring poll timer.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    /// `None` means "due now".
    next_due: Option<Instant>,
    paused: bool,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl Schedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            paused: false,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        !self.paused && self.next_due.is_none_or(|due| now >= due)
    }

    /// Record that a tick fired at `now` and arm the next one.
    pub fn mark_fired(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Time until the next tick, `None` while paused.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.paused {
            return None;
        }
        Some(
            self.next_due
                .map_or(Duration::ZERO, |due| due.saturating_duration_since(now)),
        )
    }

    /// Stop the recurring timer (dashboard hidden).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Restart the timer with an immediate tick (dashboard shown again).
    pub fn resume(&mut self) {
        self.paused = false;
        self.next_due = None;
    }
}

// ---------------------------------------------------------------------------
// Relative time
// ---------------------------------------------------------------------------

/// "Last updated" text: `just now` under five seconds, else `{n}s`.
/// `--` when nothing has been fetched yet.
pub fn relative_time(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last) = last else {
        return "--".to_string();
    };
    let secs = (now - last).num_seconds().max(0);
    if secs < JUST_NOW_SECS {
        "just now".to_string()
    } else {
        format!("{secs}s")
    }
}
