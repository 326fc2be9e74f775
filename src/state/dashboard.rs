use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, Utc};
use serde::Serialize;

use crate::api::{
    Backend, CommandClient, CommandOutcome, DomainCommand, HttpBackend, Refresh, UserCommand,
};
use crate::config::InfraConfig;
use crate::events::EventLog;
use crate::poller::{Connection, PollOutcome, Poller, Schedule, relative_time};
use crate::prefs::{Prefs, PrefsStore, Theme};
use crate::render::Patch;

use super::{AppState, Session};

/// Longest the poll loop sleeps between checks, so the relative-time
/// display and shutdown flag are looked at every second.
const LOOP_GRANULARITY: Duration = Duration::from_secs(1);

/// Everything the shell needs to paint one frame.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    /// Bumped on every applied snapshot; the shell re-applies one-shot
    /// patches (banner timer) only when it changes.
    pub generation: u64,
    pub patches: Vec<Patch>,
    pub connection: Connection,
    pub connection_label: &'static str,
    pub last_update: String,
    pub last_error: Option<String>,
    /// Wall clock, `HH:MM:SS`.
    pub clock: String,
    pub theme: Theme,
    pub session: Session,
}

/// Shared dashboard: backend, guarded poller, schedule and state.
///
/// Cheap to share behind an [`Arc`]; every method takes `&self`.
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    poller: Poller,
    schedule: Mutex<Schedule>,
    state: Mutex<AppState>,
    events: EventLog,
    prefs: PrefsStore,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>, state: AppState) -> Self {
        Self {
            backend,
            poller: Poller::new(),
            schedule: Mutex::new(Schedule::default()),
            state: Mutex::new(state),
            events: EventLog::disabled(),
            prefs: PrefsStore::in_memory(),
        }
    }

    /// Dashboard against the configured backend, with the event log and
    /// preferences at their configured locations.
    pub fn from_config(config: &InfraConfig) -> Self {
        let prefs = PrefsStore::default_location();
        let state = AppState::from_config(config, prefs.load().theme);
        Self::new(Arc::new(HttpBackend::from_config(&config.backend)), state)
            .with_event_log(EventLog::from_config(&config.logging))
            .with_prefs(prefs)
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn with_prefs(mut self, prefs: PrefsStore) -> Self {
        self.prefs = prefs;
        self
    }

    pub fn with_schedule(self, schedule: Schedule) -> Self {
        *lock(&self.schedule) = schedule;
        self
    }

    /// Run `f` against the current state.
    pub fn with_state<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        f(&lock(&self.state))
    }

    // -----------------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------------

    /// Poll right now (initial load, post-mutation, manual refresh).
    ///
    /// The state lock is not held during the request, so the shell keeps
    /// answering while a slow poll is outstanding.
    pub fn poll_now(&self) -> PollOutcome {
        self.record(self.poller.poll(self.backend.as_ref()))
    }

    /// Log a poll result and fold it into the state.
    fn record(&self, outcome: PollOutcome) -> PollOutcome {
        match &outcome {
            PollOutcome::Updated { snapshot, latency } => {
                self.events
                    .poll(true, &summarize(snapshot), latency.as_millis() as u64);
                lock(&self.state).apply_snapshot(snapshot.clone(), Utc::now());
            }
            PollOutcome::Failed { error, latency } => {
                self.events
                    .poll(false, &error.to_string(), latency.as_millis() as u64);
                lock(&self.state).apply_failure(error);
            }
            PollOutcome::Skipped => {}
        }

        outcome
    }

    /// Poll if the recurring timer is due at `now`.
    pub fn tick(&self, now: Instant) -> Option<PollOutcome> {
        {
            let mut schedule = lock(&self.schedule);
            if !schedule.is_due(now) {
                return None;
            }
            schedule.mark_fired(now);
        }
        Some(self.poll_now())
    }

    /// Visibility change from the shell. Hidden pauses the timer; shown
    /// restarts it with an immediate poll.
    pub fn set_visible(&self, visible: bool) -> Option<PollOutcome> {
        if visible {
            lock(&self.schedule).resume();
            self.tick(Instant::now())
        } else {
            lock(&self.schedule).pause();
            None
        }
    }

    /// Drive the schedule until `stop` is set. Never returns early on
    /// errors; a failed poll is just logged and retried next tick.
    pub fn run(&self, stop: &AtomicBool, mut on_tick: impl FnMut(&PollOutcome)) {
        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if let Some(outcome) = self.tick(now) {
                on_tick(&outcome);
            }
            let wait = lock(&self.schedule)
                .time_until_due(Instant::now())
                .unwrap_or(LOOP_GRANULARITY)
                .min(LOOP_GRANULARITY);
            std::thread::sleep(wait);
        }
    }

    // -----------------------------------------------------------------------
    // User actions
    // -----------------------------------------------------------------------

    /// "Clear alerts": dismiss what is on display, then refresh.
    pub fn clear_alerts(&self) -> usize {
        let cleared = lock(&self.state).clear_alerts();
        self.events.dismiss(cleared);
        self.poll_now();
        cleared
    }

    pub fn commands(&self) -> CommandClient<'_> {
        CommandClient::new(self.backend.as_ref(), self)
    }

    pub fn run_domain(&self, command: &DomainCommand) -> CommandOutcome {
        let outcome = self.commands().run_domain(command);
        self.events.command(&command.describe(), outcome.success);
        outcome
    }

    pub fn run_user(&self, command: &UserCommand) -> CommandOutcome {
        let outcome = self.commands().run_user(command);
        self.events.command(&command.describe(), outcome.success);
        outcome
    }

    /// Flip the theme and persist it.
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = {
            let mut state = lock(&self.state);
            state.theme = state.theme.toggled();
            state.theme
        };
        self.prefs.save(&Prefs { theme })?;
        Ok(theme)
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    pub fn view(&self) -> ViewModel {
        let state = lock(&self.state);
        ViewModel {
            generation: state.generation,
            patches: state.render(),
            connection: state.connection,
            connection_label: state.connection.label(),
            last_update: relative_time(state.last_success, Utc::now()),
            last_error: state.last_error.clone(),
            clock: Local::now().format("%H:%M:%S").to_string(),
            theme: state.theme,
            session: state.session.clone(),
        }
    }
}

impl Refresh for Dashboard {
    /// A scheduled poll may already be in flight and may have been sent
    /// before the mutation landed, so wait it out and poll once more.
    fn refresh(&self) {
        self.record(self.poller.poll_after_in_flight(self.backend.as_ref()));
    }
}

/// One-line description of a snapshot for the event log.
fn summarize(snapshot: &crate::model::StatusSnapshot) -> String {
    let count = |n: Option<usize>| n.map_or("-".to_string(), |n| n.to_string());
    format!(
        "servers={} websites={} alerts={}",
        count(snapshot.servers.as_ref().map(Vec::len)),
        count(snapshot.websites.as_ref().map(Vec::len)),
        count(snapshot.alerts.as_ref().map(Vec::len)),
    )
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
