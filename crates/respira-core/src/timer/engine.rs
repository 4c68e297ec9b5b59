//! Session timer engine.
//!
//! The engine is a plain state machine without threads or timers of its own.
//! Whoever owns it (see [`TimerDriver`](super::TimerDriver)) calls `tick()`
//! once per elapsed second while it is running.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new();
//! timer.start(catalog.require("1")?.clone())?;
//! // Once per second:
//! if let Some(Event::SessionCompleted { .. }) = timer.tick() { /* notify */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::{format_remaining, progress_ratio};
use super::state::{TickOutcome, TimerState, TimerStatus};
use crate::catalog::SessionDefinition;
use crate::error::Result;
use crate::events::Event;
use crate::history::{History, HistoryEntry};

/// Read-only view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub session_id: Option<String>,
    pub title: Option<String>,
    pub remaining_secs: Option<u64>,
    pub total_secs: Option<u64>,
    pub remaining: String,
    pub progress: f64,
}

/// Countdown for one selected session plus the history of completed ones.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    state: TimerState,
    history: History,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle timer that continues an existing history.
    pub fn with_history(history: History) -> Self {
        Self {
            state: TimerState::Idle,
            history,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn selected_session(&self) -> Option<&SessionDefinition> {
        self.state.active().map(|a| &a.session)
    }

    /// `None` while idle.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.state.active().map(|a| a.remaining_secs)
    }

    pub fn total_secs(&self) -> Option<u64> {
        self.state.active().map(|a| a.total_secs)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn format_remaining(&self) -> String {
        format_remaining(self.remaining_secs().unwrap_or(0))
    }

    pub fn progress_ratio(&self) -> f64 {
        match self.state.active() {
            Some(a) => progress_ratio(a.total_secs, a.remaining_secs),
            None => 0.0,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let session = self.selected_session();
        TimerSnapshot {
            status: self.status(),
            session_id: session.map(|s| s.id.clone()),
            title: session.map(|s| s.title.clone()),
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            remaining: self.format_remaining(),
            progress: self.progress_ratio(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select `session` and start counting down from its full duration.
    ///
    /// An active session is replaced without recording history. A session
    /// with a zero duration is rejected and the current state is kept.
    pub fn start(&mut self, session: SessionDefinition) -> Result<Event> {
        let event = Event::SessionStarted {
            session_id: session.id.clone(),
            title: session.title.clone(),
            total_secs: session.duration_secs(),
            at: Utc::now(),
        };
        let next = match TimerState::start(session) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(error = %e, "rejected session start");
                return Err(e.into());
            }
        };
        if let Some(replaced) = self.selected_session() {
            tracing::debug!(session_id = %replaced.id, "replacing active session");
        }
        self.state = next;
        tracing::debug!(session_id = %event.session_id(), "session started");
        Ok(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.apply(TimerState::pause);
        self.pause_event()
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.status() != TimerStatus::Paused {
            return None;
        }
        self.apply(TimerState::resume);
        self.resume_event()
    }

    /// Running <-> Paused. Returns `None` (and changes nothing) while idle.
    pub fn toggle_pause(&mut self) -> Option<Event> {
        match self.status() {
            TimerStatus::Running => self.pause(),
            TimerStatus::Paused => self.resume(),
            TimerStatus::Idle => None,
        }
    }

    /// Abandon the current session. Idempotent; never records history.
    pub fn stop(&mut self) -> Option<Event> {
        let active = self.state.active().cloned()?;
        self.apply(TimerState::stop);
        tracing::debug!(
            session_id = %active.session.id,
            remaining_secs = active.remaining_secs,
            "session stopped"
        );
        Some(Event::SessionStopped {
            session_id: active.session.id,
            remaining_secs: active.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `None` unless running.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    /// Same as [`tick`](Self::tick) with an explicit completion timestamp.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match std::mem::take(&mut self.state).tick() {
            TickOutcome::Ticked(next) => {
                self.state = next;
                let active = self.state.active()?;
                Some(Event::Tick {
                    session_id: active.session.id.clone(),
                    remaining_secs: active.remaining_secs,
                    total_secs: active.total_secs,
                })
            }
            TickOutcome::Completed(session) => {
                // `state` is already Idle from the take above.
                let entry = HistoryEntry::completed(session.id.clone(), now);
                self.history.append(entry.clone());
                tracing::info!(
                    session_id = %session.id,
                    history_len = self.history.len(),
                    "session completed"
                );
                Some(Event::SessionCompleted {
                    total_secs: session.duration_secs(),
                    session_id: session.id,
                    title: session.title,
                    entry,
                })
            }
            TickOutcome::Ignored(state) => {
                self.state = state;
                None
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, transition: impl FnOnce(TimerState) -> TimerState) {
        let current = std::mem::take(&mut self.state);
        self.state = transition(current);
    }

    fn pause_event(&self) -> Option<Event> {
        let active = self.state.active()?;
        tracing::debug!(
            session_id = %active.session.id,
            remaining_secs = active.remaining_secs,
            "session paused"
        );
        Some(Event::SessionPaused {
            session_id: active.session.id.clone(),
            remaining_secs: active.remaining_secs,
            at: Utc::now(),
        })
    }

    fn resume_event(&self) -> Option<Event> {
        let active = self.state.active()?;
        tracing::debug!(
            session_id = %active.session.id,
            remaining_secs = active.remaining_secs,
            "session resumed"
        );
        Some(Event::SessionResumed {
            session_id: active.session.id.clone(),
            remaining_secs: active.remaining_secs,
            at: Utc::now(),
        })
    }
}
