//! Pure timer state and its transitions.
//!
//! Each transition consumes the current state and returns the next one, so
//! the owner can swap it in place and there is no way to half-apply a change.
//!
//! ```text
//! Idle --start--> Running <--pause/resume--> Paused
//! Running --tick (remaining > 1)--> Running
//! Running --tick (remaining <= 1)--> Completed(session) => Idle
//! Running | Paused --stop--> Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::SessionDefinition;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Session fields that only exist while a session is selected.
///
/// Invariant: `0 < remaining_secs <= total_secs`, and `total_secs` is the
/// session's duration. Deserialized values are checked against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActiveSessionRecord")]
pub struct ActiveSession {
    pub(crate) session: SessionDefinition,
    pub(crate) remaining_secs: u64,
    /// Snapshot of the duration at start. Never changes for this session.
    pub(crate) total_secs: u64,
}

impl ActiveSession {
    pub fn session(&self) -> &SessionDefinition {
        &self.session
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }
}

#[derive(Deserialize)]
struct ActiveSessionRecord {
    session: SessionDefinition,
    remaining_secs: u64,
    total_secs: u64,
}

impl TryFrom<ActiveSessionRecord> for ActiveSession {
    type Error = ValidationError;

    fn try_from(record: ActiveSessionRecord) -> Result<Self, Self::Error> {
        record.session.validate()?;
        let expected = record.session.duration_secs();
        if record.total_secs != expected {
            return Err(ValidationError::InconsistentSession {
                session_id: record.session.id,
                message: format!("total {}s, expected {expected}s", record.total_secs),
            });
        }
        if record.remaining_secs == 0 || record.remaining_secs > record.total_secs {
            return Err(ValidationError::InconsistentSession {
                session_id: record.session.id,
                message: format!(
                    "remaining {}s outside 1..={}s",
                    record.remaining_secs, record.total_secs
                ),
            });
        }
        Ok(Self {
            session: record.session,
            remaining_secs: record.remaining_secs,
            total_secs: record.total_secs,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "session", rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Idle,
    Running(ActiveSession),
    Paused(ActiveSession),
}

/// Result of applying one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running, one second less remaining.
    Ticked(TimerState),
    /// The countdown reached zero. The next state is `Idle`.
    Completed(SessionDefinition),
    /// Not running; the state is returned unchanged.
    Ignored(TimerState),
}

impl TimerState {
    /// Fresh running state for `session`.
    pub fn start(session: SessionDefinition) -> Result<Self, ValidationError> {
        session.validate()?;
        let total_secs = session.duration_secs();
        Ok(TimerState::Running(ActiveSession {
            session,
            remaining_secs: total_secs,
            total_secs,
        }))
    }

    pub fn pause(self) -> Self {
        match self {
            TimerState::Running(active) => TimerState::Paused(active),
            other => other,
        }
    }

    pub fn resume(self) -> Self {
        match self {
            TimerState::Paused(active) => TimerState::Running(active),
            other => other,
        }
    }

    /// Running <-> Paused. Idle stays Idle.
    pub fn toggle(self) -> Self {
        match self {
            TimerState::Running(active) => TimerState::Paused(active),
            TimerState::Paused(active) => TimerState::Running(active),
            TimerState::Idle => TimerState::Idle,
        }
    }

    pub fn stop(self) -> Self {
        TimerState::Idle
    }

    pub fn tick(self) -> TickOutcome {
        match self {
            TimerState::Running(active) if active.remaining_secs <= 1 => {
                TickOutcome::Completed(active.session)
            }
            TimerState::Running(mut active) => {
                active.remaining_secs -= 1;
                TickOutcome::Ticked(TimerState::Running(active))
            }
            other => TickOutcome::Ignored(other),
        }
    }

    pub fn status(&self) -> TimerStatus {
        match self {
            TimerState::Idle => TimerStatus::Idle,
            TimerState::Running(_) => TimerStatus::Running,
            TimerState::Paused(_) => TimerStatus::Paused,
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            TimerState::Idle => None,
            TimerState::Running(active) | TimerState::Paused(active) => Some(active),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running(_))
    }
}
