use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;

/// Every effective timer transition produces an Event.
/// Presentation layers subscribe to them instead of holding timer logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: String,
        title: String,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        session_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        session_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed on a running session that has not finished yet.
    Tick {
        session_id: String,
        remaining_secs: u64,
        total_secs: u64,
    },
    /// Raised exactly once per countdown that reaches zero.
    SessionCompleted {
        session_id: String,
        title: String,
        total_secs: u64,
        entry: HistoryEntry,
    },
    /// Manual stop before completion. No history is recorded.
    SessionStopped {
        session_id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn session_id(&self) -> &str {
        match self {
            Event::SessionStarted { session_id, .. }
            | Event::SessionPaused { session_id, .. }
            | Event::SessionResumed { session_id, .. }
            | Event::Tick { session_id, .. }
            | Event::SessionCompleted { session_id, .. }
            | Event::SessionStopped { session_id, .. } => session_id,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Event::SessionCompleted { .. })
    }
}
