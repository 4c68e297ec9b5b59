//! Append-only record of completed meditation sessions.
//!
//! Entries are only ever pushed by the timer's completion transition (or
//! replayed from storage at startup). Nothing here edits or removes them.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Id of the completed [`SessionDefinition`](crate::SessionDefinition).
    /// Lookup only; the definition may no longer exist in the catalog.
    pub session_id: String,
    pub completed_at: DateTime<Utc>,
    pub completed: bool,
}

impl HistoryEntry {
    pub fn completed(session_id: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            completed_at,
            completed: true,
        }
    }
}

/// Aggregate numbers shown on the meditation screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub completed_sessions: u64,
    pub total_minutes: u64,
    pub streak_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from previously stored entries, keeping their order.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub(crate) fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn completed_count(&self) -> u64 {
        self.entries.iter().filter(|e| e.completed).count() as u64
    }

    /// Sum of the referenced sessions' durations. Unknown ids count as zero.
    pub fn total_minutes(&self, catalog: &Catalog) -> u64 {
        self.entries
            .iter()
            .filter_map(|e| catalog.get(&e.session_id))
            .map(|s| s.duration_minutes)
            .sum()
    }

    /// Consecutive UTC days ending at `today` with at least one completion.
    pub fn streak_days(&self, today: NaiveDate) -> u32 {
        let days: BTreeSet<NaiveDate> = self
            .entries
            .iter()
            .filter(|e| e.completed)
            .map(|e| e.completed_at.date_naive())
            .collect();

        let mut streak = 0;
        let mut day = today;
        while days.contains(&day) {
            streak += 1;
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
        streak
    }

    pub fn stats(&self, catalog: &Catalog, today: NaiveDate) -> HistoryStats {
        HistoryStats {
            completed_sessions: self.completed_count(),
            total_minutes: self.total_minutes(catalog),
            streak_days: self.streak_days(today),
        }
    }
}
