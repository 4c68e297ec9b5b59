//! # Respira Core Library
//!
//! Core logic for the Respira meditation timer. The CLI is a thin layer over
//! this crate; any other front end drives the same types.
//!
//! ## Architecture
//!
//! - **Timer**: a pure countdown state machine ([`SessionTimer`]) that the
//!   caller ticks once per second, plus an async [`TimerDriver`] that owns a
//!   cancellable tick source and publishes [`Event`]s
//! - **Catalog**: the selectable session definitions
//! - **History**: append-only record of completed sessions and its stats
//! - **Storage**: SQLite history/kv storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: countdown state machine
//! - [`TimerDriver`]: tick source owner and event publisher
//! - [`Database`]: history persistence
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod error;
pub mod events;
pub mod history;
pub mod storage;
pub mod timer;

pub use catalog::{Catalog, SessionDefinition};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use history::{History, HistoryEntry, HistoryStats};
pub use storage::{Config, Database};
pub use timer::{
    format_remaining, progress_ratio, SessionTimer, TimerDriver, TimerSnapshot, TimerState,
    TimerStatus,
};
