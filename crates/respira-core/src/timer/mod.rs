mod driver;
mod engine;
mod format;
mod state;
mod ticker;

pub use driver::TimerDriver;
pub use engine::{SessionTimer, TimerSnapshot};
pub use format::{format_remaining, progress_ratio};
pub use state::{ActiveSession, TickOutcome, TimerState, TimerStatus};
pub use ticker::TickHandle;
