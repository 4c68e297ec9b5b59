pub mod config;
pub mod history;
pub mod meditate;
pub mod sessions;
