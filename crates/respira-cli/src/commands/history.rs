use chrono::Utc;
use clap::Subcommand;
use respira_core::{Config, Database};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Completed sessions, oldest first
    List,
    /// Completed count, total minutes and current streak
    Stats,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let history = db.load_history()?;

    match action {
        HistoryAction::List => {
            println!("{}", serde_json::to_string_pretty(history.entries())?);
        }
        HistoryAction::Stats => {
            let catalog = Config::load()?.catalog()?;
            let stats = history.stats(&catalog, Utc::now().date_naive());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
