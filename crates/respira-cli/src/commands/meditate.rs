use std::io::Write;
use std::time::Duration;

use clap::Args;
use respira_core::{format_remaining, progress_ratio, Config, Database, Event, TimerDriver};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

const COMPLETION_NOTICE: &str =
    "Parabéns! Você completou a meditação! Seu bem-estar foi fortalecido! 💚";
const BAR_WIDTH: usize = 24;
const LAST_SESSION_KEY: &str = "last_session_id";

#[derive(Args)]
pub struct MeditateArgs {
    /// Session id from `respira sessions` (defaults to the last one started)
    pub session_id: Option<String>,
    /// Override the configured tick period (milliseconds)
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Print every event as a JSON line instead of the live display
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: MeditateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(meditate(args));
    // A pending stdin read would otherwise block runtime teardown.
    runtime.shutdown_background();
    result
}

async fn meditate(args: MeditateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = config.catalog()?;
    let db = Database::open()?;
    let session_id = match &args.session_id {
        Some(id) => id.clone(),
        None => db
            .kv_get(LAST_SESSION_KEY)?
            .ok_or("no session id given and no session started before")?,
    };
    let session = catalog.require(&session_id)?.clone();
    let tick_interval = match args.tick_ms {
        Some(0) => return Err("--tick-ms must be greater than zero".into()),
        Some(ms) => Duration::from_millis(ms),
        None => config.tick_interval(),
    };

    let driver = TimerDriver::with_history(db.load_history()?, tick_interval);
    let mut events = driver.subscribe();
    driver.start(session).await?;
    db.kv_set(LAST_SESSION_KEY, &session_id)?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(entry) = completed_entry(&event) {
                        db.append_history(entry)?;
                    }
                    render(&event, &args, &config)?;
                    if matches!(
                        event,
                        Event::SessionCompleted { .. } | Event::SessionStopped { .. }
                    ) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "display fell behind the timer");
                }
                Err(RecvError::Closed) => break,
            },
            line = stdin.next_line(), if stdin_open => match line? {
                Some(command) => match command.trim() {
                    "p" => {
                        driver.toggle_pause().await;
                    }
                    "s" | "q" => {
                        driver.stop().await;
                    }
                    "" => {}
                    other => eprintln!("unknown command '{other}' (p = pause/resume, s = stop)"),
                },
                None => stdin_open = false,
            },
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                driver.stop().await;
            }
        }
    }
    Ok(())
}

fn completed_entry(event: &Event) -> Option<&respira_core::HistoryEntry> {
    match event {
        Event::SessionCompleted { entry, .. } => Some(entry),
        _ => None,
    }
}

fn render(
    event: &Event,
    args: &MeditateArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let mut out = std::io::stdout();
    match event {
        Event::SessionStarted { title, total_secs, .. } => {
            println!(
                "{title} ({}) -- p + Enter to pause/resume, s + Enter to stop",
                format_remaining(*total_secs)
            );
            print!("\r{}", progress_line(*total_secs, *total_secs));
        }
        Event::Tick { remaining_secs, total_secs, .. } => {
            print!("\r{}", progress_line(*total_secs, *remaining_secs));
        }
        Event::SessionPaused { remaining_secs, .. } => {
            print!("\rpaused at {}            ", format_remaining(*remaining_secs));
        }
        Event::SessionResumed { remaining_secs, .. } => {
            print!("\rresumed at {}           ", format_remaining(*remaining_secs));
        }
        Event::SessionCompleted { title, total_secs, .. } => {
            println!("\r{}", progress_line(*total_secs, 0));
            if config.notifications.enabled {
                println!("{COMPLETION_NOTICE}");
            } else {
                println!("{title} completed");
            }
        }
        Event::SessionStopped { remaining_secs, .. } => {
            println!("\nstopped with {} left", format_remaining(*remaining_secs));
        }
    }
    out.flush()?;
    Ok(())
}

fn progress_line(total_secs: u64, remaining_secs: u64) -> String {
    let ratio = progress_ratio(total_secs, remaining_secs);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!(
        "{} [{}{}] {:>3.0}%",
        format_remaining(remaining_secs),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        ratio * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_fills_bar() {
        assert_eq!(
            progress_line(300, 300),
            format!("05:00 [{}]   0%", "-".repeat(BAR_WIDTH))
        );
        assert_eq!(
            progress_line(300, 0),
            format!("00:00 [{}] 100%", "#".repeat(BAR_WIDTH))
        );
    }
}
