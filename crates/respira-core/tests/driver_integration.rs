//! Integration tests for the async timer driver.
//!
//! All tests run on a paused tokio clock, so sleeping advances virtual time
//! and lets the tick task run at each deadline. Sleeps end half a second past
//! a tick boundary to keep the ordering unambiguous.

use std::time::Duration;

use respira_core::{Catalog, Event, SessionDefinition, TimerDriver, TimerStatus};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;
use tokio::time::sleep;

fn driver() -> TimerDriver {
    TimerDriver::new(Duration::from_secs(1))
}

fn one_minute() -> SessionDefinition {
    SessionDefinition::new("short", 1, "Short", "")
}

fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(n)) => panic!("receiver lagged by {n}"),
        }
    }
    events
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period() {
    let driver = driver();
    driver.start(one_minute()).await.unwrap();
    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(driver.snapshot().await.remaining_secs, Some(50));
}

#[tokio::test(start_paused = true)]
async fn pause_stops_ticking_and_resume_continues() {
    let driver = driver();
    let session = Catalog::builtin().require("1").unwrap().clone();
    driver.start(session).await.unwrap();

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(driver.snapshot().await.remaining_secs, Some(290));

    assert!(driver.toggle_pause().await.is_some());
    assert!(!driver.is_ticking().await);
    sleep(Duration::from_secs(5)).await;
    assert_eq!(driver.snapshot().await.remaining_secs, Some(290));

    assert!(driver.toggle_pause().await.is_some());
    assert!(driver.is_ticking().await);
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(driver.snapshot().await.remaining_secs, Some(289));
}

#[tokio::test(start_paused = true)]
async fn completion_publishes_once_and_records_history() {
    let driver = driver();
    let mut rx = driver.subscribe();
    driver.start(one_minute()).await.unwrap();

    sleep(Duration::from_millis(60_500)).await;
    let events = drain(&mut rx);
    let completions: Vec<_> = events.iter().filter(|e| e.is_completion()).collect();
    assert_eq!(completions.len(), 1);
    assert!(matches!(events.first(), Some(Event::SessionStarted { .. })));
    assert!(matches!(events.last(), Some(Event::SessionCompleted { .. })));

    assert_eq!(driver.status().await, TimerStatus::Idle);
    assert!(!driver.is_ticking().await);
    assert_eq!(driver.history().await.len(), 1);

    // Nothing else arrives after completion.
    sleep(Duration::from_secs(30)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_tick_source() {
    let driver = driver();
    let mut rx = driver.subscribe();
    driver.start(one_minute()).await.unwrap();
    sleep(Duration::from_millis(59_500)).await;

    assert!(matches!(
        driver.stop().await,
        Some(Event::SessionStopped { remaining_secs: 1, .. })
    ));
    assert!(driver.stop().await.is_none());
    drain(&mut rx);

    sleep(Duration::from_secs(10)).await;
    assert!(drain(&mut rx).is_empty());
    assert!(driver.history().await.is_empty());
    assert_eq!(driver.status().await, TimerStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_registration() {
    let driver = driver();
    driver.start(one_minute()).await.unwrap();
    sleep(Duration::from_millis(5_500)).await;

    // A second start must not leave the first registration ticking too.
    driver.start(one_minute()).await.unwrap();
    sleep(Duration::from_millis(3_000)).await;
    assert_eq!(driver.snapshot().await.remaining_secs, Some(57));
    assert!(driver.history().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn toggle_while_idle_does_nothing() {
    let driver = driver();
    assert!(driver.toggle_pause().await.is_none());
    assert!(driver.pause().await.is_none());
    assert!(driver.resume().await.is_none());
    assert!(!driver.is_ticking().await);
    assert_eq!(driver.status().await, TimerStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn rejected_start_leaves_driver_idle() {
    let driver = driver();
    let err = driver
        .start(SessionDefinition::new("zero", 0, "Zero", ""))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("non-positive duration"));
    assert!(!driver.is_ticking().await);
}
