//! Async host that feeds a [`SessionTimer`] from a [`TickHandle`].
//!
//! All timer transitions and all tick registration changes happen under one
//! mutex. While the timer is running there is exactly one live registration;
//! in any other state there is none.

use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

use super::engine::{SessionTimer, TimerSnapshot};
use super::state::TimerStatus;
use super::ticker::TickHandle;
use crate::catalog::SessionDefinition;
use crate::error::Result;
use crate::events::Event;
use crate::history::History;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
struct Inner {
    timer: SessionTimer,
    ticker: Option<TickHandle>,
}

impl Inner {
    fn disarm(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

#[derive(Clone)]
pub struct TimerDriver {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<Event>,
    tick_interval: Duration,
}

impl TimerDriver {
    pub fn new(tick_interval: Duration) -> Self {
        Self::with_history(History::new(), tick_interval)
    }

    pub fn with_history(history: History, tick_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                timer: SessionTimer::with_history(history),
                ticker: None,
            })),
            events,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        self.inner.lock().await.timer.snapshot()
    }

    pub async fn status(&self) -> TimerStatus {
        self.inner.lock().await.timer.status()
    }

    pub async fn history(&self) -> History {
        self.inner.lock().await.timer.history().clone()
    }

    /// Whether a tick registration is currently live.
    pub async fn is_ticking(&self) -> bool {
        self.inner
            .lock()
            .await
            .ticker
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    pub async fn start(&self, session: SessionDefinition) -> Result<Event> {
        let mut inner = self.inner.lock().await;
        let event = inner.timer.start(session)?;
        self.arm(&mut inner);
        self.publish(event.clone());
        Ok(event)
    }

    pub async fn pause(&self) -> Option<Event> {
        let mut inner = self.inner.lock().await;
        let event = inner.timer.pause()?;
        inner.disarm();
        self.publish(event.clone());
        Some(event)
    }

    pub async fn resume(&self) -> Option<Event> {
        let mut inner = self.inner.lock().await;
        let event = inner.timer.resume()?;
        self.arm(&mut inner);
        self.publish(event.clone());
        Some(event)
    }

    pub async fn toggle_pause(&self) -> Option<Event> {
        let mut inner = self.inner.lock().await;
        let event = inner.timer.toggle_pause()?;
        if inner.timer.is_running() {
            self.arm(&mut inner);
        } else {
            inner.disarm();
        }
        self.publish(event.clone());
        Some(event)
    }

    pub async fn stop(&self) -> Option<Event> {
        let mut inner = self.inner.lock().await;
        inner.disarm();
        let event = inner.timer.stop()?;
        self.publish(event.clone());
        Some(event)
    }

    /// Replace any live registration with a fresh one.
    fn arm(&self, inner: &mut Inner) {
        inner.disarm();
        let state = Arc::downgrade(&self.inner);
        let events = self.events.clone();
        inner.ticker = Some(TickHandle::spawn(self.tick_interval, move |token| {
            on_tick(state.clone(), events.clone(), token)
        }));
    }

    fn publish(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

async fn on_tick(
    state: Weak<Mutex<Inner>>,
    events: broadcast::Sender<Event>,
    token: CancellationToken,
) -> ControlFlow<()> {
    let Some(state) = state.upgrade() else {
        return ControlFlow::Break(());
    };
    let mut inner = state.lock().await;
    if token.is_cancelled() {
        tracing::trace!("dropping tick from cancelled registration");
        return ControlFlow::Break(());
    }
    let Some(event) = inner.timer.tick() else {
        return ControlFlow::Break(());
    };

    let done = event.is_completion();
    if done {
        inner.disarm();
    }
    let _ = events.send(event);
    if done {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}
