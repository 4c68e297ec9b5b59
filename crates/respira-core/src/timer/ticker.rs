//! Cancellable periodic tick source on the tokio runtime.
//!
//! A [`TickHandle`] is one registration. Its callback receives the
//! registration's cancellation token so it can re-check it after taking
//! whatever lock guards the state it mutates; whoever cancels under that same
//! lock is then guaranteed that no callback of this registration applies
//! afterwards.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct TickHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Invoke `on_tick` every `period`, first one full period from now.
    ///
    /// The loop ends when the handle is cancelled or dropped, or when the
    /// callback returns `ControlFlow::Break`. Must be called inside a tokio
    /// runtime. `period` must be non-zero.
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let guard = token.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            // No catch-up bursts after a stall: one tick is one second.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = guard.cancelled() => break,
                    _ = interval.tick() => {
                        if on_tick(guard.clone()).await.is_break() {
                            break;
                        }
                    }
                }
            }
        });
        Self { token, task }
    }

    pub fn cancel(&self) {
        self.token.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
