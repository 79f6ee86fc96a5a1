//! Fixed-interval polling tied to the lifetime of a [`Subscription`].
//!
//! Each tick fetches once and publishes the latest outcome. There is no
//! backoff and a failed fetch does not stop the loop. Dropping the
//! subscription aborts the task, so a closed view never keeps polling.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::ApiError;

/// Default period for status and notification polling.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent<T> {
    Value(T),
    Failed(String),
}

pub struct Subscription<T> {
    rx: watch::Receiver<Option<PollEvent<T>>>,
    handle: JoinHandle<()>,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the next published outcome. `None` once polling has ended
    /// and every outcome has been seen.
    pub async fn next(&mut self) -> Option<PollEvent<T>> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }

    /// The most recent outcome without waiting.
    pub fn latest(&self) -> Option<PollEvent<T>> {
        self.rx.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        // Drop aborts the task.
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Poll `fetch` every `period` until the subscription is dropped.
pub fn subscribe<T, F, Fut>(period: Duration, fetch: F) -> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    subscribe_until(period, fetch, |_| false)
}

/// Poll `fetch` every `period` until `done` accepts a value (which is still
/// published) or the subscription is dropped. The first fetch runs at once.
pub fn subscribe_until<T, F, Fut, D>(period: Duration, mut fetch: F, done: D) -> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    D: Fn(&T) -> bool + Send + 'static,
{
    let (tx, rx) = watch::channel(None);
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let (event, finished) = match fetch().await {
                Ok(value) => {
                    let finished = done(&value);
                    (PollEvent::Value(value), finished)
                }
                Err(e) => {
                    warn!(error = %e, "poll fetch failed");
                    (PollEvent::Failed(e.to_string()), false)
                }
            };
            if tx.send(Some(event)).is_err() {
                break;
            }
            if finished {
                debug!("polling reached a final value");
                break;
            }
        }
    });
    Subscription { rx, handle }
}
