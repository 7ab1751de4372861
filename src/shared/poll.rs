//! Fixed-interval polling.
//!
//! [`poll_until`] re-fetches a resource until a terminal state or a deadline,
//! and [`Ticker`] paces the repeating checks of watch mode.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Timeout waiting for {what} after {timeout:?}")]
    Timeout { what: String, timeout: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    pub fn from_secs(interval_secs: u64, timeout_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Fetch repeatedly until `is_done` holds for the fetched value.
///
/// `on_poll` sees every observation, including the final one. Fetch errors are
/// returned immediately. The last sleep is shortened so the loop never runs
/// past the deadline.
pub async fn poll_until<T, F, Fut, D, P>(
    config: &PollConfig,
    what: &str,
    mut fetch: F,
    is_done: D,
    mut on_poll: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    D: Fn(&T) -> bool,
    P: FnMut(&T),
{
    let start = Instant::now();
    let mut attempt: u32 = 0;

    while start.elapsed() < config.timeout {
        attempt += 1;
        let value = fetch().await?;
        on_poll(&value);

        if is_done(&value) {
            tracing::info!(what, attempt, "poll finished");
            return Ok(value);
        }
        tracing::info!(what, attempt, "still waiting");

        let remaining = config.timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            break;
        }
        tokio::time::sleep(config.interval.min(remaining)).await;
    }

    Err(PollError::Timeout {
        what: what.to_string(),
        timeout: config.timeout,
    }
    .into())
}

/// Outcome of waiting for the next watch-mode check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Run check number `n` (1-based).
    Check(u32),
    /// The shutdown future resolved while waiting.
    Interrupted,
    /// `max_ticks` checks have already run.
    Finished,
}

/// Paces watch mode: the first tick is immediate, later ticks wait `interval`.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    max_ticks: Option<u32>,
    count: u32,
}

impl Ticker {
    pub fn new(interval: Duration, max_ticks: Option<u32>) -> Self {
        Self {
            interval,
            max_ticks,
            count: 0,
        }
    }

    pub async fn tick<S>(&mut self, shutdown: Pin<&mut S>) -> Tick
    where
        S: Future<Output = ()>,
    {
        if self.max_ticks.is_some_and(|max| self.count >= max) {
            return Tick::Finished;
        }

        if self.count > 0 {
            tokio::select! {
                () = shutdown => return Tick::Interrupted,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        self.count += 1;
        Tick::Check(self.count)
    }
}

/// Resolves on Ctrl+C. A failure to install the handler never resolves.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
