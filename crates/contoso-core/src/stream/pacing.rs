//! Pacing between streamed chunks.
//!
//! A [`Pacer`] suspends the calling task for a fixed delay, or returns early
//! when the session's [`CancellationToken`] fires. Suspension is cooperative:
//! it parks only the current task, never the runtime.
//!
//! A zero delay does not touch the timer. It yields to the scheduler once
//! instead, so a cancelled session still notices at its next pacing step
//! without introducing any wall-clock pause.

use crate::{Error, Result};
use core::{pin::Pin, time::Duration};
use tokio_util::sync::CancellationToken;

/// Upper bound on a configurable delay. Bounds the lifetime of a session to
/// `MAX_DELAY × token count`.
pub const MAX_DELAY: Duration = Duration::from_secs(5);

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across threads
    type Sleep: Future<Output = ()> + Send;

    fn sleep_for(dur: Duration) -> Self::Sleep;
}

/// An implementation of [`SleepProvider`] using Tokio's timer.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// Ignores the requested duration and hands control back to the scheduler
/// exactly once. Used for zero-delay pacing.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    /// Tokio's `yield_now()` returns a private future type, so we must use a
    /// boxed `dyn Future` to abstract over it.
    type Sleep = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn sleep_for(_dur: Duration) -> Self::Sleep {
        Box::pin(tokio::task::yield_now())
    }
}

/// How a single [`Pacer::wait`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full delay elapsed.
    Elapsed,
    /// The cancellation token fired first.
    Cancelled,
}

/// A validated inter-chunk delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    /// Creates a pacer, rejecting delays above [`MAX_DELAY`].
    pub fn new(delay: Duration) -> Result<Self> {
        Self::bounded(delay, MAX_DELAY)
    }

    /// Creates a pacer, rejecting delays above `ceiling` (itself capped at
    /// [`MAX_DELAY`]).
    pub fn bounded(delay: Duration, ceiling: Duration) -> Result<Self> {
        let ceiling = ceiling.min(MAX_DELAY);
        if delay > ceiling {
            return Err(Error::invalid_argument(format!(
                "delay_ms must be between 0 and {}, got {}",
                ceiling.as_millis(),
                delay.as_millis()
            )));
        }
        Ok(Self { delay })
    }

    pub fn from_millis(millis: u64) -> Result<Self> {
        Self::new(Duration::from_millis(millis))
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspends for the configured delay, or until `cancel` fires.
    pub async fn wait(&self, cancel: &CancellationToken) -> WaitOutcome {
        if self.delay.is_zero() {
            self.wait_with::<TokioYield>(cancel).await
        } else {
            self.wait_with::<TokioSleep>(cancel).await
        }
    }

    /// Like [`wait`](Self::wait), with an explicit [`SleepProvider`].
    pub async fn wait_with<S: SleepProvider>(&self, cancel: &CancellationToken) -> WaitOutcome {
        tokio::select! {
            biased;
            () = cancel.cancelled() => WaitOutcome::Cancelled,
            () = S::sleep_for(self.delay) => WaitOutcome::Elapsed,
        }
    }
}
