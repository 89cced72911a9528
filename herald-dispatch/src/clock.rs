//! Clock abstraction
//!
//! Pacing waits and retry cooldowns go through this trait so the engine's
//! scheduling behaviour is testable without real delays.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current instant and cooperative delay
#[async_trait]
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current wall-clock instant
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the caller for `duration`
    ///
    /// Cancellable only by full process termination; the engine does no other
    /// work while suspended.
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `tokio::time`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Manually advanced clock for tests
///
/// `sleep` returns immediately, advances the clock by the requested duration,
/// and records it so tests can assert on the waits the engine asked for.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Debug)]
struct ManualInner {
    now: DateTime<Utc>,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                now: start,
                sleeps: Vec::new(),
            })),
        }
    }

    /// All sleeps requested so far, in order
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner
            .lock()
            .expect("ManualClock mutex poisoned")
            .sleeps
            .clone()
    }

    /// Advance the clock without recording a sleep
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.inner.lock().expect("ManualClock mutex poisoned");
        inner.now += chrono::Duration::from_std(duration).unwrap_or_default();
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.inner.lock().expect("ManualClock mutex poisoned").now
    }

    async fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock().expect("ManualClock mutex poisoned");
        inner.now += chrono::Duration::from_std(duration).unwrap_or_default();
        inner.sleeps.push(duration);
    }
}
