//! Request pacing.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

/// Gate awaited before each rate-limited request.
#[async_trait]
pub trait Throttle: Send {
    /// Wait until the next request may start.
    async fn wait(&mut self);
}

/// Fixed-interval gate: consecutive requests start at least `interval` apart.
///
/// The first call never waits. Spacing is start-to-start, so a request that
/// itself takes longer than `interval` adds no further pause; `N` calls
/// sleep `N - 1` times only when requests are faster than `interval`.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval: Duration,
    last: Option<Instant>,
    delays: usize,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            delays: 0,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of calls that had to sleep.
    pub fn delays(&self) -> usize {
        self.delays
    }
}

#[async_trait]
impl Throttle for IntervalGate {
    async fn wait(&mut self) {
        if let Some(last) = self.last {
            let ready = last + self.interval;
            if Instant::now() < ready {
                self.delays += 1;
                tokio::time::sleep_until(ready).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
