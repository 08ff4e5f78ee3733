//! Injectable clock abstraction.
//!
//! The pacer and the sequential stage runner never touch wall-clock time
//! directly, so tests can drive pacing with a manual clock and finish
//! without real waits.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// A source of monotonic time and sleeps.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by tokio's timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
