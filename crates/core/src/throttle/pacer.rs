//! Minimum-gap pacer for the throttled masking collaborator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::clock::Clock;

/// Enforces a minimum gap between the completion of one call and the start
/// of the next.
///
/// A single-slot limiter: `wait_ready` blocks until the gap since the last
/// [`Pacer::mark`] has elapsed; `mark` records a call's completion. The
/// clock is injected so tests run on virtual time.
pub struct Pacer {
    min_interval: Duration,
    last_completed: Option<Instant>,
    clock: Arc<dyn Clock>,
}

impl Pacer {
    pub fn new(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval,
            last_completed: None,
            clock,
        }
    }

    /// Check whether a call may start now.
    ///
    /// Returns `Ok(())` if the gap has elapsed (or no call has completed
    /// yet). Returns `Err(wait_duration)` with the remaining wait otherwise.
    pub fn try_ready(&self) -> Result<(), Duration> {
        match self.last_completed {
            None => Ok(()),
            Some(last) => {
                let elapsed = self.clock.now().duration_since(last);
                if elapsed >= self.min_interval {
                    Ok(())
                } else {
                    Err(self.min_interval - elapsed)
                }
            }
        }
    }

    /// Wait until a call may start.
    pub async fn wait_ready(&self) {
        if let Err(wait) = self.try_ready() {
            self.clock.sleep(wait).await;
        }
    }

    /// Record that a call just completed.
    pub fn mark(&mut self) {
        self.last_completed = Some(self.clock.now());
    }
}
