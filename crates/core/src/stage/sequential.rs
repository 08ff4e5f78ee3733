//! Sequential stage runner for the rate-limited collaborator.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::job::Job;
use crate::throttle::{Clock, Pacer};

use super::types::Settled;

/// Runs units of work one at a time, strictly in job order, with a minimum
/// gap between the completion of one call and the start of the next.
///
/// This runner exists because its collaborator enforces a hard per-interval
/// rate limit; it is the designed concurrency bottleneck of the pipeline.
/// A failure in unit *i* is recorded and unit *i+1* still runs.
pub struct SequentialRunner {
    pacer: Pacer,
}

impl SequentialRunner {
    pub fn new(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            pacer: Pacer::new(min_interval, clock),
        }
    }

    pub async fn run<T, F, Fut>(&mut self, jobs: Vec<Job>, mut unit: F) -> Vec<Settled<T>>
    where
        F: FnMut(Job) -> Fut,
        Fut: Future<Output = Settled<T>>,
    {
        debug!(jobs = jobs.len(), "Starting sequential stage");
        let mut settled = Vec::with_capacity(jobs.len());

        for job in jobs {
            self.pacer.wait_ready().await;
            let outcome = unit(job).await;
            self.pacer.mark();
            settled.push(outcome);
        }

        settled
    }
}
