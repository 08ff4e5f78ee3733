//! Parallel stage runner: start all units, wait for all to settle.

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::job::Job;

use super::types::Settled;

/// Run one unit of work per job concurrently and wait for every unit to
/// settle.
///
/// Never short-circuits: a unit's failure does not cancel, delay or affect
/// any sibling. Results come back in input order regardless of completion
/// order, so the job→outcome mapping is stable.
///
/// `max_concurrent` caps in-flight units; `None` or `Some(0)` means
/// unbounded, which is the designed default for the rate-tolerant
/// collaborators this runner targets.
pub async fn run_parallel<T, F, Fut>(
    jobs: Vec<Job>,
    max_concurrent: Option<usize>,
    unit: F,
) -> Vec<Settled<T>>
where
    F: Fn(Job) -> Fut,
    Fut: Future<Output = Settled<T>>,
{
    let semaphore = max_concurrent
        .filter(|cap| *cap > 0)
        .map(|cap| Arc::new(Semaphore::new(cap)));

    debug!(
        jobs = jobs.len(),
        cap = max_concurrent.unwrap_or(0),
        "Starting parallel stage"
    );

    let units: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let semaphore = semaphore.clone();
            let fut = unit(job);
            async move {
                // The semaphore is never closed, so acquire only fails if it
                // were; running unthrottled is the safe fallback.
                let _permit = match &semaphore {
                    Some(s) => s.acquire().await.ok(),
                    None => None,
                };
                fut.await
            }
        })
        .collect();

    join_all(units).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AspectRatio, AssetReference, Region};
    use crate::job::StageName;
    use crate::stage::StageError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn jobs(names: &[&str]) -> Vec<Job> {
        names
            .iter()
            .map(|n| {
                let asset = AssetReference::local("fragrances", *n);
                Job::new(&asset, Region::new("US"), AspectRatio::new("1:1"))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let settled = run_parallel(jobs(&["a", "b", "c"]), None, |job| async move {
            // Later jobs finish first.
            let delay = match job.key.asset_id.as_str() {
                "a" => 30,
                "b" => 20,
                _ => 1,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let id = job.key.asset_id.clone();
            (job, Ok(id))
        })
        .await;

        let ids: Vec<_> = settled
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().clone())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_siblings() {
        let settled = run_parallel(jobs(&["a", "b", "c"]), None, |job| async move {
            if job.key.asset_id == "b" {
                let err = StageError::new(StageName::Prepare, "scripted failure");
                return (job, Err(err));
            }
            (job, Ok(()))
        })
        .await;

        assert!(settled[0].1.is_ok());
        assert!(settled[1].1.is_err());
        assert!(settled[2].1.is_ok());
        assert_eq!(settled[1].1.as_ref().unwrap_err().stage, StageName::Prepare);
    }

    #[tokio::test]
    async fn test_all_units_settle_before_return() {
        let completed = Arc::new(AtomicUsize::new(0));
        let completed_in_unit = Arc::clone(&completed);

        let settled = run_parallel(jobs(&["a", "b", "c", "d"]), None, move |job| {
            let completed = Arc::clone(&completed_in_unit);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                (job, Ok(()))
            }
        })
        .await;

        assert_eq!(settled.len(), 4);
        assert_eq!(completed.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_enforced() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let in_flight_u = Arc::clone(&in_flight);
        let peak_u = Arc::clone(&peak);

        run_parallel(jobs(&["a", "b", "c", "d", "e"]), Some(2), move |job| {
            let in_flight = Arc::clone(&in_flight_u);
            let peak = Arc::clone(&peak_u);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                (job, Ok(()))
            }
        })
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_job_set() {
        let settled =
            run_parallel(Vec::new(), None, |job| async move { (job, Ok(())) }).await;
        assert!(settled.is_empty());
    }
}
