//! The batch pipeline orchestrator.
//!
//! Drives every job through the staged pipeline: a parallel preparation
//! fan-out, a sequential throttled masking pass, then a parallel
//! composition and publication fan-out. Failures are isolated per job and
//! every job that enters the run ends up as exactly one terminal record in
//! the final [`BatchResult`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::asset::{AssetOrigin, Discovered};
use crate::config::CampaignConfig;
use crate::job::{
    expand_jobs, BatchResult, BatchSummary, Job, JobFailure, JobSuccess, StageName,
};
use crate::services::{Compositor, ImagePreparer, MaskBuilder, PreparedImage, Publisher};
use crate::stage::{run_parallel, SequentialRunner, Settled, StageError};
use crate::throttle::{Clock, TokioClock};

use super::config::PipelineConfig;

/// Orchestrates one batch run over the collaborator services.
pub struct Pipeline<Pr, Mk, Co, Pu>
where
    Pr: ImagePreparer + 'static,
    Mk: MaskBuilder + 'static,
    Co: Compositor + 'static,
    Pu: Publisher + 'static,
{
    config: PipelineConfig,
    preparer: Arc<Pr>,
    masker: Arc<Mk>,
    compositor: Arc<Co>,
    publisher: Arc<Pu>,
    clock: Arc<dyn Clock>,
}

impl<Pr, Mk, Co, Pu> Pipeline<Pr, Mk, Co, Pu>
where
    Pr: ImagePreparer + 'static,
    Mk: MaskBuilder + 'static,
    Co: Compositor + 'static,
    Pu: Publisher + 'static,
{
    pub fn new(
        config: PipelineConfig,
        preparer: Arc<Pr>,
        masker: Arc<Mk>,
        compositor: Arc<Co>,
        publisher: Arc<Pu>,
    ) -> Self {
        Self {
            config,
            preparer,
            masker,
            compositor,
            publisher,
            clock: Arc::new(TokioClock),
        }
    }

    /// Replace the clock driving the masking throttle.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn parallel_cap(&self) -> Option<usize> {
        if self.config.max_parallel == 0 {
            None
        } else {
            Some(self.config.max_parallel)
        }
    }

    /// Run one batch: expand, drive every job to a terminal state, and
    /// return the consolidated result.
    ///
    /// Per-job failures never abort the run; this method itself cannot
    /// fail once called.
    pub async fn run(&self, discovered: &Discovered, campaign: &CampaignConfig) -> BatchResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let expansion = expand_jobs(discovered, campaign);
        let entered = expansion.jobs.len() + expansion.load_failures.len();
        let mut failures = expansion.load_failures;

        info!(
            %run_id,
            jobs = expansion.jobs.len(),
            load_failures = failures.len(),
            expected_total = expansion.expected_total,
            "Starting batch run"
        );

        // Synthetic assets arrive already sized for their one ratio; they
        // act as their own prepared image and join again at composition.
        let (fast_path, to_prepare): (Vec<Job>, Vec<Job>) = expansion
            .jobs
            .into_iter()
            .partition(|job| job.asset.origin == AssetOrigin::Synthetic);
        let fast_path: Vec<Job> = fast_path
            .into_iter()
            .map(|mut job| {
                job.context.prepared = Some(PreparedImage::from_asset(&job.asset));
                job
            })
            .collect();

        let settled = self.prepare_stage(to_prepare).await;
        let prepared = Self::capture_failures(settled, &mut failures);
        info!(
            survivors = prepared.len(),
            failed = failures.len(),
            "Prepare stage settled"
        );

        let settled = self.mask_stage(prepared).await;
        let mut masked = Self::capture_failures(settled, &mut failures);
        info!(
            survivors = masked.len(),
            failed = failures.len(),
            "Mask stage settled"
        );

        masked.extend(fast_path);
        let settled = self.finish_stage(masked, campaign).await;

        let mut success = Vec::with_capacity(settled.len());
        for (job, outcome) in settled {
            match outcome {
                Ok(published) => success.push(JobSuccess {
                    key: job.key,
                    location: published.url,
                    expires_at: published.expires_at,
                    completed_at: Utc::now(),
                }),
                Err(err) => {
                    warn!(job = %job.key, stage = %err.stage, error = %err.message, "Job failed");
                    failures.push(JobFailure::new(job.key, err.stage, err.message));
                }
            }
        }

        // Every job that entered must leave as exactly one terminal record.
        debug_assert_eq!(success.len() + failures.len(), entered);

        let summary = BatchSummary {
            total: expansion.expected_total,
            processed: success.len() + failures.len(),
            succeeded: success.len(),
            failed: failures.len(),
        };
        info!(
            %run_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch run finished"
        );

        BatchResult {
            run_id,
            started_at,
            finished_at: Utc::now(),
            success,
            failures,
            summary,
        }
    }

    /// Stage 1: parallel preparation fan-out.
    async fn prepare_stage(&self, jobs: Vec<Job>) -> Vec<Settled<()>> {
        let preparer = Arc::clone(&self.preparer);
        run_parallel(jobs, self.parallel_cap(), move |mut job| {
            let preparer = Arc::clone(&preparer);
            async move {
                match preparer.prepare(&job.asset, &job.key.ratio).await {
                    Ok(image) => {
                        job.context.prepared = Some(image);
                        (job, Ok(()))
                    }
                    Err(err) => {
                        let err = StageError::new(StageName::Prepare, err.to_string());
                        (job, Err(err))
                    }
                }
            }
        })
        .await
    }

    /// Stage 2: sequential, throttled masking.
    async fn mask_stage(&self, jobs: Vec<Job>) -> Vec<Settled<()>> {
        let mut runner = SequentialRunner::new(
            Duration::from_millis(self.config.mask_interval_ms),
            Arc::clone(&self.clock),
        );
        let masker = Arc::clone(&self.masker);
        runner
            .run(jobs, move |mut job| {
                let masker = Arc::clone(&masker);
                async move {
                    let prepared = match job.context.prepared.clone() {
                        Some(prepared) => prepared,
                        None => {
                            let err = StageError::new(
                                StageName::Mask,
                                "job reached masking without a prepared image",
                            );
                            return (job, Err(err));
                        }
                    };
                    match masker.build_mask(&prepared).await {
                        Ok(mask) => {
                            job.context.mask = Some(mask);
                            (job, Ok(()))
                        }
                        Err(err) => {
                            let err = StageError::new(StageName::Mask, err.to_string());
                            (job, Err(err))
                        }
                    }
                }
            })
            .await
    }

    /// Stage 3: parallel composition and publication.
    ///
    /// Composition and publication run back to back inside one unit so a
    /// job's creative is published as soon as it is composed, without
    /// waiting for sibling compositions.
    async fn finish_stage(
        &self,
        jobs: Vec<Job>,
        campaign: &CampaignConfig,
    ) -> Vec<Settled<crate::services::PublishedArtifact>> {
        let compositor = Arc::clone(&self.compositor);
        let publisher = Arc::clone(&self.publisher);
        let campaign = campaign.clone();
        run_parallel(jobs, self.parallel_cap(), move |mut job| {
            let compositor = Arc::clone(&compositor);
            let publisher = Arc::clone(&publisher);
            let text = campaign.headline_for(&job.key.category).to_string();
            async move {
                let prepared = match job.context.prepared.clone() {
                    Some(prepared) => prepared,
                    None => {
                        let err = StageError::new(
                            StageName::Compose,
                            "job reached composition without a prepared image",
                        );
                        return (job, Err(err));
                    }
                };
                let mask = job.context.mask.clone();
                let artifact = match compositor.compose(&prepared, mask.as_ref(), &text).await {
                    Ok(artifact) => artifact,
                    Err(err) => {
                        let err = StageError::new(StageName::Compose, err.to_string());
                        return (job, Err(err));
                    }
                };
                match publisher.publish(&artifact).await {
                    Ok(published) => {
                        job.context.artifact = Some(artifact);
                        (job, Ok(published))
                    }
                    Err(err) => {
                        let err = StageError::new(StageName::Publish, err.to_string());
                        (job, Err(err))
                    }
                }
            }
        })
        .await
    }

    /// Convert a stage's failed outcomes into terminal records and pass the
    /// survivors on.
    fn capture_failures<T>(settled: Vec<Settled<T>>, failures: &mut Vec<JobFailure>) -> Vec<Job> {
        let mut survivors = Vec::with_capacity(settled.len());
        for (job, outcome) in settled {
            match outcome {
                Ok(_) => survivors.push(job),
                Err(err) => {
                    warn!(job = %job.key, stage = %err.stage, error = %err.message, "Job failed");
                    failures.push(JobFailure::new(job.key, err.stage, err.message));
                }
            }
        }
        survivors
    }
}
