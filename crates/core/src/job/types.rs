//! Job and outcome types for the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::asset::{AspectRatio, AssetReference, Region};
use crate::services::{FinalArtifact, MaskHandle, PreparedImage};

/// Immutable identity of one unit of pipeline work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobKey {
    pub asset_id: String,
    pub category: String,
    pub region: Region,
    pub ratio: AspectRatio,
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}@{}", self.asset_id, self.region, self.ratio)
    }
}

/// Intermediate artifacts threaded between stages.
///
/// This is the one normalized shape collaborator responses are mapped into;
/// raw response shapes never travel past the adapter boundary. Each job
/// exclusively owns its context — no cross-job sharing.
#[derive(Debug, Clone, Default)]
pub struct JobContext {
    pub prepared: Option<PreparedImage>,
    pub mask: Option<MaskHandle>,
    pub artifact: Option<FinalArtifact>,
}

/// One (asset, region, ratio) unit of pipeline work.
#[derive(Debug, Clone)]
pub struct Job {
    pub key: JobKey,
    pub asset: AssetReference,
    pub context: JobContext,
}

impl Job {
    pub fn new(asset: &AssetReference, region: Region, ratio: AspectRatio) -> Self {
        Self {
            key: JobKey {
                asset_id: asset.file_name.clone(),
                category: asset.category.clone(),
                region,
                ratio,
            },
            asset: asset.clone(),
            context: JobContext::default(),
        }
    }
}

/// The pipeline stage a terminal record was produced at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Load,
    Prepare,
    Mask,
    Compose,
    Publish,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Load => "load",
            StageName::Prepare => "prepare",
            StageName::Mask => "mask",
            StageName::Compose => "compose",
            StageName::Publish => "publish",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure record for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailure {
    pub key: JobKey,
    pub stage: StageName,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

impl JobFailure {
    pub fn new(key: JobKey, stage: StageName, error: impl Into<String>) -> Self {
        Self {
            key,
            stage,
            error: error.into(),
            failed_at: Utc::now(),
        }
    }
}

/// Terminal success record for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSuccess {
    pub key: JobKey,
    /// Retrievable location of the published artifact.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub completed_at: DateTime<Utc>,
}

/// Summary counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Expected output count from configuration cardinality, independent of
    /// what actually ran.
    pub total: usize,
    /// Jobs that reached a terminal state during this run.
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// The consolidated report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub success: Vec<JobSuccess>,
    pub failures: Vec<JobFailure>,
    pub summary: BatchSummary,
}
