//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum concurrent units in the parallel stages (0 = unlimited).
    /// The collaborators behind those stages tolerate concurrency, so
    /// unbounded fan-out is the default; set a cap for deployments that
    /// need backpressure.
    #[serde(default)]
    pub max_parallel: usize,

    /// Minimum gap in milliseconds between the completion of one masking
    /// call and the start of the next. The masking service enforces a hard
    /// rate limit; concurrent calls reliably get throttled.
    #[serde(default = "default_mask_interval")]
    pub mask_interval_ms: u64,
}

fn default_mask_interval() -> u64 {
    200
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_parallel: 0,
            mask_interval_ms: default_mask_interval(),
        }
    }
}
