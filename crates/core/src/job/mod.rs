//! Job model and expansion.

mod expander;
mod types;

pub use expander::{expand_jobs, Expansion};
pub use types::{
    BatchResult, BatchSummary, Job, JobContext, JobFailure, JobKey, JobSuccess, StageName,
};
