//! Stage runner types.

use thiserror::Error;

use crate::job::{Job, StageName};

/// A per-job failure at a stage boundary.
///
/// Collaborator errors are converted into this at the stage where they
/// occur; they never propagate out of a runner as anything else.
#[derive(Debug, Clone, Error)]
#[error("{stage} stage failed: {message}")]
pub struct StageError {
    pub stage: StageName,
    pub message: String,
}

impl StageError {
    pub fn new(stage: StageName, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// One job's settled outcome from a stage runner: the job (with whatever
/// context the unit wrote) and either the stage's payload or its error.
pub type Settled<T> = (Job, Result<T, StageError>);
