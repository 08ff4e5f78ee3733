//! Mock publisher for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::{FinalArtifact, PublishError, PublishedArtifact, Publisher};

/// Mock implementation of the [`Publisher`] trait.
#[derive(Debug, Default)]
pub struct MockPublisher {
    calls: Arc<RwLock<Vec<String>>>,
    fail_ids: Arc<RwLock<HashSet<String>>>,
    expires_at: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for this artifact id fail.
    pub async fn fail_for(&self, artifact_id: &str) {
        self.fail_ids.write().await.insert(artifact_id.to_string());
    }

    /// Attach an expiry timestamp to every published artifact.
    pub async fn set_expires_at(&self, expires_at: DateTime<Utc>) {
        *self.expires_at.write().await = Some(expires_at);
    }

    /// Artifact ids of all calls, in call order.
    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn publish(&self, artifact: &FinalArtifact) -> Result<PublishedArtifact, PublishError> {
        self.calls.write().await.push(artifact.id.clone());

        if self.fail_ids.read().await.contains(&artifact.id) {
            return Err(PublishError::Storage(format!(
                "bucket rejected '{}'",
                artifact.id
            )));
        }

        Ok(PublishedArtifact {
            url: format!("https://cdn.test/{}", artifact.id),
            expires_at: *self.expires_at.read().await,
        })
    }
}
