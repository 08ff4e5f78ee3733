//! Mock compositor for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::{CompositeError, Compositor, FinalArtifact, MaskHandle, PreparedImage};

/// A recorded composition call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCompose {
    pub prepared_id: String,
    pub mask_id: Option<String>,
    pub text: String,
}

/// Mock implementation of the [`Compositor`] trait.
#[derive(Debug, Default)]
pub struct MockCompositor {
    calls: Arc<RwLock<Vec<RecordedCompose>>>,
    fail_ids: Arc<RwLock<HashSet<String>>>,
}

impl MockCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for this prepared-image id fail.
    pub async fn fail_for(&self, prepared_id: &str) {
        self.fail_ids.write().await.insert(prepared_id.to_string());
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCompose> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl Compositor for MockCompositor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn compose(
        &self,
        prepared: &PreparedImage,
        mask: Option<&MaskHandle>,
        text: &str,
    ) -> Result<FinalArtifact, CompositeError> {
        self.calls.write().await.push(RecordedCompose {
            prepared_id: prepared.id.clone(),
            mask_id: mask.map(|m| m.id.clone()),
            text: text.to_string(),
        });

        if self.fail_ids.read().await.contains(&prepared.id) {
            return Err(CompositeError::Service(format!(
                "composition failed for '{}'",
                prepared.id
            )));
        }

        Ok(FinalArtifact {
            id: format!("final-{}", prepared.id),
            url: format!("https://studio.test/finals/{}", prepared.id),
        })
    }
}
