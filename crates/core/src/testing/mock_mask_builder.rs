//! Mock mask builder for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::{MaskBuilder, MaskError, MaskHandle, PreparedImage};

/// Mock implementation of the [`MaskBuilder`] trait.
///
/// Records the prepared-image id of every call, in call order, so tests can
/// assert sequencing. Fails on demand for specific prepared-image ids,
/// either as a plain service error or as a rate-limit rejection.
#[derive(Debug, Default)]
pub struct MockMaskBuilder {
    calls: Arc<RwLock<Vec<String>>>,
    fail_ids: Arc<RwLock<HashSet<String>>>,
    rate_limit_ids: Arc<RwLock<HashSet<String>>>,
}

impl MockMaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for this prepared-image id fail.
    pub async fn fail_for(&self, prepared_id: &str) {
        self.fail_ids.write().await.insert(prepared_id.to_string());
    }

    /// Make every call for this prepared-image id get rate limited.
    pub async fn rate_limit_for(&self, prepared_id: &str) {
        self.rate_limit_ids
            .write()
            .await
            .insert(prepared_id.to_string());
    }

    /// Prepared-image ids of all calls, in call order.
    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl MaskBuilder for MockMaskBuilder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn build_mask(&self, prepared: &PreparedImage) -> Result<MaskHandle, MaskError> {
        self.calls.write().await.push(prepared.id.clone());

        if self.rate_limit_ids.read().await.contains(&prepared.id) {
            return Err(MaskError::RateLimited("too many requests".to_string()));
        }
        if self.fail_ids.read().await.contains(&prepared.id) {
            return Err(MaskError::Service(format!(
                "mask generation failed for '{}'",
                prepared.id
            )));
        }

        Ok(MaskHandle {
            id: format!("mask-{}", prepared.id),
            url: format!("https://studio.test/masks/{}", prepared.id),
        })
    }
}
