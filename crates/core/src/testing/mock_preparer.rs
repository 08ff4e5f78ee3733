//! Mock image preparer for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::asset::{AspectRatio, AssetReference};
use crate::services::{ImagePreparer, PrepareError, PreparedImage};

/// A recorded preparation call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrepare {
    pub file_name: String,
    pub ratio: String,
}

/// Mock implementation of the [`ImagePreparer`] trait.
///
/// Records every call and fails on demand for specific asset file names.
#[derive(Debug, Default)]
pub struct MockPreparer {
    calls: Arc<RwLock<Vec<RecordedPrepare>>>,
    fail_assets: Arc<RwLock<HashSet<String>>>,
}

impl MockPreparer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for this asset file name fail.
    pub async fn fail_for(&self, file_name: &str) {
        self.fail_assets.write().await.insert(file_name.to_string());
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedPrepare> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl ImagePreparer for MockPreparer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn prepare(
        &self,
        asset: &AssetReference,
        ratio: &AspectRatio,
    ) -> Result<PreparedImage, PrepareError> {
        self.calls.write().await.push(RecordedPrepare {
            file_name: asset.file_name.clone(),
            ratio: ratio.to_string(),
        });

        if self.fail_assets.read().await.contains(&asset.file_name) {
            return Err(PrepareError::Upload(format!(
                "upload rejected for '{}'",
                asset.file_name
            )));
        }

        Ok(PreparedImage {
            id: format!("prep-{}-{}", asset.file_name, ratio),
            url: format!("https://studio.test/prepared/{}", asset.file_name),
        })
    }
}
