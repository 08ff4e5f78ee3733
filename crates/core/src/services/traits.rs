//! Trait definitions for the external collaborator services.

use async_trait::async_trait;

use crate::asset::{AspectRatio, AssetReference};

use super::error::{CompositeError, MaskError, PrepareError, PublishError};
use super::types::{FinalArtifact, MaskHandle, PreparedImage, PublishedArtifact};

/// Prepares a source asset for a target ratio (resize, outpaint, upload).
///
/// Parallel-safe: the pipeline fans calls out concurrently.
#[async_trait]
pub trait ImagePreparer: Send + Sync {
    /// Returns the name of this preparer implementation.
    fn name(&self) -> &str;

    async fn prepare(
        &self,
        asset: &AssetReference,
        ratio: &AspectRatio,
    ) -> Result<PreparedImage, PrepareError>;
}

/// Builds a subject mask for a prepared image.
///
/// The backing service enforces a hard per-interval rate limit; this trait
/// must only ever be invoked through the sequential stage runner.
#[async_trait]
pub trait MaskBuilder: Send + Sync {
    /// Returns the name of this mask builder implementation.
    fn name(&self) -> &str;

    async fn build_mask(&self, prepared: &PreparedImage) -> Result<MaskHandle, MaskError>;
}

/// Composites the prepared image, optional mask and overlay text into the
/// final creative.
///
/// Parallel-safe.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Returns the name of this compositor implementation.
    fn name(&self) -> &str;

    async fn compose(
        &self,
        prepared: &PreparedImage,
        mask: Option<&MaskHandle>,
        text: &str,
    ) -> Result<FinalArtifact, CompositeError>;
}

/// Publishes a final artifact and issues a retrievable locator.
///
/// Parallel-safe.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Returns the name of this publisher implementation.
    fn name(&self) -> &str;

    async fn publish(&self, artifact: &FinalArtifact) -> Result<PublishedArtifact, PublishError>;
}
