//! Normalized artifact handles returned by collaborator services.
//!
//! Collaborator responses nest their fields under varying names; adapters
//! map them into these shapes immediately so nothing ambiguous reaches
//! orchestration logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::AssetReference;

/// A prepared (resized/expanded) source image, ready for masking and
/// composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedImage {
    pub id: String,
    pub url: String,
}

impl PreparedImage {
    /// Synthetic assets arrive already sized for their one ratio; they act
    /// as their own prepared image on the fast path.
    pub fn from_asset(asset: &AssetReference) -> Self {
        Self {
            id: asset.file_name.clone(),
            url: asset.file_name.clone(),
        }
    }
}

/// A subject mask produced by the throttled masking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskHandle {
    pub id: String,
    pub url: String,
}

/// The composited creative, prior to publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalArtifact {
    pub id: String,
    pub url: String,
}

/// A published artifact with its retrievable locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedArtifact {
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
