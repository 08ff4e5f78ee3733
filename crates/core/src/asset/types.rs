//! Asset reference model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An aspect ratio label as configured for the campaign, e.g. "1:1" or "16:9".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectRatio(String);

impl AspectRatio {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A target region code, e.g. "US" or "FR".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetOrigin {
    /// A pre-existing file discovered on disk. Needs the full pipeline.
    Local,
    /// A synthetically produced image, already sized for its one ratio.
    /// Skips preparation and masking.
    Synthetic,
}

/// A reference to one source asset, prior to job expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReference {
    pub origin: AssetOrigin,
    pub category: String,
    /// Filename for local assets, generated-image locator for synthetic ones.
    pub file_name: String,
    /// Synthetic assets are valid for exactly one ratio; local assets for all.
    pub ratio_restriction: Option<AspectRatio>,
}

impl AssetReference {
    /// Create a local (discovered) asset reference with no ratio restriction.
    pub fn local(category: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            origin: AssetOrigin::Local,
            category: category.into(),
            file_name: file_name.into(),
            ratio_restriction: None,
        }
    }

    /// Create a synthetic asset reference restricted to a single ratio.
    pub fn synthetic(
        category: impl Into<String>,
        file_name: impl Into<String>,
        ratio: AspectRatio,
    ) -> Self {
        Self {
            origin: AssetOrigin::Synthetic,
            category: category.into(),
            file_name: file_name.into(),
            ratio_restriction: Some(ratio),
        }
    }

    /// Whether this asset can produce a job for the given ratio.
    pub fn matches_ratio(&self, ratio: &AspectRatio) -> bool {
        match &self.ratio_restriction {
            Some(restricted) => restricted == ratio,
            None => true,
        }
    }
}
