//! Asset discovery abstraction and filesystem implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::AssetReference;

/// Errors that abort discovery entirely.
///
/// Per-file problems never surface here; they are reported through
/// [`Discovered::unreadable`] so a single bad file cannot sink the batch.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The asset root directory does not exist.
    #[error("asset root not found: {0}")]
    RootNotFound(PathBuf),

    /// I/O error while listing the root.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An asset that was found but could not be read.
///
/// These become load-time failure records during job expansion.
#[derive(Debug, Clone)]
pub struct UnreadableAsset {
    pub category: String,
    pub file_name: String,
    pub reason: String,
}

/// The outcome of a discovery pass.
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub assets: Vec<AssetReference>,
    pub unreadable: Vec<UnreadableAsset>,
}

impl Discovered {
    /// Wrap an already-known asset list, with nothing unreadable.
    pub fn from_assets(assets: Vec<AssetReference>) -> Self {
        Self {
            assets,
            unreadable: Vec::new(),
        }
    }
}

/// A source of asset references.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Discover assets for the given categories.
    async fn discover(&self, known_categories: &[String]) -> Result<Discovered, DiscoveryError>;
}

/// Filesystem asset source.
///
/// Scans `<root>/<category>/` for files. Entries that cannot be stat'ed or
/// are empty are reported as unreadable rather than failing the scan.
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn scan_category(
        &self,
        category: &str,
        discovered: &mut Discovered,
    ) -> Result<(), DiscoveryError> {
        let dir = self.root.join(category);
        if !dir.is_dir() {
            debug!(category = category, "No asset directory for category");
            return Ok(());
        }

        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut names: Vec<(String, PathBuf)> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            names.push((file_name, path));
        }
        // read_dir order is platform-dependent; sort for reproducible expansion
        names.sort();

        for (file_name, path) in names {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.len() == 0 => {
                    warn!(category = category, file = %file_name, "Skipping empty asset file");
                    discovered.unreadable.push(UnreadableAsset {
                        category: category.to_string(),
                        file_name,
                        reason: "file is empty".to_string(),
                    });
                }
                Ok(_) => {
                    discovered
                        .assets
                        .push(AssetReference::local(category, file_name));
                }
                Err(e) => {
                    warn!(category = category, file = %file_name, error = %e, "Unreadable asset file");
                    discovered.unreadable.push(UnreadableAsset {
                        category: category.to_string(),
                        file_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    fn name(&self) -> &str {
        "fs"
    }

    async fn discover(&self, known_categories: &[String]) -> Result<Discovered, DiscoveryError> {
        if !self.root.is_dir() {
            return Err(DiscoveryError::RootNotFound(self.root.clone()));
        }

        let mut discovered = Discovered::default();
        for category in known_categories {
            self.scan_category(category, &mut discovered).await?;
        }

        debug!(
            assets = discovered.assets.len(),
            unreadable = discovered.unreadable.len(),
            "Asset discovery finished"
        );
        Ok(discovered)
    }
}

/// Helper for tests and the runner: scan root for asset files.
pub async fn discover_assets(
    root: &Path,
    known_categories: &[String],
) -> Result<Discovered, DiscoveryError> {
    FsAssetSource::new(root).discover(known_categories).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetOrigin;
    use std::io::Write;

    #[tokio::test]
    async fn test_discover_missing_root() {
        let source = FsAssetSource::new("/nonexistent/assets");
        let result = source.discover(&["fragrances".to_string()]).await;
        assert!(matches!(result, Err(DiscoveryError::RootNotFound(_))));
    }

    #[tokio::test]
    async fn test_discover_finds_files_in_category_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("fragrances");
        std::fs::create_dir(&dir).unwrap();
        for name in ["b.png", "a.png"] {
            let mut f = std::fs::File::create(dir.join(name)).unwrap();
            f.write_all(b"img").unwrap();
        }

        let source = FsAssetSource::new(tmp.path());
        let discovered = source.discover(&["fragrances".to_string()]).await.unwrap();

        assert_eq!(discovered.assets.len(), 2);
        // Sorted for determinism
        assert_eq!(discovered.assets[0].file_name, "a.png");
        assert_eq!(discovered.assets[1].file_name, "b.png");
        assert_eq!(discovered.assets[0].origin, AssetOrigin::Local);
        assert!(discovered.unreadable.is_empty());
    }

    #[tokio::test]
    async fn test_discover_reports_empty_files_as_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("makeup");
        std::fs::create_dir(&dir).unwrap();
        std::fs::File::create(dir.join("empty.png")).unwrap();

        let source = FsAssetSource::new(tmp.path());
        let discovered = source.discover(&["makeup".to_string()]).await.unwrap();

        assert!(discovered.assets.is_empty());
        assert_eq!(discovered.unreadable.len(), 1);
        assert_eq!(discovered.unreadable[0].file_name, "empty.png");
        assert_eq!(discovered.unreadable[0].reason, "file is empty");
    }

    #[tokio::test]
    async fn test_discover_skips_unknown_category_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("other");
        std::fs::create_dir(&dir).unwrap();
        let mut f = std::fs::File::create(dir.join("x.png")).unwrap();
        f.write_all(b"img").unwrap();

        let source = FsAssetSource::new(tmp.path());
        let discovered = source.discover(&["fragrances".to_string()]).await.unwrap();
        assert!(discovered.assets.is_empty());
    }
}
