//! Asset model and discovery.
//!
//! Assets are either pre-existing files found under the asset root or
//! synthetically produced images declared in configuration. Discovery never
//! crashes on a bad file: unreadable entries are carried separately so job
//! expansion can turn them into load-time failure records.

mod discovery;
mod types;

pub use discovery::{
    discover_assets, AssetSource, Discovered, DiscoveryError, FsAssetSource, UnreadableAsset,
};
pub use types::{AspectRatio, AssetOrigin, AssetReference, Region};
