//! Testing utilities and mock implementations.
//!
//! Mock implementations of all collaborator service traits plus a manual
//! clock, allowing full pipeline tests without real infrastructure or
//! wall-clock waits.
//!
//! # Example
//!
//! ```rust,ignore
//! use batchpress_core::testing::{ManualClock, MockMaskBuilder, MockPreparer};
//!
//! let preparer = MockPreparer::new();
//! let masker = MockMaskBuilder::new();
//!
//! // Configure mock behavior
//! preparer.fail_for("broken.png").await;
//!
//! // Drive the pipeline and assert on recorded calls...
//! ```

mod manual_clock;
mod mock_compositor;
mod mock_mask_builder;
mod mock_preparer;
mod mock_publisher;

pub use manual_clock::ManualClock;
pub use mock_compositor::{MockCompositor, RecordedCompose};
pub use mock_mask_builder::MockMaskBuilder;
pub use mock_preparer::{MockPreparer, RecordedPrepare};
pub use mock_publisher::MockPublisher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::asset::{AspectRatio, AssetReference, Discovered, Region};
    use crate::config::{CampaignConfig, CategoryConfig};

    /// A local asset reference with reasonable defaults.
    pub fn asset(category: &str, file_name: &str) -> AssetReference {
        AssetReference::local(category, file_name)
    }

    /// A discovery result containing only readable local assets.
    pub fn discovered(assets: Vec<AssetReference>) -> Discovered {
        Discovered::from_assets(assets)
    }

    /// A single-category campaign with the given ratios and regions.
    pub fn campaign(category: &str, regions: &[&str], ratios: &[&str]) -> CampaignConfig {
        CampaignConfig {
            ratios: ratios.iter().map(|r| AspectRatio::new(*r)).collect(),
            categories: vec![CategoryConfig {
                name: category.to_string(),
                regions: regions.iter().map(|r| Region::new(*r)).collect(),
                headline: None,
            }],
            headline: "Discover more".to_string(),
        }
    }
}
