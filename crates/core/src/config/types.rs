use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::asset::{AspectRatio, AssetReference, Region};
use crate::pipeline::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub campaign: CampaignConfig,
    pub studio: StudioConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Campaign configuration: which creatives to produce.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CampaignConfig {
    /// Aspect ratios to render, in output order.
    pub ratios: Vec<AspectRatio>,
    /// Categories in output order; each names its target regions.
    pub categories: Vec<CategoryConfig>,
    /// Overlay text composited onto every creative unless the category
    /// overrides it.
    pub headline: String,
}

impl CampaignConfig {
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Distinct regions across all categories, in configuration order.
    pub fn known_regions(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = Vec::new();
        for category in &self.categories {
            for region in &category.regions {
                if !regions.contains(region) {
                    regions.push(region.clone());
                }
            }
        }
        regions
    }

    pub fn headline_for(&self, category: &str) -> &str {
        self.category(category)
            .and_then(|c| c.headline.as_deref())
            .unwrap_or(&self.headline)
    }
}

/// One product category and its target regions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryConfig {
    pub name: String,
    pub regions: Vec<Region>,
    /// Optional category-specific overlay text.
    #[serde(default)]
    pub headline: Option<String>,
}

/// Studio service configuration (prepare, mask, compose, publish endpoints).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StudioConfig {
    /// Base URL of the studio service, e.g. "https://studio.example.com".
    pub base_url: String,
    /// API key passed on every call.
    pub api_key: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Asset input configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Root directory scanned for `<category>/<file>` assets.
    #[serde(default = "default_asset_root")]
    pub root: PathBuf,
    /// Synthetically produced assets, each valid for exactly one ratio.
    #[serde(default)]
    pub synthetic: Vec<SyntheticAssetConfig>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
            synthetic: Vec::new(),
        }
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

/// A declared synthetic asset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyntheticAssetConfig {
    pub category: String,
    /// Generated-image locator.
    pub name: String,
    pub ratio: AspectRatio,
}

impl SyntheticAssetConfig {
    pub fn as_asset(&self) -> AssetReference {
        AssetReference::synthetic(&self.category, &self.name, self.ratio.clone())
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory the run report is written to.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetOrigin;

    fn campaign() -> CampaignConfig {
        CampaignConfig {
            ratios: vec![AspectRatio::new("1:1")],
            categories: vec![
                CategoryConfig {
                    name: "fragrances".to_string(),
                    regions: vec![Region::new("US"), Region::new("FR")],
                    headline: Some("The new scent".to_string()),
                },
                CategoryConfig {
                    name: "makeup".to_string(),
                    regions: vec![Region::new("FR"), Region::new("JP")],
                    headline: None,
                },
            ],
            headline: "Discover more".to_string(),
        }
    }

    #[test]
    fn test_known_regions_distinct_in_config_order() {
        let regions = campaign().known_regions();
        assert_eq!(
            regions,
            vec![Region::new("US"), Region::new("FR"), Region::new("JP")]
        );
    }

    #[test]
    fn test_headline_override() {
        let campaign = campaign();
        assert_eq!(campaign.headline_for("fragrances"), "The new scent");
        assert_eq!(campaign.headline_for("makeup"), "Discover more");
        assert_eq!(campaign.headline_for("unknown"), "Discover more");
    }

    #[test]
    fn test_synthetic_asset_config_as_asset() {
        let synthetic = SyntheticAssetConfig {
            category: "fragrances".to_string(),
            name: "gen-001".to_string(),
            ratio: AspectRatio::new("9:16"),
        };
        let asset = synthetic.as_asset();
        assert_eq!(asset.origin, AssetOrigin::Synthetic);
        assert_eq!(asset.ratio_restriction, Some(AspectRatio::new("9:16")));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AssetsConfig::default().root, PathBuf::from("assets"));
        assert_eq!(OutputConfig::default().report_dir, PathBuf::from("reports"));
        assert_eq!(default_timeout(), 30);
    }
}
