pub mod asset;
pub mod config;
pub mod job;
pub mod pipeline;
pub mod services;
pub mod stage;
pub mod testing;
pub mod throttle;

pub use asset::{
    discover_assets, AspectRatio, AssetOrigin, AssetReference, AssetSource, Discovered,
    DiscoveryError, FsAssetSource, Region,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CampaignConfig, Config, ConfigError,
    StudioConfig,
};
pub use job::{BatchResult, BatchSummary, Job, JobFailure, JobKey, JobSuccess, StageName};
pub use pipeline::{write_report, Pipeline, PipelineConfig, ReportError};
pub use services::{Compositor, ImagePreparer, MaskBuilder, Publisher, RemoteStudio};
