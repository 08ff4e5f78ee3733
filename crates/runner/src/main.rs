use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use batchpress_core::{
    discover_assets, load_config, validate_config, write_report, Config, Discovered, Pipeline,
    RemoteStudio,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("batchpress {}", VERSION);

    // Determine config path
    let config_path = std::env::var("BATCHPRESS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Log a stable fingerprint instead of the config itself; the config
    // carries the studio API key.
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        categories = config.campaign.categories.len(),
        ratios = config.campaign.ratios.len(),
        config_hash = &config_hash[..16],
        "Configuration loaded"
    );

    // Discover input assets
    let discovered = discover_inputs(&config)
        .await
        .context("Asset discovery failed")?;
    info!(
        assets = discovered.assets.len(),
        unreadable = discovered.unreadable.len(),
        "Asset discovery finished"
    );

    // One studio client backs all four collaborator roles
    let studio = Arc::new(RemoteStudio::new(config.studio.clone()));
    let pipeline = Pipeline::new(
        config.pipeline.clone(),
        Arc::clone(&studio),
        Arc::clone(&studio),
        Arc::clone(&studio),
        Arc::clone(&studio),
    );

    let result = pipeline.run(&discovered, &config.campaign).await;

    let report_path = write_report(&config.output.report_dir, &result)
        .await
        .context("Failed to write run report")?;
    info!(report = %report_path.display(), "Run report written");

    // Per-job failures are part of a normal run; they are reported, not
    // escalated into the exit status.
    if result.summary.failed > 0 {
        warn!(
            failed = result.summary.failed,
            succeeded = result.summary.succeeded,
            total = result.summary.total,
            "Run finished with job failures"
        );
    } else {
        info!(
            succeeded = result.summary.succeeded,
            total = result.summary.total,
            "Run finished"
        );
    }

    Ok(())
}

/// Scan the asset root for the configured categories and append the declared
/// synthetic assets.
async fn discover_inputs(config: &Config) -> Result<Discovered> {
    let categories: Vec<String> = config
        .campaign
        .categories
        .iter()
        .map(|c| c.name.clone())
        .collect();

    let mut discovered = discover_assets(&config.assets.root, &categories).await?;
    for synthetic in &config.assets.synthetic {
        discovered.assets.push(synthetic.as_asset());
    }
    Ok(discovered)
}
