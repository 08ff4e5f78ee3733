//! Batch run integration tests.
//!
//! These tests drive the whole pipeline against mock collaborators and a
//! real temporary asset root:
//! - Discovery over category directories on disk
//! - Stage progression (prepare -> mask -> compose -> publish)
//! - Per-job failure isolation and terminal-record accounting
//! - Report persistence

use std::io::Write;
use std::sync::Arc;

use tempfile::TempDir;

use batchpress_core::{
    config::{CampaignConfig, CategoryConfig},
    discover_assets, write_report, AspectRatio, AssetReference, BatchResult, Pipeline,
    PipelineConfig, Region, StageName,
    testing::{ManualClock, MockCompositor, MockMaskBuilder, MockPreparer, MockPublisher},
};

/// Test helper wiring the pipeline to mock collaborators.
struct TestHarness {
    pipeline: Pipeline<MockPreparer, MockMaskBuilder, MockCompositor, MockPublisher>,
    preparer: Arc<MockPreparer>,
    masker: Arc<MockMaskBuilder>,
    compositor: Arc<MockCompositor>,
    publisher: Arc<MockPublisher>,
    asset_root: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let preparer = Arc::new(MockPreparer::new());
        let masker = Arc::new(MockMaskBuilder::new());
        let compositor = Arc::new(MockCompositor::new());
        let publisher = Arc::new(MockPublisher::new());

        let pipeline = Pipeline::new(
            PipelineConfig::default(),
            Arc::clone(&preparer),
            Arc::clone(&masker),
            Arc::clone(&compositor),
            Arc::clone(&publisher),
        )
        .with_clock(Arc::new(ManualClock::new()));

        Self {
            pipeline,
            preparer,
            masker,
            compositor,
            publisher,
            asset_root: TempDir::new().expect("Failed to create asset root"),
        }
    }

    fn add_asset(&self, category: &str, file_name: &str) {
        let dir = self.asset_root.path().join(category);
        std::fs::create_dir_all(&dir).expect("Failed to create category dir");
        let mut file = std::fs::File::create(dir.join(file_name)).expect("Failed to create asset");
        file.write_all(b"image-bytes").expect("Failed to write asset");
    }

    async fn run(&self, campaign: &CampaignConfig) -> BatchResult {
        let categories: Vec<String> =
            campaign.categories.iter().map(|c| c.name.clone()).collect();
        let discovered = discover_assets(self.asset_root.path(), &categories)
            .await
            .expect("Discovery failed");
        self.pipeline.run(&discovered, campaign).await
    }
}

fn campaign(regions: &[&str], ratios: &[&str]) -> CampaignConfig {
    CampaignConfig {
        ratios: ratios.iter().map(|r| AspectRatio::new(*r)).collect(),
        categories: vec![CategoryConfig {
            name: "fragrances".to_string(),
            regions: regions.iter().map(|r| Region::new(*r)).collect(),
            headline: None,
        }],
        headline: "Discover more".to_string(),
    }
}

#[tokio::test]
async fn test_full_run_from_disk_to_report() {
    let harness = TestHarness::new();
    harness.add_asset("fragrances", "noir.png");
    harness.add_asset("fragrances", "rouge.png");

    let campaign = campaign(&["US", "FR"], &["1:1", "16:9"]);
    let result = harness.run(&campaign).await;

    // 2 assets x 2 regions x 2 ratios
    assert_eq!(result.summary.total, 8);
    assert_eq!(result.summary.succeeded, 8);
    assert_eq!(result.summary.failed, 0);

    assert_eq!(harness.preparer.call_count().await, 8);
    assert_eq!(harness.masker.call_count().await, 8);
    assert_eq!(harness.compositor.call_count().await, 8);
    assert_eq!(harness.publisher.call_count().await, 8);

    let report_dir = TempDir::new().unwrap();
    let path = write_report(report_dir.path(), &result).await.unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: BatchResult = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.run_id, result.run_id);
    assert_eq!(parsed.success.len(), 8);
}

#[tokio::test]
async fn test_job_failures_stay_isolated_across_stages() {
    let harness = TestHarness::new();
    harness.add_asset("fragrances", "a.png");
    harness.add_asset("fragrances", "b.png");
    harness.add_asset("fragrances", "c.png");

    harness.preparer.fail_for("a.png").await;
    harness.masker.fail_for("prep-b.png-1:1").await;

    let campaign = campaign(&["US"], &["1:1"]);
    let result = harness.run(&campaign).await;

    assert_eq!(result.summary.processed, 3);
    assert_eq!(result.summary.succeeded, 1);
    assert_eq!(result.summary.failed, 2);

    assert_eq!(result.success[0].key.asset_id, "c.png");
    let stages: Vec<StageName> = result.failures.iter().map(|f| f.stage).collect();
    assert!(stages.contains(&StageName::Prepare));
    assert!(stages.contains(&StageName::Mask));

    // Only the fully surviving job was composed and published.
    assert_eq!(harness.compositor.call_count().await, 1);
    assert_eq!(harness.publisher.call_count().await, 1);
}

#[tokio::test]
async fn test_masking_runs_strictly_in_job_order() {
    let harness = TestHarness::new();
    harness.add_asset("fragrances", "a.png");
    harness.add_asset("fragrances", "b.png");
    harness.add_asset("fragrances", "c.png");

    let campaign = campaign(&["US"], &["1:1"]);
    harness.run(&campaign).await;

    let calls = harness.masker.recorded_calls().await;
    assert_eq!(
        calls,
        vec!["prep-a.png-1:1", "prep-b.png-1:1", "prep-c.png-1:1"]
    );
}

#[tokio::test]
async fn test_empty_asset_file_becomes_load_failure() {
    let harness = TestHarness::new();
    harness.add_asset("fragrances", "good.png");
    // Empty file: discovered but unreadable.
    let dir = harness.asset_root.path().join("fragrances");
    std::fs::File::create(dir.join("empty.png")).unwrap();

    let campaign = campaign(&["US"], &["1:1"]);
    let result = harness.run(&campaign).await;

    assert_eq!(result.summary.succeeded, 1);
    assert_eq!(result.summary.failed, 1);
    assert_eq!(result.failures[0].stage, StageName::Load);
    assert_eq!(result.failures[0].key.asset_id, "empty.png");
    assert!(result.failures[0].error.contains("unreadable"));

    // The unreadable asset never reached any collaborator.
    assert_eq!(harness.preparer.call_count().await, 1);
}

#[tokio::test]
async fn test_synthetic_asset_joins_at_composition() {
    let harness = TestHarness::new();
    harness.add_asset("fragrances", "noir.png");

    let campaign = campaign(&["US"], &["1:1", "9:16"]);
    let categories: Vec<String> = campaign.categories.iter().map(|c| c.name.clone()).collect();
    let mut discovered = discover_assets(harness.asset_root.path(), &categories)
        .await
        .unwrap();
    discovered.assets.push(AssetReference::synthetic(
        "fragrances",
        "gen-001",
        AspectRatio::new("9:16"),
    ));

    let result = harness.pipeline.run(&discovered, &campaign).await;

    // noir.png runs both ratios; gen-001 only its own.
    assert_eq!(result.summary.succeeded, 3);
    assert_eq!(harness.preparer.call_count().await, 2);
    assert_eq!(harness.masker.call_count().await, 2);
    assert_eq!(harness.compositor.call_count().await, 3);
}
