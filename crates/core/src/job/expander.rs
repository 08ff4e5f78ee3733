//! Job expansion: asset references × campaign configuration → job set.

use tracing::{debug, warn};

use crate::asset::Discovered;
use crate::config::CampaignConfig;

use super::types::{Job, JobFailure, JobKey, StageName};

/// The result of expanding a discovery pass against a campaign.
#[derive(Debug, Default)]
pub struct Expansion {
    /// Jobs to run, in deterministic order: asset input order, then region
    /// order, then ratio order as configured.
    pub jobs: Vec<Job>,
    /// Load-time failures: unconfigured categories and unreadable assets.
    /// These never enter a stage but still reach the final report.
    pub load_failures: Vec<JobFailure>,
    /// Expected output count derived from configuration cardinality,
    /// independent of what actually runs.
    pub expected_total: usize,
}

/// Expand every asset into one job per configured (region × ratio).
///
/// Ratio-restricted assets contribute jobs only for their matching ratio;
/// other configured ratios get neither a job nor a failure. Assets whose
/// category has no configuration entry produce one load failure per
/// combination that would have been generated, taken over the campaign's
/// known region set.
pub fn expand_jobs(discovered: &Discovered, campaign: &CampaignConfig) -> Expansion {
    let mut expansion = Expansion::default();

    for asset in &discovered.assets {
        let ratios: Vec<_> = campaign
            .ratios
            .iter()
            .filter(|r| asset.matches_ratio(r))
            .collect();

        match campaign.category(&asset.category) {
            Some(category) => {
                expansion.expected_total += category.regions.len() * ratios.len();
                for region in &category.regions {
                    for ratio in &ratios {
                        expansion
                            .jobs
                            .push(Job::new(asset, region.clone(), (*ratio).clone()));
                    }
                }
            }
            None => {
                warn!(
                    category = %asset.category,
                    asset = %asset.file_name,
                    "Asset category has no campaign configuration"
                );
                let regions = campaign.known_regions();
                expansion.expected_total += regions.len() * ratios.len();
                for region in &regions {
                    for ratio in &ratios {
                        expansion.load_failures.push(JobFailure::new(
                            JobKey {
                                asset_id: asset.file_name.clone(),
                                category: asset.category.clone(),
                                region: region.clone(),
                                ratio: (*ratio).clone(),
                            },
                            StageName::Load,
                            format!(
                                "no configuration found for category '{}'",
                                asset.category
                            ),
                        ));
                    }
                }
            }
        }
    }

    for bad in &discovered.unreadable {
        // Restriction is unknowable for a file we could not read, so every
        // configured ratio counts as expected.
        let regions = campaign
            .category(&bad.category)
            .map(|c| c.regions.clone())
            .unwrap_or_else(|| campaign.known_regions());
        expansion.expected_total += regions.len() * campaign.ratios.len();
        for region in &regions {
            for ratio in &campaign.ratios {
                expansion.load_failures.push(JobFailure::new(
                    JobKey {
                        asset_id: bad.file_name.clone(),
                        category: bad.category.clone(),
                        region: region.clone(),
                        ratio: ratio.clone(),
                    },
                    StageName::Load,
                    format!("asset unreadable: {}", bad.reason),
                ));
            }
        }
    }

    debug!(
        jobs = expansion.jobs.len(),
        load_failures = expansion.load_failures.len(),
        expected_total = expansion.expected_total,
        "Job expansion finished"
    );
    expansion
}
