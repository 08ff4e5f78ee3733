//! Run report persistence.
//!
//! Exactly one report artifact is written per run, at the end of the run;
//! there are no incremental or partial writes.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::job::BatchResult;

/// Errors while writing the run report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

/// Report file name, derived from the run's start timestamp.
pub fn report_file_name(result: &BatchResult) -> String {
    format!(
        "batchpress-report-{}.json",
        result.started_at.format("%Y%m%dT%H%M%SZ")
    )
}

/// Write the consolidated report into `dir`, creating it if needed.
pub async fn write_report(dir: &Path, result: &BatchResult) -> Result<PathBuf, ReportError> {
    let json = serde_json::to_vec_pretty(result)
        .map_err(|e| ReportError::Serialize(e.to_string()))?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(result));
    tokio::fs::write(&path, json).await?;

    info!(path = %path.display(), "Run report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{BatchResult, BatchSummary};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn result() -> BatchResult {
        BatchResult {
            run_id: Uuid::new_v4(),
            started_at: Utc.with_ymd_and_hms(2026, 8, 27, 10, 30, 0).unwrap(),
            finished_at: Utc::now(),
            success: vec![],
            failures: vec![],
            summary: BatchSummary::default(),
        }
    }

    #[test]
    fn test_report_file_name_uses_start_timestamp() {
        assert_eq!(
            report_file_name(&result()),
            "batchpress-report-20260827T103000Z.json"
        );
    }

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let result = result();

        let path = write_report(tmp.path(), &result).await.unwrap();
        assert!(path.exists());

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: BatchResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.run_id, result.run_id);
        assert_eq!(parsed.summary, result.summary);
    }

    #[tokio::test]
    async fn test_write_report_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("reports");
        let path = write_report(&dir, &result()).await.unwrap();
        assert!(path.starts_with(&dir));
    }
}
