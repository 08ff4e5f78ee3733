//! HTTP-backed implementations of the collaborator traits.
//!
//! The studio service exposes one endpoint per operation, each with its own
//! response nesting. Every response is normalized into the shapes in
//! [`super::types`] right here; orchestration logic never sees the raw
//! payloads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::asset::{AspectRatio, AssetReference};
use crate::config::StudioConfig;

use super::error::{CompositeError, MaskError, PrepareError, PublishError};
use super::traits::{Compositor, ImagePreparer, MaskBuilder, Publisher};
use super::types::{FinalArtifact, MaskHandle, PreparedImage, PublishedArtifact};

/// Client for the studio service, implementing all four collaborator traits.
pub struct RemoteStudio {
    client: Client,
    config: StudioConfig,
}

impl RemoteStudio {
    /// Create a new studio client with the given configuration.
    pub fn new(config: StudioConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}?api_key={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(&self.config.api_key)
        )
    }

    /// POST a JSON body and decode the JSON response, with uniform transport
    /// and status handling. Error strings are mapped into the caller's error
    /// type at each call site.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ServiceCallError> {
        let url = self.endpoint(path);
        debug!(path = path, "Calling studio service");

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceCallError::Transport("request timed out".to_string())
            } else if e.is_connect() {
                ServiceCallError::Transport(format!("connection failed: {}", e))
            } else {
                ServiceCallError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(ServiceCallError::RateLimited(retry_after));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceCallError::Status(format!(
                "HTTP {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceCallError::Status(format!("failed to parse response: {}", e)))
    }
}

/// Intermediate call error, refined into per-service error enums at each
/// trait impl.
#[derive(Debug)]
enum ServiceCallError {
    Transport(String),
    Status(String),
    RateLimited(String),
}

impl ServiceCallError {
    fn into_message(self) -> String {
        match self {
            ServiceCallError::Transport(m)
            | ServiceCallError::Status(m)
            | ServiceCallError::RateLimited(m) => m,
        }
    }
}

// Response shapes, one per endpoint. The nesting is not uniform across the
// studio API, which is exactly why normalization happens here.

#[derive(Debug, Deserialize)]
struct PrepareResponse {
    data: PrepareData,
}

#[derive(Debug, Deserialize)]
struct PrepareData {
    image: PrepareImageBody,
}

#[derive(Debug, Deserialize)]
struct PrepareImageBody {
    id: String,
    url: String,
}

impl From<PrepareResponse> for PreparedImage {
    fn from(resp: PrepareResponse) -> Self {
        PreparedImage {
            id: resp.data.image.id,
            url: resp.data.image.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MaskResponse {
    mask: MaskBody,
}

#[derive(Debug, Deserialize)]
struct MaskBody {
    id: String,
    download_url: String,
}

impl From<MaskResponse> for MaskHandle {
    fn from(resp: MaskResponse) -> Self {
        MaskHandle {
            id: resp.mask.id,
            url: resp.mask.download_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComposeResponse {
    result_id: String,
    result_url: String,
}

impl From<ComposeResponse> for FinalArtifact {
    fn from(resp: ComposeResponse) -> Self {
        FinalArtifact {
            id: resp.result_id,
            url: resp.result_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    asset: PublishBody,
}

#[derive(Debug, Deserialize)]
struct PublishBody {
    public_url: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl From<PublishResponse> for PublishedArtifact {
    fn from(resp: PublishResponse) -> Self {
        PublishedArtifact {
            url: resp.asset.public_url,
            expires_at: resp.asset.expires_at,
        }
    }
}

#[async_trait]
impl ImagePreparer for RemoteStudio {
    fn name(&self) -> &str {
        "studio"
    }

    async fn prepare(
        &self,
        asset: &AssetReference,
        ratio: &AspectRatio,
    ) -> Result<PreparedImage, PrepareError> {
        let body = json!({
            "source": asset.file_name,
            "category": asset.category,
            "target_ratio": ratio.as_str(),
        });
        let resp: PrepareResponse = self
            .post_json("/v1/images/prepare", body)
            .await
            .map_err(|e| PrepareError::Upload(e.into_message()))?;
        Ok(resp.into())
    }
}

#[async_trait]
impl MaskBuilder for RemoteStudio {
    fn name(&self) -> &str {
        "studio"
    }

    async fn build_mask(&self, prepared: &PreparedImage) -> Result<MaskHandle, MaskError> {
        let body = json!({
            "image_id": prepared.id,
            "image_url": prepared.url,
        });
        let resp: MaskResponse = self.post_json("/v1/masks", body).await.map_err(|e| match e {
            ServiceCallError::RateLimited(m) => {
                MaskError::RateLimited(format!("retry-after: {}", m))
            }
            other => MaskError::Service(other.into_message()),
        })?;
        Ok(resp.into())
    }
}

#[async_trait]
impl Compositor for RemoteStudio {
    fn name(&self) -> &str {
        "studio"
    }

    async fn compose(
        &self,
        prepared: &PreparedImage,
        mask: Option<&MaskHandle>,
        text: &str,
    ) -> Result<FinalArtifact, CompositeError> {
        let body = json!({
            "image_url": prepared.url,
            "mask_url": mask.map(|m| m.url.clone()),
            "caption": text,
        });
        let resp: ComposeResponse = self
            .post_json("/v1/compose", body)
            .await
            .map_err(|e| CompositeError::Service(e.into_message()))?;
        Ok(resp.into())
    }
}

#[async_trait]
impl Publisher for RemoteStudio {
    fn name(&self) -> &str {
        "studio"
    }

    async fn publish(&self, artifact: &FinalArtifact) -> Result<PublishedArtifact, PublishError> {
        let body = json!({
            "artifact_id": artifact.id,
            "artifact_url": artifact.url,
        });
        let resp: PublishResponse = self
            .post_json("/v1/publish", body)
            .await
            .map_err(|e| PublishError::Storage(e.into_message()))?;
        Ok(resp.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_response_normalization() {
        let raw = r#"{"data":{"image":{"id":"img-7","url":"https://studio.test/img-7"}}}"#;
        let resp: PrepareResponse = serde_json::from_str(raw).unwrap();
        let prepared: PreparedImage = resp.into();
        assert_eq!(prepared.id, "img-7");
        assert_eq!(prepared.url, "https://studio.test/img-7");
    }

    #[test]
    fn test_mask_response_normalization() {
        let raw = r#"{"mask":{"id":"m-1","download_url":"https://studio.test/m-1.png"}}"#;
        let resp: MaskResponse = serde_json::from_str(raw).unwrap();
        let mask: MaskHandle = resp.into();
        assert_eq!(mask.id, "m-1");
        assert_eq!(mask.url, "https://studio.test/m-1.png");
    }

    #[test]
    fn test_compose_response_normalization() {
        let raw = r#"{"result_id":"c-9","result_url":"https://studio.test/c-9.png"}"#;
        let resp: ComposeResponse = serde_json::from_str(raw).unwrap();
        let artifact: FinalArtifact = resp.into();
        assert_eq!(artifact.id, "c-9");
        assert_eq!(artifact.url, "https://studio.test/c-9.png");
    }

    #[test]
    fn test_publish_response_normalization_without_expiry() {
        let raw = r#"{"asset":{"public_url":"https://cdn.test/c-9"}}"#;
        let resp: PublishResponse = serde_json::from_str(raw).unwrap();
        let published: PublishedArtifact = resp.into();
        assert_eq!(published.url, "https://cdn.test/c-9");
        assert!(published.expires_at.is_none());
    }

    #[test]
    fn test_publish_response_normalization_with_expiry() {
        let raw = r#"{"asset":{"public_url":"https://cdn.test/c-9","expires_at":"2026-09-01T00:00:00Z"}}"#;
        let resp: PublishResponse = serde_json::from_str(raw).unwrap();
        let published: PublishedArtifact = resp.into();
        assert!(published.expires_at.is_some());
    }

    #[test]
    fn test_endpoint_encodes_api_key_and_trims_slash() {
        let studio = RemoteStudio::new(StudioConfig {
            base_url: "https://studio.test/".to_string(),
            api_key: "key with spaces".to_string(),
            timeout_secs: 5,
        });
        let url = studio.endpoint("/v1/masks");
        assert_eq!(
            url,
            "https://studio.test/v1/masks?api_key=key%20with%20spaces"
        );
    }
}
