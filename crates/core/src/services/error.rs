//! Error types for collaborator services.

use thiserror::Error;

/// Errors from the image preparation service.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// Local I/O failed while reading the source asset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Uploading or requesting preparation failed.
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Errors from the masking service.
#[derive(Debug, Error)]
pub enum MaskError {
    /// The service rejected the call due to its rate limit.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The service failed for any other reason.
    #[error("mask service error: {0}")]
    Service(String),
}

/// Errors from the composition service.
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("compose service error: {0}")]
    Service(String),
}

/// Errors from the publishing service.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MaskError::RateLimited("retry in 200ms".to_string());
        assert_eq!(err.to_string(), "rate limited: retry in 200ms");

        let err = PublishError::Storage("bucket unavailable".to_string());
        assert_eq!(err.to_string(), "storage error: bucket unavailable");
    }
}
