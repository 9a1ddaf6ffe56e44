//! Object storage access.
//!
//! Handlers depend on the [`ObjectStorage`] trait so the S3 implementation
//! can be swapped for an in-memory store in tests.

mod s3;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use s3::{S3Settings, S3Storage};

/// Lifetime of an upload (PUT) authorization.
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(300);

/// Lifetime of an audio download (GET) authorization.
pub const AUDIO_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by an object storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage backend error: {0}")]
    Backend(#[from] object_store::Error),
}

/// Storage operation a presigned URL grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresignOperation {
    /// Write one object (`PUT`)
    Put,
    /// Read one object (`GET`)
    Get,
}

impl PresignOperation {
    pub fn method(&self) -> http::Method {
        match self {
            Self::Put => http::Method::PUT,
            Self::Get => http::Method::GET,
        }
    }
}

/// Bucket-addressed object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch the full content of an object.
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;

    /// Create or overwrite an object.
    async fn upload(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()>;

    /// Issue a time-limited URL granting `operation` on one object.
    async fn presigned_url(
        &self,
        operation: PresignOperation,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;
}
