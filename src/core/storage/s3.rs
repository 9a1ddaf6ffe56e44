//! Amazon S3 storage through `object_store`.
//!
//! Store handles are bound to a single bucket, so one is built lazily for
//! every bucket the process touches and cached for reuse. Credentials come
//! from the explicit settings when present, otherwise from the standard AWS
//! environment variables (which is how Lambda exposes the execution role).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{Error as ObjectStoreError, ObjectStore, PutPayload};
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{ObjectStorage, PresignOperation, StorageError, StorageResult};

/// Connection settings shared by every bucket handle.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct S3Settings {
    pub region: Option<String>,
    /// Custom endpoint (e.g. a local MinIO); plain `http://` is allowed
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("has_explicit_credentials", &self.has_explicit_credentials())
            .finish()
    }
}

impl S3Settings {
    pub fn has_explicit_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

/// [`ObjectStorage`] backed by Amazon S3.
pub struct S3Storage {
    settings: S3Settings,
    stores: DashMap<String, Arc<AmazonS3>>,
}

impl S3Storage {
    pub fn new(settings: S3Settings) -> Self {
        Self {
            settings,
            stores: DashMap::new(),
        }
    }

    fn store_for(&self, bucket: &str) -> StorageResult<Arc<AmazonS3>> {
        if let Some(store) = self.stores.get(bucket) {
            return Ok(Arc::clone(store.value()));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(ref region) = self.settings.region {
            builder = builder.with_region(region);
        }
        if let Some(ref endpoint) = self.settings.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        if let (Some(key_id), Some(secret)) = (
            self.settings.access_key_id.as_ref(),
            self.settings.secret_access_key.as_ref(),
        ) {
            builder = builder
                .with_access_key_id(key_id)
                .with_secret_access_key(secret);
            if let Some(ref token) = self.settings.session_token {
                builder = builder.with_token(token);
            }
        }

        let store = Arc::new(builder.build().map_err(|e| {
            StorageError::Configuration(format!("Failed to build S3 client for bucket {bucket}: {e}"))
        })?);

        info!(bucket = %bucket, "Created S3 store handle");
        self.stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

fn object_path(key: &str) -> StorageResult<ObjectPath> {
    ObjectPath::parse(key).map_err(|e| StorageError::InvalidKey {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let store = self.store_for(bucket)?;
        let path = object_path(key)?;

        debug!(bucket = %bucket, key = %key, "Fetching object");

        let result = match store.get(&path).await {
            Ok(result) => result,
            Err(ObjectStoreError::NotFound { .. }) => {
                return Err(StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = result.bytes().await?;
        debug!(bucket = %bucket, key = %key, size = bytes.len(), "Fetched object");
        Ok(bytes)
    }

    async fn upload(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let path = object_path(key)?;
        let size = body.len();

        store.put(&path, PutPayload::from(body)).await?;

        debug!(bucket = %bucket, key = %key, size = size, "Stored object");
        Ok(())
    }

    async fn presigned_url(
        &self,
        operation: PresignOperation,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for(bucket)?;
        let path = object_path(key)?;

        let url = store
            .signed_url(operation.method(), &path, expires_in)
            .await?;

        debug!(
            bucket = %bucket,
            key = %key,
            method = %operation.method(),
            expires_in_secs = expires_in.as_secs(),
            "Generated presigned URL"
        );
        Ok(url.to_string())
    }
}
