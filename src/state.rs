//! Service clients shared by the handlers.
//!
//! Clients are built once at process start from [`AppConfig`] and shared by
//! reference for the life of the process.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use tracing::info;

use crate::config::{AppConfig, ConfigResult};
use crate::core::notify::SesNotifier;
use crate::core::pipeline::ConversionPipeline;
use crate::core::storage::{ObjectStorage, S3Storage};
use crate::core::tts::PollySynthesizer;

const CREDENTIALS_PROVIDER_NAME: &str = "text-to-audio-config";

/// State of the upload authorizer router
pub struct AuthorizerState {
    /// Bucket that receives uploads
    pub bucket: String,
    pub storage: Arc<dyn ObjectStorage>,
}

impl AuthorizerState {
    pub fn new(bucket: impl Into<String>, storage: Arc<dyn ObjectStorage>) -> Arc<Self> {
        Arc::new(Self {
            bucket: bucket.into(),
            storage,
        })
    }

    /// Build the authorizer state backed by S3.
    pub fn from_config(config: &AppConfig) -> ConfigResult<Arc<Self>> {
        let bucket = config.require_bucket()?;
        let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(config.s3_settings()));

        info!(bucket = %bucket, "Upload authorizer initialized");
        Ok(Self::new(bucket, storage))
    }
}

/// Resolve the shared AWS SDK configuration.
///
/// Explicit region and credentials from the configuration take precedence;
/// anything unset falls through to the SDK default provider chain.
pub async fn load_aws_config(config: &AppConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(ref region) = config.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let (Some(key_id), Some(secret)) = (
        config.aws_access_key_id.as_ref(),
        config.aws_secret_access_key.as_ref(),
    ) {
        loader = loader.credentials_provider(Credentials::new(
            key_id.clone(),
            secret.clone(),
            config.aws_session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
    }

    loader.load().await
}

/// Build the conversion pipeline with S3, Polly and SES clients.
pub async fn build_pipeline(config: &AppConfig) -> ConfigResult<ConversionPipeline> {
    let sender = config.require_sender()?;
    let sdk_config = load_aws_config(config).await;

    let storage = Arc::new(S3Storage::new(config.s3_settings()));
    let synthesizer = Arc::new(
        PollySynthesizer::new(aws_sdk_polly::Client::new(&sdk_config))
            .with_engine(config.polly_engine),
    );
    let notifier = Arc::new(SesNotifier::new(aws_sdk_sesv2::Client::new(&sdk_config)));

    info!(
        region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
        engine = ?config.polly_engine,
        scratch_dir = %config.scratch_dir.display(),
        "Conversion pipeline initialized"
    );

    Ok(ConversionPipeline::new(
        storage,
        synthesizer,
        notifier,
        sender,
        config.scratch_dir.clone(),
    ))
}
