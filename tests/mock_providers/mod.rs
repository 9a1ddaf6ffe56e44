//! In-memory stand-ins for the AWS services
//!
//! - `MemoryStorage` - bucket/key map with recorded presign requests
//! - `RecordingSynthesizer` - returns fixed audio and records every request
//! - `RecordingNotifier` - records every email, optionally failing delivery

// Not every test binary uses every helper
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use text_to_audio::core::notify::{EmailMessage, Notifier, NotifyError, NotifyResult};
use text_to_audio::core::storage::{
    ObjectStorage, PresignOperation, StorageError, StorageResult,
};
use text_to_audio::core::tts::{PollyVoice, SpeechSynthesizer, SynthesisError, SynthesisResult};

/// Audio returned by [`RecordingSynthesizer`]
pub const FAKE_MP3: &[u8] = b"ID3\x04\x00fake-mp3-frames";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignCall {
    pub operation: PresignOperation,
    pub bucket: String,
    pub key: String,
    pub expires_in: Duration,
}

/// Object storage held in memory
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    presigns: Mutex<Vec<PresignCall>>,
    uploads: Mutex<Vec<(String, String)>>,
    failing_uploads: Mutex<HashSet<String>>,
    fail_presign: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.into());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys written through `upload`, in order
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn presigns(&self) -> Vec<PresignCall> {
        self.presigns.lock().unwrap().clone()
    }

    pub fn fail_presign(&self) {
        *self.fail_presign.lock().unwrap() = true;
    }

    /// Reject every upload to `key`
    pub fn fail_upload_to(&self, key: &str) {
        self.failing_uploads.lock().unwrap().insert(key.to_string());
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        self.get(bucket, key).ok_or_else(|| StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn upload(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()> {
        if self.failing_uploads.lock().unwrap().contains(key) {
            return Err(StorageError::Backend(object_store::Error::Generic {
                store: "S3",
                source: format!("PutObject {bucket}/{key}: SlowDown: Please reduce your request rate")
                    .into(),
            }));
        }

        self.uploads
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        self.put(bucket, key, body);
        Ok(())
    }

    async fn presigned_url(
        &self,
        operation: PresignOperation,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if *self.fail_presign.lock().unwrap() {
            return Err(StorageError::Configuration(
                "signing credentials unavailable".to_string(),
            ));
        }

        self.presigns.lock().unwrap().push(PresignCall {
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
            expires_in,
        });

        Ok(format!(
            "https://{bucket}.s3.amazonaws.com/{key}?X-Amz-Method={}&X-Amz-Expires={}",
            operation.method(),
            expires_in.as_secs()
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisCall {
    pub text: String,
    pub voice: String,
}

/// Synthesizer returning [`FAKE_MP3`]
#[derive(Default)]
pub struct RecordingSynthesizer {
    calls: Mutex<Vec<SynthesisCall>>,
    fail_on: Mutex<HashSet<String>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Fail any request whose text contains `marker`
    pub fn fail_when_text_contains(&self, marker: &str) {
        self.fail_on.lock().unwrap().insert(marker.to_string());
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn synthesize(&self, text: &str, voice: &PollyVoice) -> SynthesisResult<Bytes> {
        self.calls.lock().unwrap().push(SynthesisCall {
            text: text.to_string(),
            voice: voice.as_str().to_string(),
        });

        let should_fail = self
            .fail_on
            .lock()
            .unwrap()
            .iter()
            .any(|marker| text.contains(marker.as_str()));
        if should_fail {
            return Err(SynthesisError::ProviderError(
                "ThrottlingException: Rate exceeded".to_string(),
            ));
        }

        Ok(Bytes::from_static(FAKE_MP3))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub source: String,
    pub destination: String,
    pub message: EmailMessage,
}

/// Notifier that records instead of sending
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        *notifier.fail.lock().unwrap() = true;
        notifier
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_email(
        &self,
        source: &str,
        destination: &str,
        message: &EmailMessage,
    ) -> NotifyResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(NotifyError::DeliveryFailed(
                "MessageRejected: Email address is not verified".to_string(),
            ));
        }

        self.sent.lock().unwrap().push(SentEmail {
            source: source.to_string(),
            destination: destination.to_string(),
            message: message.clone(),
        });
        Ok(())
    }
}
