//! Document-to-speech conversion.
//!
//! [`ConversionPipeline`] handles one batch of upload notifications. Each
//! record is processed on its own: a failure is logged and reported for that
//! record while the remaining records continue.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aws_lambda_events::event::s3::S3EventRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::event::{S3Event, bucket_name, object_key};
use crate::core::extract::{self, ExtractError, MAX_SYNTHESIS_CHARS, SourceFormat};
use crate::core::notify::{Notifier, NotifyError, audio_ready_message};
use crate::core::routing_key::RoutingKey;
use crate::core::storage::{AUDIO_URL_EXPIRY, ObjectStorage, PresignOperation, StorageError};
use crate::core::tts::{PollyVoice, SpeechSynthesizer, SynthesisError};

/// Result type for a single record
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that fail one record
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Text extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Speech synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Notification record has no {0}")]
    MalformedRecord(&'static str),
}

/// Why a record was skipped without producing audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Key does not end in `.pdf` or `.docx`
    UnsupportedExtension,
    /// The document carries no text
    EmptyText,
}

/// Whether the uploader was told about their audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed,
    NotRequested,
}

/// Result of a successfully handled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Skipped(SkipReason),
    Converted {
        file_id: String,
        audio_key: String,
        notification: NotificationStatus,
    },
}

/// Per-record results of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(String, PipelineResult<RecordOutcome>)>,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, r)| matches!(r, Ok(RecordOutcome::Converted { .. })))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, r)| matches!(r, Ok(RecordOutcome::Skipped(_))))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// Response returned to the event runtime once every record was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub status_code: u16,
    pub body: String,
}

impl ConversionResponse {
    pub fn audio_created() -> Self {
        Self {
            status_code: 200,
            body: "Audio created".to_string(),
        }
    }
}

/// Converts uploaded documents into narrated audio.
pub struct ConversionPipeline {
    storage: Arc<dyn ObjectStorage>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    notifier: Arc<dyn Notifier>,
    sender_email: String,
    scratch_dir: PathBuf,
}

impl ConversionPipeline {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        notifier: Arc<dyn Notifier>,
        sender_email: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            synthesizer,
            notifier,
            sender_email: sender_email.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Handle an event and produce the runtime response.
    pub async fn handle(&self, event: &S3Event) -> ConversionResponse {
        self.process_batch(event).await;
        ConversionResponse::audio_created()
    }

    /// Process every record in order.
    pub async fn process_batch(&self, event: &S3Event) -> BatchReport {
        let mut report = BatchReport::default();

        for record in &event.records {
            let key = object_key(record).unwrap_or_default();
            let result = self.process_record(record).await;
            if let Err(ref e) = result {
                error!(
                    bucket = bucket_name(record).unwrap_or_default(),
                    key = %key,
                    error = %e,
                    "Failed to convert record"
                );
            }
            report.outcomes.push((key, result));
        }

        info!(
            records = report.outcomes.len(),
            converted = report.converted(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Batch processed"
        );
        report
    }

    /// Convert one uploaded object.
    pub async fn process_record(&self, record: &S3EventRecord) -> PipelineResult<RecordOutcome> {
        let bucket = bucket_name(record).ok_or(PipelineError::MalformedRecord("bucket name"))?;
        let key = object_key(record).ok_or(PipelineError::MalformedRecord("object key"))?;

        info!(bucket = %bucket, key = %key, "Processing upload");

        let Some(format) = SourceFormat::from_key(&key) else {
            debug!(key = %key, "Skipping unsupported file type");
            return Ok(RecordOutcome::Skipped(SkipReason::UnsupportedExtension));
        };

        let (routing, defaulted) = RoutingKey::parse_or_default(&key, format);
        if defaulted {
            warn!(
                key = %key,
                file_id = %routing.file_id,
                "Object key carries no routing fields, using defaults"
            );
        }

        let body = self.storage.download(bucket, &key).await?;
        let local_path = self.scratch_path(&key);
        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        tokio::fs::write(&local_path, &body).await?;
        debug!(path = %local_path.display(), bytes = body.len(), "Wrote scratch file");

        let text = extract::extract_text(Some(format), local_path).await?;
        if text.trim().is_empty() {
            info!(key = %key, "Document contains no text, skipping");
            return Ok(RecordOutcome::Skipped(SkipReason::EmptyText));
        }

        let text = extract::truncate_chars(&text, MAX_SYNTHESIS_CHARS);
        let voice = PollyVoice::new(routing.voice.as_str());
        let audio = self.synthesizer.synthesize(text, &voice).await?;

        let audio_key = routing.audio_key();
        let audio_len = audio.len();
        self.storage.upload(bucket, &audio_key, audio).await?;
        info!(
            bucket = %bucket,
            audio_key = %audio_key,
            bytes = audio_len,
            voice = %voice,
            "Stored audio"
        );

        let notification = match routing.email.as_deref() {
            Some(email) => self.notify(bucket, &audio_key, email).await?,
            None => NotificationStatus::NotRequested,
        };

        Ok(RecordOutcome::Converted {
            file_id: routing.file_id,
            audio_key,
            notification,
        })
    }

    async fn notify(
        &self,
        bucket: &str,
        audio_key: &str,
        email: &str,
    ) -> PipelineResult<NotificationStatus> {
        let url = self
            .storage
            .presigned_url(PresignOperation::Get, bucket, audio_key, AUDIO_URL_EXPIRY)
            .await?;

        let message = audio_ready_message(&url);
        match self
            .notifier
            .send_email(&self.sender_email, email, &message)
            .await
        {
            Ok(()) => {
                info!(to = %email, audio_key = %audio_key, "Notification sent");
                Ok(NotificationStatus::Sent)
            }
            Err(e) => {
                error!(to = %email, audio_key = %audio_key, error = %e, "Failed to send notification");
                Ok(NotificationStatus::Failed)
            }
        }
    }

    fn scratch_path(&self, key: &str) -> PathBuf {
        let base_name = Path::new(key)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| key.replace('/', "_").into());
        self.scratch_dir.join(base_name)
    }
}
