pub mod event;
pub mod extract;
pub mod notify;
pub mod pipeline;
pub mod routing_key;
pub mod storage;
pub mod tts;

// Re-export commonly used types for convenience
pub use event::{S3Event, decode_object_key};

pub use extract::{DocxExtractor, ExtractError, PdfExtractor, SourceFormat, TextExtractor};

pub use notify::{EmailMessage, Notifier, NotifyError, SesNotifier, audio_ready_message};

pub use pipeline::{
    BatchReport, ConversionPipeline, ConversionResponse, NotificationStatus, PipelineError,
    PipelineResult, RecordOutcome, SkipReason,
};

pub use routing_key::RoutingKey;

pub use storage::{ObjectStorage, PresignOperation, S3Settings, S3Storage, StorageError};

pub use tts::{PollySynthesizer, PollyVoice, SpeechSynthesizer, SynthesisError};
