//! Speech synthesis.
//!
//! The pipeline talks to a [`SpeechSynthesizer`]; [`PollySynthesizer`] is the
//! Amazon Polly implementation used in production.

pub mod aws_polly;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use aws_polly::{MAX_TEXT_LENGTH, PollyEngine, PollySynthesizer, PollyVoice};

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Errors raised by a speech synthesis backend
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid synthesis input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
}

/// Turns text into MP3 audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with `voice`, returning the complete MP3 stream.
    async fn synthesize(&self, text: &str, voice: &PollyVoice) -> SynthesisResult<Bytes>;
}
