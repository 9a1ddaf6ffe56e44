//! Amazon Polly synthesizer backed by the AWS SDK.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use aws_sdk_polly::Client as PollyClient;
use aws_sdk_polly::types::{Engine, OutputFormat, VoiceId};
use bytes::Bytes;
use tracing::{debug, error};

use super::config::{MAX_TEXT_LENGTH, PollyEngine, PollyVoice};
use crate::core::tts::{SpeechSynthesizer, SynthesisError, SynthesisResult};

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert PollyEngine to AWS SDK Engine type
fn engine_to_sdk(engine: PollyEngine) -> Engine {
    match engine {
        PollyEngine::Standard => Engine::Standard,
        PollyEngine::Neural => Engine::Neural,
        PollyEngine::LongForm => Engine::LongForm,
        PollyEngine::Generative => Engine::Generative,
    }
}

/// Convert PollyVoice to AWS SDK VoiceId
fn voice_to_sdk(voice: &PollyVoice) -> VoiceId {
    VoiceId::from(voice.as_str())
}

// =============================================================================
// Amazon Polly Synthesizer
// =============================================================================

/// Speech synthesizer using Amazon Polly's `SynthesizeSpeech` API.
///
/// Audio is always requested as MP3.
///
/// The client is built once at startup and shared for the life of the
/// process.
pub struct PollySynthesizer {
    client: PollyClient,
    /// Engine override; `None` lets Polly pick its default
    engine: Option<PollyEngine>,
    /// Request counter for log correlation
    request_counter: AtomicU64,
}

impl PollySynthesizer {
    pub fn new(client: PollyClient) -> Self {
        Self {
            client,
            engine: None,
            request_counter: AtomicU64::new(0),
        }
    }

    /// Use a specific synthesis engine for every request.
    pub fn with_engine(mut self, engine: Option<PollyEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> Option<PollyEngine> {
        self.engine
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    async fn synthesize(&self, text: &str, voice: &PollyVoice) -> SynthesisResult<Bytes> {
        let text_chars = text.chars().count();
        if text_chars > MAX_TEXT_LENGTH {
            return Err(SynthesisError::InvalidInput(format!(
                "Text length {text_chars} exceeds maximum {MAX_TEXT_LENGTH} characters"
            )));
        }

        let request_id = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;

        debug!(
            request_id = request_id,
            text_chars = text_chars,
            voice = %voice,
            "Synthesizing text with Amazon Polly"
        );

        let mut request = self
            .client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_to_sdk(voice))
            .output_format(OutputFormat::Mp3);

        if let Some(engine) = self.engine {
            request = request.engine(engine_to_sdk(engine));
        }

        let response = request.send().await.map_err(|e| {
            error!(request_id = request_id, error = %e, "Polly API error");
            SynthesisError::ProviderError(format!("Polly API error: {e}"))
        })?;

        let audio = response.audio_stream.collect().await.map_err(|e| {
            error!(request_id = request_id, error = %e, "Failed to read audio stream");
            SynthesisError::AudioGenerationFailed(format!("Failed to read audio stream: {e}"))
        })?;

        let bytes = audio.into_bytes();

        debug!(
            request_id = request_id,
            audio_bytes = bytes.len(),
            "Successfully synthesized audio"
        );

        Ok(bytes)
    }
}
