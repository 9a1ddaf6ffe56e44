//! Amazon Polly speech synthesis.
//!
//! Uses the `SynthesizeSpeech` API through the AWS SDK for Rust, which handles
//! request signing and credential resolution (environment, shared profile or
//! the Lambda execution role).
//!
//! # Example
//!
//! ```rust,ignore
//! use text_to_audio::core::tts::{PollySynthesizer, PollyVoice, SpeechSynthesizer};
//!
//! let sdk_config = aws_config::load_from_env().await;
//! let polly = PollySynthesizer::new(aws_sdk_polly::Client::new(&sdk_config));
//! let audio = polly
//!     .synthesize("Hello from Amazon Polly!", &PollyVoice::new("Joanna"))
//!     .await?;
//! ```

mod config;
mod provider;

pub use config::{MAX_TEXT_LENGTH, PollyEngine, PollyVoice};
pub use provider::PollySynthesizer;
