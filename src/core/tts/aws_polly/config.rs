//! Amazon Polly request options.

/// Maximum billed characters per `SynthesizeSpeech` request.
pub const MAX_TEXT_LENGTH: usize = 3000;

// =============================================================================
// Polly Engine
// =============================================================================

/// Amazon Polly synthesis engine options.
///
/// When no engine is configured the request omits it and Polly uses the
/// standard engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollyEngine {
    Standard,
    Neural,
    LongForm,
    Generative,
}

impl PollyEngine {
    /// Convert to AWS API string.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
            Self::LongForm => "long-form",
            Self::Generative => "generative",
        }
    }

    /// Parse an engine name. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "neural" => Some(Self::Neural),
            "long-form" | "longform" | "long_form" => Some(Self::LongForm),
            "generative" => Some(Self::Generative),
            _ => None,
        }
    }
}

impl std::fmt::Display for PollyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Polly Voice
// =============================================================================

/// Polly voice id, sent exactly as it appeared in the object key.
///
/// Polly rejects unknown or miscased ids with `InvalidParameterValue`, which
/// fails only the record that carried them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollyVoice(String);

impl PollyVoice {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PollyVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
