//! Routing metadata carried inside storage object keys.
//!
//! Uploads are written to `uploads/{file_id}___{voice}___{email}.{ext}`. The
//! conversion pipeline recovers the four fields from the key's base name when
//! the upload notification arrives, so no separate record of the request is
//! ever persisted.
//!
//! Decoding never fails: a key that does not split into exactly three fields
//! resolves to the default voice, no email and a freshly generated file id.

use uuid::Uuid;

use crate::core::extract::SourceFormat;

/// Prefix under which upload authorizations place source documents.
pub const UPLOAD_PREFIX: &str = "uploads/";

/// Prefix under which synthesized audio is stored.
pub const AUDIO_PREFIX: &str = "audio/";

/// Separator between the routing fields in a key's base name.
pub const FIELD_DELIMITER: &str = "___";

/// Voice used when the request or the key does not name one.
pub const DEFAULT_VOICE: &str = "Joanna";

/// Placeholder destination used when an upload request omits the email.
pub const DEFAULT_EMAIL: &str = "example@example.com";

/// Source extension used when an upload request omits it.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Structured routing metadata for one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingKey {
    /// Unique token identifying the upload and its audio artifact
    pub file_id: String,
    /// Synthesis voice name
    pub voice: String,
    /// Destination for the completion notification
    pub email: Option<String>,
    /// Source format tag, without the leading dot
    pub extension: String,
}

impl RoutingKey {
    /// Create a routing key for a new upload with a freshly generated file id.
    pub fn generate(voice: impl Into<String>, email: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            file_id: new_file_id(),
            voice: voice.into(),
            email: Some(email.into()),
            extension: ext.into(),
        }
    }

    /// Encode into the upload object key.
    ///
    /// An absent email encodes as an empty field so the key still carries
    /// three delimited fields.
    pub fn upload_key(&self) -> String {
        format!(
            "{UPLOAD_PREFIX}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}.{}",
            self.file_id,
            self.voice,
            self.email.as_deref().unwrap_or_default(),
            self.extension
        )
    }

    /// Key of the audio artifact derived from this upload.
    pub fn audio_key(&self) -> String {
        audio_key(&self.file_id)
    }

    /// Decode routing metadata from an object key.
    ///
    /// Returns the routing key and `true` when the defaults had to be
    /// substituted because the base name did not split into exactly three
    /// fields.
    pub fn parse_or_default(key: &str, format: SourceFormat) -> (Self, bool) {
        match Self::parse(key, format) {
            Some(routing) => (routing, false),
            None => (
                Self {
                    file_id: new_file_id(),
                    voice: DEFAULT_VOICE.to_string(),
                    email: None,
                    extension: format.extension().to_string(),
                },
                true,
            ),
        }
    }

    fn parse(key: &str, format: SourceFormat) -> Option<Self> {
        let base_name = key.rsplit('/').next().unwrap_or(key);
        let stem = base_name
            .strip_suffix(format.suffix())
            .unwrap_or(base_name);

        let mut fields = stem.split(FIELD_DELIMITER);
        let (Some(file_id), Some(voice), Some(email), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return None;
        };

        Some(Self {
            file_id: file_id.to_string(),
            voice: voice.to_string(),
            email: Some(email).filter(|e| !e.is_empty()).map(str::to_string),
            extension: format.extension().to_string(),
        })
    }
}

/// Build the audio object key for a file id.
pub fn audio_key(file_id: &str) -> String {
    format!("{AUDIO_PREFIX}{file_id}.mp3")
}

/// Generate a new unique file id.
pub fn new_file_id() -> String {
    Uuid::new_v4().to_string()
}
