//! Plain-text extraction from uploaded documents.
//!
//! Extraction is selected by [`SourceFormat`], derived from the object key's
//! extension. Each format has a [`TextExtractor`] that reads a local file and
//! returns its text, or an empty string when the document carries none.

mod docx;
mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;

/// Maximum number of characters submitted to speech synthesis.
pub const MAX_SYNTHESIS_CHARS: usize = crate::core::tts::MAX_TEXT_LENGTH;

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors raised while reading text out of a document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to open DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Malformed DOCX XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Document formats the pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Detect the format from an object key's suffix.
    ///
    /// Matching is case-sensitive; anything other than `.pdf` or `.docx`
    /// is unsupported.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.ends_with(Self::Pdf.suffix()) {
            Some(Self::Pdf)
        } else if key.ends_with(Self::Docx.suffix()) {
            Some(Self::Docx)
        } else {
            None
        }
    }

    /// Extension tag without the leading dot.
    #[inline]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// Key suffix including the leading dot.
    #[inline]
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Capability to turn a local document file into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text. Returns an empty string when the
    /// document contains no extractable text.
    fn extract(&self, path: &Path) -> ExtractResult<String>;
}

/// Select the extractor for a format.
pub fn extractor_for(format: SourceFormat) -> Box<dyn TextExtractor> {
    match format {
        SourceFormat::Pdf => Box::new(PdfExtractor),
        SourceFormat::Docx => Box::new(DocxExtractor),
    }
}

/// Extract text from a local file on a blocking thread.
///
/// Unsupported formats yield empty text.
pub async fn extract_text(format: Option<SourceFormat>, path: PathBuf) -> ExtractResult<String> {
    let Some(format) = format else {
        return Ok(String::new());
    };

    tokio::task::spawn_blocking(move || extractor_for(format).extract(&path))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

/// Return at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
