use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::{ExtractResult, TextExtractor};

/// Reads the text layer of a PDF page by page.
///
/// Pages that yield no text, or whose text cannot be decoded, are skipped;
/// the remaining pages are joined with newlines.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<String> {
        let document = Document::load(path)?;
        Ok(extract_document(&document))
    }
}

pub(crate) fn extract_document(document: &Document) -> String {
    let pages = document.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => texts.push(text.trim_end().to_string()),
            Ok(_) => debug!(page = page_number, "PDF page has no text"),
            Err(e) => debug!(page = page_number, error = %e, "Skipping undecodable PDF page"),
        }
    }

    texts.join("\n")
}
