use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;

use super::{ExtractResult, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";
const HEADER_PREFIX: &str = "word/header";
const FOOTER_PREFIX: &str = "word/footer";

/// Reads the text of a Word (OOXML) document.
///
/// Headers come first, then the document body, then footers. Runs (`w:t`)
/// contribute their text, `w:tab` a tab, `w:br`/`w:cr` a line break and each
/// paragraph starts on a fresh line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<String> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;
        extract_archive(&mut archive)
    }
}

pub(crate) fn extract_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ExtractResult<String> {
    let mut headers = part_names(archive, HEADER_PREFIX);
    let footers = part_names(archive, FOOTER_PREFIX);
    headers.push(DOCUMENT_PART.to_string());
    headers.extend(footers);

    let mut text = String::new();
    for name in &headers {
        let mut xml = String::new();
        archive.by_name(name)?.read_to_string(&mut xml)?;
        debug!(part = %name, xml_len = xml.len(), "Reading DOCX part");
        text.push_str(&xml_to_text(&xml)?);
    }

    Ok(text.trim().to_string())
}

fn part_names<R: Read + Seek>(archive: &ZipArchive<R>, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

fn xml_to_text(xml: &str) -> ExtractResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:t" {
                    in_run_text = true;
                } else {
                    push_marker(&mut text, e.name().as_ref());
                }
            }
            Event::Empty(e) => push_marker(&mut text, e.name().as_ref()),
            Event::End(e) if e.name().as_ref() == b"w:t" => in_run_text = false,
            Event::Text(e) if in_run_text => text.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn push_marker(text: &mut String, name: &[u8]) {
    match name {
        b"w:p" => text.push_str("\n\n"),
        b"w:tab" => text.push('\t'),
        b"w:br" | b"w:cr" => text.push('\n'),
        _ => {}
    }
}
