//! Document fixtures built in memory
//!
//! - `docx_bytes` - minimal OOXML package with one paragraph per entry
//! - `pdf_bytes` - PDF with one page per entry, `None` for a blank page
//! - `s3_record` / `s3_event` - object-created notifications with encoded keys

#![allow(dead_code)]

use std::borrow::Cow;
use std::io::{Cursor, Write};

use aws_lambda_events::event::s3::{S3Event, S3EventRecord};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use zip::write::SimpleFileOptions;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build a DOCX whose body holds the given paragraphs.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", escape_xml(p)))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WORD_NS}"><w:body>{body}</w:body></w:document>"#
    );

    let content_types = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(content_types.as_bytes()).unwrap();
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Build a PDF with one page per entry.
pub fn pdf_bytes(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Encode `key` the way S3 does in notifications: each path segment is
/// form-URL-encoded with spaces as `+`.
pub fn encode_object_key(key: &str) -> String {
    key.split('/')
        .map(|segment| match urlencoding::encode(segment) {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => s.replace("%20", "+"),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Object-created record for `key` in `bucket`.
pub fn s3_record(bucket: &str, key: &str) -> S3EventRecord {
    let mut record = S3EventRecord::default();
    record.event_source = Some("aws:s3".to_string());
    record.event_name = Some("ObjectCreated:Put".to_string());
    record.s3.bucket.name = Some(bucket.to_string());
    record.s3.object.key = Some(encode_object_key(key));
    record
}

/// Notification carrying one record per key.
pub fn s3_event(bucket: &str, keys: &[&str]) -> S3Event {
    let mut event = S3Event::default();
    event.records = keys.iter().map(|key| s3_record(bucket, key)).collect();
    event
}
