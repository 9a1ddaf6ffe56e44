//! Storage upload notifications.
//!
//! Notifications arrive as [`S3Event`] payloads. Object keys inside them are
//! form-URL-encoded and must be decoded before use.

use aws_lambda_events::event::s3::S3EventRecord;

pub use aws_lambda_events::event::s3::S3Event;

/// Bucket named by `record`, if present.
pub fn bucket_name(record: &S3EventRecord) -> Option<&str> {
    record.s3.bucket.name.as_deref()
}

/// Decoded object key named by `record`, if present.
pub fn object_key(record: &S3EventRecord) -> Option<String> {
    record.s3.object.key.as_deref().map(decode_object_key)
}

/// Decode a form-URL-encoded object key (`+` is a space, `%XX` an escaped
/// byte). Escapes that do not form valid UTF-8 are replaced lossily.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned(),
    }
}
