//! HTTP request handlers
//!
//! - `upload_url` - Presigned upload authorization and its CORS preflight

pub mod upload_url;

pub use upload_url::{create_upload_url, preflight};
