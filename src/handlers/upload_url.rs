//! Upload authorization endpoint.
//!
//! A client posts the voice, notification email and file extension it wants,
//! and receives a presigned PUT URL for a fresh object key that carries those
//! choices to the conversion pipeline.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::core::routing_key::{DEFAULT_EMAIL, DEFAULT_EXTENSION, DEFAULT_VOICE, RoutingKey};
use crate::core::storage::{PresignOperation, UPLOAD_URL_EXPIRY};
use crate::errors::{AppError, AppResult};
use crate::state::AuthorizerState;

/// Upload authorization request
///
/// Every field is optional; absent or `null` fields take their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct UploadUrlRequest {
    pub voice: Option<String>,
    pub email: Option<String>,
    pub ext: Option<String>,
}

/// Upload authorization response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub file_id: String,
    pub voice: String,
    pub email: String,
}

/// Issue a presigned upload URL
pub async fn create_upload_url(
    State(state): State<Arc<AuthorizerState>>,
    body: Bytes,
) -> AppResult<Json<UploadUrlResponse>> {
    let request: UploadUrlRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to parse upload request body");
        AppError::InvalidBody(e.to_string())
    })?;

    let voice = request.voice.unwrap_or_else(|| DEFAULT_VOICE.to_string());
    let email = request.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string());
    let ext = request.ext.unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    let routing = RoutingKey::generate(voice, email.clone(), ext);
    let key = routing.upload_key();

    info!(
        voice = %routing.voice,
        email = %email,
        ext = %routing.extension,
        key = %key,
        "Generating upload URL"
    );

    let upload_url = state
        .storage
        .presigned_url(PresignOperation::Put, &state.bucket, &key, UPLOAD_URL_EXPIRY)
        .await
        .map_err(|e| {
            error!(bucket = %state.bucket, key = %key, error = %e, "Failed to generate presigned URL");
            AppError::from(e)
        })?;

    debug!(file_id = %routing.file_id, "Generated presigned URL");

    Ok(Json(UploadUrlResponse {
        upload_url,
        file_id: routing.file_id,
        voice: routing.voice,
        email,
    }))
}

/// CORS preflight. Headers are added by the router's header layers.
pub async fn preflight() -> impl IntoResponse {
    debug!("Preflight OPTIONS request handled");
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_null_fields_are_absent() {
        let request: UploadUrlRequest =
            serde_json::from_str(r#"{"voice": null, "email": "a@b.co"}"#).unwrap();
        assert!(request.voice.is_none());
        assert_eq!(request.email.as_deref(), Some("a@b.co"));
        assert!(request.ext.is_none());
    }

    #[test]
    fn test_request_rejects_non_object() {
        assert!(serde_json::from_str::<UploadUrlRequest>("[1, 2]").is_err());
        assert!(serde_json::from_slice::<UploadUrlRequest>(b"").is_err());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = UploadUrlResponse {
            upload_url: "https://example.com/put".to_string(),
            file_id: "abc".to_string(),
            voice: "Joanna".to_string(),
            email: "example@example.com".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["uploadUrl"], "https://example.com/put");
        assert_eq!(json["fileId"], "abc");
        assert_eq!(json["voice"], "Joanna");
        assert_eq!(json["email"], "example@example.com");
    }
}
