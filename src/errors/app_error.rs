use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::core::storage::StorageError;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the HTTP handlers
///
/// Every variant renders as `500 {"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body missing or not valid JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Storage could not issue the authorization
    #[error("{0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
